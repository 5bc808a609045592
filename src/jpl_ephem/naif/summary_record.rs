use std::fmt;

use hifitime::Epoch;
use nom::{
    number::complete::{le_f64, le_i32},
    IResult,
};

/// Descriptor of one SPK segment, as stored in a DAF summary record.
///
/// Epochs are TDB seconds past J2000 and addresses are 1-based DP-word indices.
#[derive(Debug, PartialEq, Clone)]
pub struct Summary {
    pub start_epoch: f64,
    pub end_epoch: f64,
    pub target: i32,
    pub center: i32,
    pub frame_id: i32,
    pub data_type: i32,
    pub initial_addr: i32,
    pub final_addr: i32,
}

impl Summary {
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, start_epoch) = le_f64(input)?;
        let (input, end_epoch) = le_f64(input)?;

        let (input, target) = le_i32(input)?;
        let (input, center) = le_i32(input)?;
        let (input, frame_id) = le_i32(input)?;
        let (input, data_type) = le_i32(input)?;
        let (input, initial_addr) = le_i32(input)?;
        let (input, final_addr) = le_i32(input)?;
        Ok((
            input,
            Summary {
                start_epoch,
                end_epoch,
                target,
                center,
                frame_id,
                data_type,
                initial_addr,
                final_addr,
            },
        ))
    }

    pub fn covers(&self, et_seconds: f64) -> bool {
        et_seconds >= self.start_epoch && et_seconds <= self.end_epoch
    }
}

/// Control words at the start of every summary record.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SummaryRecordControl {
    /// Record number of the next summary record, 0 for the last one
    pub next: usize,
    /// Number of summaries in this record
    pub nsum: usize,
}

impl SummaryRecordControl {
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, next) = le_f64(input)?;
        let (input, _prev) = le_f64(input)?;
        let (input, nsum) = le_f64(input)?;
        Ok((
            input,
            SummaryRecordControl {
                next: next as usize,
                nsum: nsum as usize,
            },
        ))
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = Epoch::from_et_seconds(self.start_epoch);
        let end = Epoch::from_et_seconds(self.end_epoch);
        write!(
            f,
            "target {:>4} | center {:>4} | frame {:>2} | type {:>2} | {} → {} | words {}..{}",
            self.target,
            self.center,
            self.frame_id,
            self.data_type,
            start,
            end,
            self.initial_addr,
            self.final_addr
        )
    }
}
