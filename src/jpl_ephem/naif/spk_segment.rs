use nalgebra::Vector3;
use nom::number::complete::le_f64;

use crate::porkchop_errors::PorkchopError;

use super::{chebyshev_record::ChebyshevRecord, naif_type::SpkDataType, summary_record::Summary};

/// Directory stored in the last four words of a type 2/3 segment.
#[derive(Debug, PartialEq, Clone)]
pub struct DirectoryData {
    /// Start epoch of the first record (TDB seconds past J2000)
    pub init: f64,
    /// Length of the interval covered by each record (seconds)
    pub intlen: f64,
    /// Record size in words
    pub rsize: usize,
    pub n_records: usize,
}

impl DirectoryData {
    fn parse(input: &[u8]) -> Result<Self, PorkchopError> {
        let parsed: nom::IResult<&[u8], (f64, f64, f64, f64)> =
            nom::sequence::tuple((le_f64, le_f64, le_f64, le_f64))(input);
        let (_, (init, intlen, rsize, n_records)) =
            parsed.map_err(|e| PorkchopError::NomParsingError(format!("segment directory: {e}")))?;

        if intlen <= 0.0 || rsize < 5.0 || n_records < 1.0 {
            return Err(PorkchopError::NomParsingError(format!(
                "inconsistent segment directory: intlen = {intlen}, rsize = {rsize}, n = {n_records}"
            )));
        }

        Ok(DirectoryData {
            init,
            intlen,
            rsize: rsize as usize,
            n_records: n_records as usize,
        })
    }
}

/// One SPK segment: state of `target` relative to `center` over a time span.
#[derive(Debug, Clone, PartialEq)]
pub struct SpkSegment {
    pub summary: Summary,
    pub data_type: SpkDataType,
    pub directory: DirectoryData,
    pub records: Vec<ChebyshevRecord>,
}

fn word_slice(bytes: &[u8], first_word: usize, n_words: usize) -> Result<&[u8], PorkchopError> {
    let start = first_word
        .checked_sub(1)
        .ok_or_else(|| PorkchopError::NomParsingError("DAF address 0".into()))?
        * 8;
    bytes.get(start..start + n_words * 8).ok_or_else(|| {
        PorkchopError::NomParsingError(format!(
            "DAF words {first_word}..{} beyond end of file ({} bytes)",
            first_word + n_words,
            bytes.len()
        ))
    })
}

impl SpkSegment {
    /// Decode the segment described by `summary` from the full kernel bytes.
    pub fn from_bytes(bytes: &[u8], summary: Summary) -> Result<Self, PorkchopError> {
        let data_type = SpkDataType::try_from(summary.data_type)?;
        let components = data_type.components()?;

        let final_addr = summary.final_addr as usize;
        let directory = DirectoryData::parse(word_slice(bytes, final_addr.saturating_sub(3), 4)?)?;

        let expected_rsize = 2 + components * ((directory.rsize - 2) / components);
        if expected_rsize != directory.rsize {
            return Err(PorkchopError::NomParsingError(format!(
                "record size {} is not a multiple of {components} coefficient sets",
                directory.rsize
            )));
        }

        let data = word_slice(
            bytes,
            summary.initial_addr as usize,
            directory.rsize * directory.n_records,
        )?;

        let records = data
            .chunks_exact(directory.rsize * 8)
            .map(|chunk| {
                ChebyshevRecord::parse(chunk, directory.rsize, components)
                    .map(|(_, record)| record)
                    .map_err(|e| PorkchopError::NomParsingError(format!("Chebyshev record: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SpkSegment {
            summary,
            data_type,
            directory,
            records,
        })
    }

    pub fn covers(&self, et_seconds: f64) -> bool {
        self.summary.covers(et_seconds)
    }

    fn record(&self, et_seconds: f64) -> Option<&ChebyshevRecord> {
        if !self.covers(et_seconds) {
            return None;
        }
        let idx = ((et_seconds - self.directory.init) / self.directory.intlen).floor();
        let idx = (idx.max(0.0) as usize).min(self.records.len().saturating_sub(1));
        self.records.get(idx)
    }

    /// Position (km) and velocity (km/s) of the target relative to the segment center.
    pub fn state(&self, et_seconds: f64) -> Result<(Vector3<f64>, Vector3<f64>), PorkchopError> {
        let record = self
            .record(et_seconds)
            .ok_or_else(|| PorkchopError::EphemerisOutOfRange {
                naif_id: self.summary.target,
                epoch: format!("ET {et_seconds:.3} s"),
            })?;
        record.interpolate(et_seconds)
    }
}
