//! DAF (Double Precision Array File) file record.
//!
//! The first 1024-byte record of an SPK kernel describes how the rest of the
//! file is laid out:
//!
//! * **`idword`**: format identifier, `"DAF/SPK"` for planetary kernels,
//! * **`nd`** / **`ni`**: number of double / integer components of each array summary
//!   (`2` and `6` for SPK),
//! * **`fward`** / **`bward`**: record numbers (1-based) of the first and last summary record,
//! * **`free`**: first free DP-word address,
//! * **`locfmt`**: binary format of the numbers stored in the file (`"LTL-IEEE"` or `"BIG-IEEE"`).
//!
//! Only little-endian kernels are decoded, which covers every DE kernel distributed by NAIF.

use std::fmt;

use nom::{bytes::complete::take, number::complete::le_i32, IResult};

use crate::porkchop_errors::PorkchopError;

/// Size of one DAF record in bytes.
pub const DAF_RECORD_BYTES: usize = 1024;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DAFHeader {
    pub idword: String,
    pub internal_filename: String,
    pub nd: i32,
    pub ni: i32,
    pub fward: i32,
    pub bward: i32,
    pub free: i32,
    pub locfmt: String,
}

fn ascii_field(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

impl DAFHeader {
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, id_word) = take(8usize)(input)?;
        let (input, nd) = le_i32(input)?;
        let (input, ni) = le_i32(input)?;
        let (input, ifname) = take(60usize)(input)?;
        let (input, fward) = le_i32(input)?;
        let (input, bward) = le_i32(input)?;
        let (input, free) = le_i32(input)?;
        let (input, locfmt) = take(8usize)(input)?;
        Ok((
            input,
            DAFHeader {
                idword: ascii_field(id_word),
                internal_filename: ascii_field(ifname),
                nd,
                ni,
                fward,
                bward,
                free,
                locfmt: ascii_field(locfmt),
            },
        ))
    }

    /// Decode and validate the file record at the start of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PorkchopError> {
        let record = bytes.get(..DAF_RECORD_BYTES).ok_or_else(|| {
            PorkchopError::NomParsingError(format!(
                "DAF file too short: {} bytes, expected at least {DAF_RECORD_BYTES}",
                bytes.len()
            ))
        })?;
        let (_, header) = DAFHeader::parse(record)
            .map_err(|e| PorkchopError::NomParsingError(format!("DAF header: {e}")))?;
        header.validate()?;
        Ok(header)
    }

    fn validate(&self) -> Result<(), PorkchopError> {
        if self.idword != "DAF/SPK" {
            return Err(PorkchopError::NomParsingError(format!(
                "not an SPK kernel (idword = {:?})",
                self.idword
            )));
        }
        if self.locfmt != "LTL-IEEE" {
            return Err(PorkchopError::NomParsingError(format!(
                "unsupported binary format {:?}, only LTL-IEEE kernels are read",
                self.locfmt
            )));
        }
        if self.nd != 2 || self.ni != 6 {
            return Err(PorkchopError::NomParsingError(format!(
                "unexpected SPK summary layout nd = {}, ni = {}",
                self.nd, self.ni
            )));
        }
        if self.fward < 2 {
            return Err(PorkchopError::NomParsingError(format!(
                "invalid first summary record number {}",
                self.fward
            )));
        }
        Ok(())
    }

    /// Size of one array summary in double precision words: `nd + ceil(ni / 2)`.
    pub fn summary_size(&self) -> usize {
        self.nd as usize + (self.ni as usize).div_ceil(2)
    }
}

impl fmt::Display for DAFHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+{:-^42}+", " DAF file record ")?;
        writeln!(f, "| {:<12} | {:<25} |", "idword", self.idword)?;
        writeln!(f, "| {:<12} | {:<25} |", "filename", self.internal_filename)?;
        writeln!(f, "| {:<12} | {:<25} |", "nd / ni", format!("{} / {}", self.nd, self.ni))?;
        writeln!(
            f,
            "| {:<12} | {:<25} |",
            "fward / bward",
            format!("{} / {}", self.fward, self.bward)
        )?;
        writeln!(f, "| {:<12} | {:<25} |", "free", self.free)?;
        writeln!(f, "| {:<12} | {:<25} |", "locfmt", self.locfmt)?;
        write!(f, "+{:-^42}+", "")
    }
}
