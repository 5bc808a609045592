//! JPL planetary development ephemerides published as NAIF SPK kernels.
//!
//! Each variant maps to the kernel file name served under
//! `https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets/`.

use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaifVersion {
    DE430,
    DE432,
    DE435,
    DE438,
    DE440,
    DE440s,
    DE442,
}

impl NaifVersion {
    pub fn get_filename(&self) -> &'static str {
        match self {
            NaifVersion::DE430 => "de430.bsp",
            NaifVersion::DE432 => "de432s.bsp",
            NaifVersion::DE435 => "de435.bsp",
            NaifVersion::DE438 => "de438.bsp",
            NaifVersion::DE440 => "de440.bsp",
            NaifVersion::DE440s => "de440s.bsp",
            NaifVersion::DE442 => "de442.bsp",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            NaifVersion::DE430 => "DE430",
            NaifVersion::DE432 => "DE432",
            NaifVersion::DE435 => "DE435",
            NaifVersion::DE438 => "DE438",
            NaifVersion::DE440 => "DE440",
            NaifVersion::DE440s => "DE440s",
            NaifVersion::DE442 => "DE442",
        }
    }
}

impl FromStr for NaifVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DE430" => Ok(NaifVersion::DE430),
            "DE432" => Ok(NaifVersion::DE432),
            "DE435" => Ok(NaifVersion::DE435),
            "DE438" => Ok(NaifVersion::DE438),
            "DE440" => Ok(NaifVersion::DE440),
            "DE440S" => Ok(NaifVersion::DE440s),
            "DE442" => Ok(NaifVersion::DE442),
            _ => Err(format!("Invalid NAIF version: {s}")),
        }
    }
}

impl fmt::Display for NaifVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
