use thiserror::Error;

#[derive(Error, Debug)]
pub enum PorkchopError {
    #[error("Invalid JPL string format: {0}")]
    InvalidJPLStringFormat(String),

    #[error("Invalid JPL ephemeris file source: {0}")]
    InvalidJPLEphemFileSource(String),

    #[error("Invalid JPL ephemeris file version: {0}")]
    InvalidJPLEphemFileVersion(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "jpl-download")]
    #[error("HTTP reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Base dir creation error for JPL ephemeris file: {0}")]
    UnableToCreateBaseDir(String),

    #[error("UTF-8 Path error: {0}")]
    Utf8PathError(String),

    #[error("JPL File not found at: {0}")]
    JPLFileNotFound(String),

    #[error("Error during the nom parsing: {0}")]
    NomParsingError(String),

    #[error("Invalid SPK data type: {0}")]
    InvalidSpkDataType(i32),

    #[error("No ephemeris segment for target {target} relative to {center}")]
    MissingSegment { target: i32, center: i32 },

    #[error("Epoch {epoch} is outside the ephemeris coverage of body {naif_id}")]
    EphemerisOutOfRange { naif_id: i32, epoch: String },

    #[error("Unknown body name: {0}")]
    UnknownBody(String),

    #[error("Body {0} is not part of the body set")]
    BodyNotInSet(String),

    #[error("Body {body} is not available with the {source_name} ephemeris")]
    BodyUnavailable { body: String, source_name: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid {name} window: earliest {earliest} is not before latest {latest}")]
    InvalidDateWindow {
        name: String,
        earliest: String,
        latest: String,
    },

    #[error("Time window percentage must be in (0, 100), got {0}")]
    InvalidPercentage(f64),

    #[error("Time resolution must be strictly positive, got {0} days")]
    NonPositiveResolution(f64),

    #[error("Invalid scenario configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid Lambert input: {0}")]
    InvalidLambertInput(String),

    #[error("Lambert transfer angle is too close to 180°, the transfer plane is undefined")]
    LambertSingular,

    #[error("Lambert iteration did not converge after {0} iterations")]
    LambertNoConvergence(usize),

    #[error("Kepler equation did not converge (e = {0})")]
    KeplerNoConvergence(f64),

    #[error("Grid shape mismatch: expected {expected:?}, found {found:?}")]
    GridShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Plot rendering error: {0}")]
    PlotError(String),

    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow_schema::ArrowError),

    #[error("Invalid cache file: {0}")]
    InvalidCache(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl PartialEq for PorkchopError {
    fn eq(&self, other: &Self) -> bool {
        use PorkchopError::*;
        match (self, other) {
            (InvalidJPLStringFormat(a), InvalidJPLStringFormat(b)) => a == b,
            (InvalidJPLEphemFileSource(a), InvalidJPLEphemFileSource(b)) => a == b,
            (InvalidJPLEphemFileVersion(a), InvalidJPLEphemFileVersion(b)) => a == b,

            // not comparable, same variant is enough
            (IoError(_), IoError(_)) => true,
            #[cfg(feature = "jpl-download")]
            (ReqwestError(_), ReqwestError(_)) => true,
            (ParquetError(_), ParquetError(_)) => true,
            (ArrowError(_), ArrowError(_)) => true,
            (TomlError(_), TomlError(_)) => true,

            (UnableToCreateBaseDir(a), UnableToCreateBaseDir(b)) => a == b,
            (Utf8PathError(a), Utf8PathError(b)) => a == b,
            (JPLFileNotFound(a), JPLFileNotFound(b)) => a == b,
            (NomParsingError(a), NomParsingError(b)) => a == b,
            (InvalidSpkDataType(a), InvalidSpkDataType(b)) => a == b,
            (
                MissingSegment {
                    target: t1,
                    center: c1,
                },
                MissingSegment {
                    target: t2,
                    center: c2,
                },
            ) => t1 == t2 && c1 == c2,
            (
                EphemerisOutOfRange {
                    naif_id: a,
                    epoch: e1,
                },
                EphemerisOutOfRange {
                    naif_id: b,
                    epoch: e2,
                },
            ) => a == b && e1 == e2,
            (UnknownBody(a), UnknownBody(b)) => a == b,
            (BodyNotInSet(a), BodyNotInSet(b)) => a == b,
            (
                BodyUnavailable {
                    body: a,
                    source_name: s1,
                },
                BodyUnavailable {
                    body: b,
                    source_name: s2,
                },
            ) => a == b && s1 == s2,
            (InvalidDate(a), InvalidDate(b)) => a == b,
            (
                InvalidDateWindow {
                    name: n1,
                    earliest: e1,
                    latest: l1,
                },
                InvalidDateWindow {
                    name: n2,
                    earliest: e2,
                    latest: l2,
                },
            ) => n1 == n2 && e1 == e2 && l1 == l2,
            (InvalidPercentage(a), InvalidPercentage(b)) => a == b,
            (NonPositiveResolution(a), NonPositiveResolution(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,
            (InvalidLambertInput(a), InvalidLambertInput(b)) => a == b,
            (LambertNoConvergence(a), LambertNoConvergence(b)) => a == b,
            (KeplerNoConvergence(a), KeplerNoConvergence(b)) => a == b,
            (
                GridShapeMismatch {
                    expected: e1,
                    found: f1,
                },
                GridShapeMismatch {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,
            (PlotError(a), PlotError(b)) => a == b,
            (InvalidCache(a), InvalidCache(b)) => a == b,

            (LambertSingular, LambertSingular) => true,

            _ => false,
        }
    }
}

impl PorkchopError {
    /// Whether this error belongs to a single grid cell (solver or ephemeris coverage)
    /// rather than to the whole evaluation.
    pub fn is_cell_failure(&self) -> bool {
        matches!(
            self,
            PorkchopError::LambertSingular
                | PorkchopError::LambertNoConvergence(_)
                | PorkchopError::InvalidLambertInput(_)
                | PorkchopError::KeplerNoConvergence(_)
                | PorkchopError::EphemerisOutOfRange { .. }
        )
    }
}
