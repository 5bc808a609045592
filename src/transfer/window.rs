//! Departure/arrival date windows and the grid time resolution.
//!
//! The resolution is a fraction of the **smaller** of the two windows:
//!
//! ```text
//! resolution_days = min(departure_span, arrival_span) · percentage / 100
//! ```
//!
//! With a percentage in `(0, 100)` this guarantees `0 < resolution < min span`, so every axis of
//! the porkchop grid holds at least two epochs.

use std::fmt;

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::{
    constants::Days,
    porkchop_errors::PorkchopError,
    time::{days, format_date, parse_date, span_days},
};

/// Slack on `span / resolution` so that a window which is an exact multiple of the resolution
/// keeps its last epoch despite floating point rounding.
const AXIS_EPSILON: f64 = 1e-9;

/// Closed interval of epochs `[earliest, latest]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateWindow {
    earliest: Epoch,
    latest: Epoch,
}

impl DateWindow {
    /// Build a window, rejecting `latest ≤ earliest`.
    ///
    /// `name` only labels the error (`"departure"`, `"arrival"`).
    pub fn new(name: &str, earliest: Epoch, latest: Epoch) -> Result<Self, PorkchopError> {
        if latest <= earliest {
            return Err(PorkchopError::InvalidDateWindow {
                name: name.to_string(),
                earliest: format_date(earliest),
                latest: format_date(latest),
            });
        }
        Ok(DateWindow { earliest, latest })
    }

    /// Same as [`DateWindow::new`] from two `YYYY-MM-DD` dates.
    pub fn from_dates(name: &str, earliest: &str, latest: &str) -> Result<Self, PorkchopError> {
        DateWindow::new(name, parse_date(earliest)?, parse_date(latest)?)
    }

    pub fn earliest(&self) -> Epoch {
        self.earliest
    }

    pub fn latest(&self) -> Epoch {
        self.latest
    }

    /// Length of the window in days (always > 0).
    pub fn span_days(&self) -> Days {
        span_days(self.earliest, self.latest)
    }

    /// Number of grid epochs along this window for the given resolution.
    pub fn axis_len(&self, resolution: TimeResolution) -> usize {
        (self.span_days() / resolution.days() + AXIS_EPSILON).floor() as usize + 1
    }

    /// Grid epochs `earliest + k·resolution`, `k = 0..axis_len`, never past `latest`.
    pub fn epochs(&self, resolution: TimeResolution) -> Vec<Epoch> {
        (0..self.axis_len(resolution))
            .map(|k| self.earliest + days(k as f64 * resolution.days()))
            .collect()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {} ({:.1} days)",
            format_date(self.earliest),
            format_date(self.latest),
            self.span_days()
        )
    }
}

/// The four boundary dates of a porkchop scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferWindow {
    pub departure: DateWindow,
    pub arrival: DateWindow,
}

impl TransferWindow {
    pub fn new(departure: DateWindow, arrival: DateWindow) -> Self {
        TransferWindow { departure, arrival }
    }

    /// Smaller of the two window spans, in days.
    pub fn min_span_days(&self) -> Days {
        self.departure.span_days().min(self.arrival.span_days())
    }

    /// Grid resolution for a percentage of the smaller window.
    ///
    /// Arguments
    /// -----------------
    /// * `percentage`: step as a percentage of the smaller window, in `(0, 100)`
    ///
    /// Return
    /// ----------
    /// * The [`TimeResolution`], or [`PorkchopError::InvalidPercentage`] when the percentage is
    ///   outside `(0, 100)` or not finite.
    pub fn resolution(&self, percentage: f64) -> Result<TimeResolution, PorkchopError> {
        resolution_days(self.departure.span_days(), self.arrival.span_days(), percentage)
    }

    /// Grid shape `(n_departure, n_arrival)` for a resolution.
    pub fn grid_shape(&self, resolution: TimeResolution) -> (usize, usize) {
        (
            self.departure.axis_len(resolution),
            self.arrival.axis_len(resolution),
        )
    }
}

/// Wire form of a window in scenario files: two `YYYY-MM-DD` dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindowConfig {
    pub earliest: String,
    pub latest: String,
}

impl DateWindowConfig {
    pub fn new(earliest: &str, latest: &str) -> Self {
        DateWindowConfig {
            earliest: earliest.to_string(),
            latest: latest.to_string(),
        }
    }

    pub fn to_window(&self, name: &str) -> Result<DateWindow, PorkchopError> {
        DateWindow::from_dates(name, &self.earliest, &self.latest)
    }
}

/// Grid step in days, strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeResolution(Days);

impl TimeResolution {
    /// Accept a step computed elsewhere; only the sign is checked.
    pub fn new(days: Days) -> Result<Self, PorkchopError> {
        if days > 0.0 && days.is_finite() {
            Ok(TimeResolution(days))
        } else {
            Err(PorkchopError::NonPositiveResolution(days))
        }
    }

    pub fn days(&self) -> Days {
        self.0
    }
}

impl fmt::Display for TimeResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.0)
    }
}

/// `min(departure_span, arrival_span) · percentage / 100`.
///
/// Both spans must be strictly positive and the percentage inside `(0, 100)`.
pub fn resolution_days(
    departure_span: Days,
    arrival_span: Days,
    percentage: f64,
) -> Result<TimeResolution, PorkchopError> {
    if !(percentage > 0.0 && percentage < 100.0) {
        return Err(PorkchopError::InvalidPercentage(percentage));
    }
    let min_span = departure_span.min(arrival_span);
    if !(min_span > 0.0) {
        return Err(PorkchopError::NonPositiveResolution(min_span));
    }
    TimeResolution::new(min_span * (percentage / 100.0))
}
