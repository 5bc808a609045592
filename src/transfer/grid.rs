//! # Porkchop result grid
//!
//! A [`PorkchopGrid`] is the atomic output of the evaluator: the departure epochs (rows), the
//! arrival epochs (columns), and one ΔV matrix per leg, all of shape `(n_departure, n_arrival)`.
//! Cells that could not be evaluated (arrival before departure, failed Lambert arc) hold `NaN`.
//!
//! The grid is **read-only** once built. The plotting views ([`PorkchopGrid::panels`]) return
//! fresh matrices, so no consumer can alter what the next one sees.
//!
//! ## Metrics
//!
//! | [`CostMetric`] | per leg        | combined                 |
//! |----------------|----------------|--------------------------|
//! | `DeltaV`       | `ΔV` (km/s)    | `ΔV_dep + ΔV_arr`        |
//! | `C3`           | `ΔV²` (km²/s²) | `ΔV_dep² + ΔV_arr²`      |

use std::fmt;

use hifitime::Epoch;
use itertools::{iproduct, Itertools};
use nalgebra::DMatrix;

use crate::{
    constants::{Days, KmPerSec},
    porkchop_errors::PorkchopError,
    time::span_days,
};

/// Quantity displayed and minimised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostMetric {
    /// Hyperbolic excess speed (km/s)
    #[default]
    DeltaV,
    /// Characteristic energy `ΔV²` (km²/s²)
    C3,
}

impl CostMetric {
    pub fn from_energy_flag(energy_metric: bool) -> Self {
        if energy_metric {
            CostMetric::C3
        } else {
            CostMetric::DeltaV
        }
    }

    fn apply(&self, dv: f64) -> f64 {
        match self {
            CostMetric::DeltaV => dv,
            CostMetric::C3 => dv * dv,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CostMetric::DeltaV => "ΔV",
            CostMetric::C3 => "C3",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            CostMetric::DeltaV => "km/s",
            CostMetric::C3 => "km²/s²",
        }
    }
}

impl fmt::Display for CostMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.label(), self.unit())
    }
}

/// One leg of the transfer, or both summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Departure,
    Arrival,
    Total,
}

impl Leg {
    pub fn label(&self) -> &'static str {
        match self {
            Leg::Departure => "departure",
            Leg::Arrival => "arrival",
            Leg::Total => "total",
        }
    }
}

/// Lowest-cost cell of a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestTransfer {
    pub departure_index: usize,
    pub arrival_index: usize,
    pub departure: Epoch,
    pub arrival: Epoch,
    pub time_of_flight: Days,
    pub dv_departure: KmPerSec,
    pub dv_arrival: KmPerSec,
    /// Value of the minimised view at this cell
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PorkchopGrid {
    departure_body: String,
    target_body: String,
    departure_epochs: Vec<Epoch>,
    arrival_epochs: Vec<Epoch>,
    dv_departure: DMatrix<f64>,
    dv_arrival: DMatrix<f64>,
}

impl PorkchopGrid {
    /// Assemble a grid, checking that both matrices are `(n_departure, n_arrival)`.
    pub fn new(
        departure_body: &str,
        target_body: &str,
        departure_epochs: Vec<Epoch>,
        arrival_epochs: Vec<Epoch>,
        dv_departure: DMatrix<f64>,
        dv_arrival: DMatrix<f64>,
    ) -> Result<Self, PorkchopError> {
        let expected = (departure_epochs.len(), arrival_epochs.len());
        for matrix in [&dv_departure, &dv_arrival] {
            if matrix.shape() != expected {
                return Err(PorkchopError::GridShapeMismatch {
                    expected,
                    found: matrix.shape(),
                });
            }
        }

        Ok(PorkchopGrid {
            departure_body: departure_body.to_string(),
            target_body: target_body.to_string(),
            departure_epochs,
            arrival_epochs,
            dv_departure,
            dv_arrival,
        })
    }

    pub fn departure_body(&self) -> &str {
        &self.departure_body
    }

    pub fn target_body(&self) -> &str {
        &self.target_body
    }

    pub fn departure_epochs(&self) -> &[Epoch] {
        &self.departure_epochs
    }

    pub fn arrival_epochs(&self) -> &[Epoch] {
        &self.arrival_epochs
    }

    pub fn dv_departure(&self) -> &DMatrix<f64> {
        &self.dv_departure
    }

    pub fn dv_arrival(&self) -> &DMatrix<f64> {
        &self.dv_arrival
    }

    /// `(n_departure, n_arrival)`
    pub fn shape(&self) -> (usize, usize) {
        (self.departure_epochs.len(), self.arrival_epochs.len())
    }

    /// Number of cells without a value.
    pub fn nan_count(&self) -> usize {
        self.dv_departure
            .iter()
            .zip(self.dv_arrival.iter())
            .filter(|(d, a)| d.is_nan() || a.is_nan())
            .count()
    }

    /// Time of flight of cell `(i, j)` in days (negative when arrival precedes departure).
    pub fn time_of_flight(&self, i: usize, j: usize) -> Days {
        span_days(self.departure_epochs[i], self.arrival_epochs[j])
    }

    /// Matrix of one leg (or of the total) under a metric.
    pub fn view(&self, metric: CostMetric, leg: Leg) -> DMatrix<f64> {
        match leg {
            Leg::Departure => self.dv_departure.map(|dv| metric.apply(dv)),
            Leg::Arrival => self.dv_arrival.map(|dv| metric.apply(dv)),
            Leg::Total => self
                .dv_departure
                .zip_map(&self.dv_arrival, |d, a| metric.apply(d) + metric.apply(a)),
        }
    }

    /// The views a plot shows: the summed legs when `combined`, otherwise departure and arrival
    /// side by side.
    pub fn panels(&self, metric: CostMetric, combined: bool) -> Vec<(Leg, DMatrix<f64>)> {
        if combined {
            vec![(Leg::Total, self.view(metric, Leg::Total))]
        } else {
            vec![
                (Leg::Departure, self.view(metric, Leg::Departure)),
                (Leg::Arrival, self.view(metric, Leg::Arrival)),
            ]
        }
    }

    fn best_cell(&self, i: usize, j: usize, value: f64) -> BestTransfer {
        BestTransfer {
            departure_index: i,
            arrival_index: j,
            departure: self.departure_epochs[i],
            arrival: self.arrival_epochs[j],
            time_of_flight: self.time_of_flight(i, j),
            dv_departure: self.dv_departure[(i, j)],
            dv_arrival: self.dv_arrival[(i, j)],
            value,
        }
    }

    /// The `n` cheapest cells, ascending. The total is minimised when `combined`, the departure
    /// leg (launch energy) otherwise. `NaN` cells never rank.
    pub fn best_transfers(&self, metric: CostMetric, combined: bool, n: usize) -> Vec<BestTransfer> {
        let leg = if combined { Leg::Total } else { Leg::Departure };
        let values = self.view(metric, leg);
        let (rows, cols) = self.shape();

        iproduct!(0..rows, 0..cols)
            .filter(|&(i, j)| !values[(i, j)].is_nan() && !self.dv_arrival[(i, j)].is_nan())
            .sorted_by(|&a, &b| values[a].total_cmp(&values[b]))
            .take(n)
            .map(|(i, j)| self.best_cell(i, j, values[(i, j)]))
            .collect()
    }

    /// Cheapest cell, see [`PorkchopGrid::best_transfers`]; `None` when every cell is `NaN`.
    pub fn best_transfer(&self, metric: CostMetric, combined: bool) -> Option<BestTransfer> {
        self.best_transfers(metric, combined, 1).into_iter().next()
    }
}
