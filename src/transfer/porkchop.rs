//! # Porkchop evaluator
//!
//! Scans the Cartesian product *departure epochs × arrival epochs* of a [`TransferWindow`] at a
//! given [`TimeResolution`] and stores the cost of every cell in a [`PorkchopGrid`].
//!
//! ## Cells without a value
//!
//! * arrival at or before departure: `NaN`, nothing is computed;
//! * a per-cell failure of the cost function (Lambert arc not converging, 180° transfer,
//!   epoch outside the ephemeris coverage, see [`PorkchopError::is_cell_failure`]): `NaN`, the
//!   failure is logged at `debug` level and counted, the scan goes on.
//!
//! Any other error aborts the scan. Inputs (bodies, resolution) are validated before the first
//! cell is evaluated.

use nalgebra::DMatrix;
use tracing::{debug, info};

use crate::{
    bodies::BodySet,
    porkchop_errors::PorkchopError,
    progress_bar::GridProgress,
    ref_system::FrameOrientation,
    time::format_date,
};

use super::{
    cost::{CostFunction, LambertCost},
    grid::PorkchopGrid,
    window::{TimeResolution, TransferWindow},
};

/// Evaluate the transfer cost over the departure × arrival grid.
///
/// Arguments
/// -----------------
/// * `bodies`: body set holding both bodies
/// * `orientation`: frame orientation the states are expressed in
/// * `departure_body`, `target_body`: names of the bodies in `bodies`
/// * `window`: departure and arrival date windows
/// * `resolution`: grid step, smaller than both window spans
/// * `cost`: cost strategy, [`LambertCost`] when `None`
///
/// Return
/// ----------
/// * The [`PorkchopGrid`] of shape `window.grid_shape(resolution)`, or an error raised before
///   the scan (unknown body, resolution too coarse) or by a non cell-local cost failure.
pub fn porkchop(
    bodies: &BodySet<'_>,
    orientation: FrameOrientation,
    departure_body: &str,
    target_body: &str,
    window: &TransferWindow,
    resolution: TimeResolution,
    cost: Option<&dyn CostFunction>,
) -> Result<PorkchopGrid, PorkchopError> {
    bodies.body(departure_body)?;
    bodies.body(target_body)?;

    if resolution.days() >= window.min_span_days() {
        return Err(PorkchopError::InvalidConfig(format!(
            "resolution of {resolution} is not smaller than the shortest window ({:.3} days)",
            window.min_span_days()
        )));
    }

    let lambert;
    let cost: &dyn CostFunction = match cost {
        Some(cost) => cost,
        None => {
            lambert = LambertCost::new(bodies, orientation, departure_body, target_body)?;
            &lambert
        }
    };

    let departures = window.departure.epochs(resolution);
    let arrivals = window.arrival.epochs(resolution);
    let (rows, cols) = (departures.len(), arrivals.len());

    info!(
        departure_body,
        target_body,
        %resolution,
        rows,
        cols,
        "evaluating porkchop grid"
    );

    let mut dv_departure = DMatrix::from_element(rows, cols, f64::NAN);
    let mut dv_arrival = DMatrix::from_element(rows, cols, f64::NAN);
    let mut failures = 0usize;
    let mut progress = GridProgress::new(rows, cols);

    for (i, &departure) in departures.iter().enumerate() {
        for (j, &arrival) in arrivals.iter().enumerate() {
            if arrival <= departure {
                continue;
            }

            match cost.compute_cost(departure, arrival) {
                Ok(leg) => {
                    dv_departure[(i, j)] = leg.departure;
                    dv_arrival[(i, j)] = leg.arrival;
                }
                Err(err) if err.is_cell_failure() => {
                    failures += 1;
                    debug!(
                        departure = %format_date(departure),
                        arrival = %format_date(arrival),
                        error = %err,
                        "cell left empty"
                    );
                }
                Err(err) => return Err(err),
            }
        }
        progress.row_done();
    }
    progress.finish();

    info!(cells = rows * cols, failures, "porkchop grid done");

    PorkchopGrid::new(
        departure_body,
        target_body,
        departures,
        arrivals,
        dv_departure,
        dv_arrival,
    )
}

#[cfg(test)]
mod porkchop_test {
    use std::cell::Cell;

    use hifitime::Epoch;

    use super::*;
    use crate::{
        bodies::FrameOrigin,
        environment::Environment,
        time::span_days,
        transfer::{cost::LegCost, window::DateWindow},
    };

    fn window(dep: (&str, &str), arr: (&str, &str)) -> TransferWindow {
        TransferWindow::new(
            DateWindow::from_dates("departure", dep.0, dep.1).unwrap(),
            DateWindow::from_dates("arrival", arr.0, arr.1).unwrap(),
        )
    }

    #[test]
    fn test_custom_cost_and_overlapping_windows() {
        let env = Environment::new("analytic").unwrap();
        let bodies = env
            .create_body_set(&["Earth", "Mars"], FrameOrigin::Sun, FrameOrientation::EclipJ2000)
            .unwrap();
        let window = window(("2005-01-01", "2005-01-11"), ("2005-01-06", "2005-01-26"));
        let resolution = TimeResolution::new(5.0).unwrap();

        let calls = Cell::new(0usize);
        let cost = |dep: Epoch, arr: Epoch| -> Result<LegCost, PorkchopError> {
            calls.set(calls.get() + 1);
            Ok(LegCost::new(span_days(dep, arr), 1.0))
        };

        let grid = porkchop(
            &bodies,
            FrameOrientation::EclipJ2000,
            "Earth",
            "Mars",
            &window,
            resolution,
            Some(&cost),
        )
        .unwrap();

        assert_eq!(grid.shape(), (3, 5));
        // departure 2005-01-11 and arrival 2005-01-06 / 2005-01-11 are skipped
        assert!(grid.dv_departure()[(2, 0)].is_nan());
        assert!(grid.dv_departure()[(2, 1)].is_nan());
        assert!(grid.dv_departure()[(1, 0)].is_nan());
        assert_eq!(grid.dv_departure()[(0, 0)], 5.0);
        assert_eq!(grid.dv_departure()[(0, 4)], 25.0);
        assert_eq!(calls.get(), 15 - grid.nan_count());
    }

    #[test]
    fn test_cell_failures_become_nan() {
        let env = Environment::new("analytic").unwrap();
        let bodies = env
            .create_body_set(&["Earth", "Mars"], FrameOrigin::Sun, FrameOrientation::EclipJ2000)
            .unwrap();
        let window = window(("2005-01-01", "2005-01-21"), ("2005-06-01", "2005-06-21"));
        let resolution = TimeResolution::new(10.0).unwrap();

        let cost = |dep: Epoch, _arr: Epoch| -> Result<LegCost, PorkchopError> {
            if dep == window.departure.earliest() {
                Err(PorkchopError::LambertNoConvergence(200))
            } else {
                Ok(LegCost::new(1.0, 2.0))
            }
        };

        let grid = porkchop(
            &bodies,
            FrameOrientation::EclipJ2000,
            "Earth",
            "Mars",
            &window,
            resolution,
            Some(&cost),
        )
        .unwrap();
        assert_eq!(grid.shape(), (3, 3));
        assert_eq!(grid.nan_count(), 3);
        assert_eq!(grid.dv_arrival()[(1, 1)], 2.0);
    }

    #[test]
    fn test_invalid_inputs_abort_before_scan() {
        let env = Environment::new("analytic").unwrap();
        let bodies = env
            .create_body_set(&["Earth", "Mars"], FrameOrigin::Sun, FrameOrientation::EclipJ2000)
            .unwrap();
        let window = window(("2005-01-01", "2005-01-21"), ("2005-06-01", "2005-06-21"));

        let calls = Cell::new(0usize);
        let cost = |_: Epoch, _: Epoch| -> Result<LegCost, PorkchopError> {
            calls.set(calls.get() + 1);
            Ok(LegCost::new(1.0, 1.0))
        };

        let unknown = porkchop(
            &bodies,
            FrameOrientation::EclipJ2000,
            "Earth",
            "Venus",
            &window,
            TimeResolution::new(5.0).unwrap(),
            Some(&cost),
        );
        assert_eq!(unknown, Err(PorkchopError::BodyNotInSet("Venus".into())));

        let coarse = porkchop(
            &bodies,
            FrameOrientation::EclipJ2000,
            "Earth",
            "Mars",
            &window,
            TimeResolution::new(20.0).unwrap(),
            Some(&cost),
        );
        assert!(matches!(coarse, Err(PorkchopError::InvalidConfig(_))));
        assert_eq!(calls.get(), 0);

        let fatal = |_: Epoch, _: Epoch| -> Result<LegCost, PorkchopError> {
            Err(PorkchopError::InvalidConfig("broken cost".into()))
        };
        assert!(porkchop(
            &bodies,
            FrameOrientation::EclipJ2000,
            "Earth",
            "Mars",
            &window,
            TimeResolution::new(5.0).unwrap(),
            Some(&fatal),
        )
        .is_err());
    }

    #[test]
    fn test_default_lambert_cost() {
        let env = Environment::new("analytic").unwrap();
        let bodies = env
            .create_body_set(&["Earth", "Mars"], FrameOrigin::Sun, FrameOrientation::EclipJ2000)
            .unwrap();
        let window = window(("2005-07-20", "2005-09-10"), ("2006-01-15", "2006-04-30"));
        let resolution = window.resolution(25.0).unwrap();

        let grid = porkchop(
            &bodies,
            FrameOrientation::EclipJ2000,
            "Earth",
            "Mars",
            &window,
            resolution,
            None,
        )
        .unwrap();

        assert_eq!(grid.shape(), window.grid_shape(resolution));
        assert_eq!(grid.nan_count(), 0);
        assert!(grid
            .dv_departure()
            .iter()
            .chain(grid.dv_arrival().iter())
            .all(|dv| dv.is_finite() && *dv > 0.0));

        let best = grid
            .best_transfer(crate::transfer::grid::CostMetric::DeltaV, true)
            .unwrap();
        assert!((4.0..12.0).contains(&best.value), "{best:?}");
    }
}
