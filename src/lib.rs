//! # porkchop
//!
//! Launch window exploration: evaluate the cost of ballistic planet-to-planet transfers over a
//! grid of departure and arrival dates and render the classic *porkchop* contour plots.
//!
//! ## Pipeline
//!
//! 1. [`environment::Environment`] loads an ephemeris (NAIF SPK kernel or analytic mean
//!    elements) and builds the [`bodies::BodySet`],
//! 2. [`transfer::window`] turns the four window dates and a percentage into the grid
//!    resolution,
//! 3. [`transfer::porkchop::porkchop`] solves one Lambert arc per cell
//!    ([`lambert::solve_lambert`]) and returns a [`transfer::grid::PorkchopGrid`],
//! 4. [`plot::porkchop_plot::plot_porkchop`] renders ΔV or C3, per leg or summed.
//!
//! [`pipeline::run`] chains the steps from a [`scenario::ScenarioConfig`], with an optional
//! Parquet cache of the grid ([`transfer::cache`]).
//!
//! ## Example
//!
//! ```rust, no_run
//! use porkchop::{pipeline::run, scenario::ScenarioConfig};
//!
//! let config = ScenarioConfig::builder()
//!     .ephemeris("analytic")
//!     .time_window_percentage(2.0)
//!     .build()
//!     .unwrap();
//! let report = run(&config).unwrap();
//! println!("{}", report.grid.summary(porkchop::transfer::grid::CostMetric::DeltaV, true));
//! ```
//!
//! ## Features
//!
//! * `jpl-download`: fetch missing NAIF kernels from the JPL server,
//! * `progress`: progress bar during the grid scan.

pub mod bodies;
pub mod constants;
pub mod environment;
pub mod jpl_ephem;
pub mod kepler;
pub mod lambert;
pub mod pipeline;
pub mod plot;
pub mod porkchop_errors;
pub mod progress_bar;
pub mod ref_system;
pub mod scenario;
pub mod time;
pub mod transfer;

pub use porkchop_errors::PorkchopError;

#[cfg(all(test, feature = "jpl-download"))]
pub(crate) mod unit_test_global {
    use std::sync::LazyLock;

    use crate::environment::Environment;

    pub(crate) static ENV_NAIF_TEST: LazyLock<Environment> = LazyLock::new(|| {
        Environment::new("naif:DE440").expect("valid ephemeris descriptor")
    });
}

#[cfg(all(test, feature = "jpl-download"))]
mod de440_test {
    use crate::{
        bodies::FrameOrigin, constants::AU, environment::Environment,
        ref_system::FrameOrientation, time::parse_date, unit_test_global::ENV_NAIF_TEST,
    };

    #[test]
    fn test_de440_agrees_with_analytic() {
        let naif = ENV_NAIF_TEST
            .create_body_set(&["Sun", "Earth", "Mars"], FrameOrigin::Sun, FrameOrientation::EclipJ2000)
            .unwrap();
        let analytic_env = Environment::new("analytic").unwrap();
        let analytic = analytic_env
            .create_body_set(&["Sun", "Earth", "Mars"], FrameOrigin::Sun, FrameOrientation::EclipJ2000)
            .unwrap();

        let epoch = parse_date("2005-08-15").unwrap();
        for body in ["Earth", "Mars"] {
            let a = naif.state(body, epoch, FrameOrientation::EclipJ2000).unwrap();
            let b = analytic.state(body, epoch, FrameOrientation::EclipJ2000).unwrap();
            assert!((a.position - b.position).norm() / AU < 0.01, "{body}");
            assert!((a.velocity - b.velocity).norm() < 0.2, "{body}");
        }
    }
}
