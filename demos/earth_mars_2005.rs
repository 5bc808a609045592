//! Earth → Mars 2005 porkchop on the analytic ephemeris.
//!
//!   cargo run --example earth_mars_2005 [percentage]
//!
//! Writes the four default plots under `figures/` and prints the best transfers.

use porkchop::{
    pipeline::run,
    scenario::ScenarioConfig,
    time::format_date,
    transfer::grid::CostMetric,
    PorkchopError,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), PorkchopError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let percentage = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(2.0);

    let config = ScenarioConfig::builder()
        .ephemeris("analytic")
        .time_window_percentage(percentage)
        .build()?;

    let report = run(&config)?;
    println!("Resolution: {}", report.resolution);
    println!("{}", report.grid.summary(CostMetric::DeltaV, true).with_rows(5));

    if let Some(best) = report.grid.best_transfer(CostMetric::C3, false) {
        println!(
            "Lowest departure C3: {:.2} km²/s² leaving {} arriving {} ({:.0} days)",
            best.value,
            format_date(best.departure),
            format_date(best.arrival),
            best.time_of_flight
        );
    }

    for case in report.failed_plots() {
        if let Err(err) = &case.outcome {
            eprintln!("{}: {err}", case.case.label());
        }
    }
    Ok(())
}
