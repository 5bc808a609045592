use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use porkchop::{
    pipeline::run, porkchop_errors::PorkchopError, scenario::ScenarioConfig,
    transfer::grid::CostMetric,
};

/// Porkchop plots of planet to planet transfer costs.
#[derive(Parser, Debug)]
#[command(name = "porkchop", version, about)]
struct Cli {
    /// TOML scenario file (defaults to Earth → Mars 2005)
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Ephemeris source: "analytic", "naif:DE440", "file:<path>" or a .bsp path
    #[arg(long)]
    ephemeris: Option<String>,

    /// Parquet file caching the evaluated grid
    #[arg(long)]
    cache: Option<Utf8PathBuf>,

    /// Grid step as a percentage of the shortest window
    #[arg(long)]
    percentage: Option<f64>,

    /// Number of best transfers listed
    #[arg(long, default_value_t = 5)]
    best: usize,

    /// Evaluate the grid without rendering any plot
    #[arg(long)]
    no_plots: bool,
}

fn scenario(cli: &Cli) -> Result<ScenarioConfig, PorkchopError> {
    let mut config = match &cli.config {
        Some(path) => ScenarioConfig::from_toml_file(path)?,
        None => ScenarioConfig::default(),
    };
    if let Some(ephemeris) = &cli.ephemeris {
        config.ephemeris = ephemeris.clone();
    }
    if cli.cache.is_some() {
        config.cache = cli.cache.clone();
    }
    if let Some(percentage) = cli.percentage {
        config.time_window_percentage = percentage;
    }
    if cli.no_plots {
        config.plot.clear();
    }
    config.validate()?;
    Ok(config)
}

/// Directives from the `var` environment variable, `info` when unset or invalid.
fn log_filter(var: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(log_filter(EnvFilter::DEFAULT_ENV))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let report = match scenario(&cli).and_then(|config| run(&config)) {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "porkchop run aborted");
            return ExitCode::FAILURE;
        }
    };

    println!("Resolution: {}", report.resolution);
    println!(
        "{}",
        report
            .grid
            .summary(CostMetric::DeltaV, true)
            .with_rows(cli.best)
    );
    println!(
        "{}",
        report.grid.summary(CostMetric::C3, false).with_rows(cli.best)
    );

    for case in &report.plots {
        match &case.outcome {
            Ok(output) => match &output.saved_to {
                Some(path) => println!("{}: saved to {path}", case.case.label()),
                None => println!("{}: rendered", case.case.label()),
            },
            Err(err) => println!("{}: FAILED ({err})", case.case.label()),
        }
    }

    if report.failed_plots().next().is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod main_test {
    use super::*;

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter("PORKCHOP_UNSET_LOG_VARIABLE").to_string(), "info");
    }

    #[test]
    fn test_cli_percentage_override() {
        let cli = Cli::parse_from(["porkchop", "--ephemeris", "analytic", "--percentage", "5"]);
        let config = scenario(&cli).unwrap();
        assert_eq!(config.ephemeris, "analytic");
        assert_eq!(config.resolution().unwrap().days(), 8.0);
    }
}
