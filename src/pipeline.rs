//! # Porkchop pipeline
//!
//! The linear run behind the `porkchop` binary:
//!
//! 1. validate the [`ScenarioConfig`] and derive the grid resolution,
//! 2. load the grid from the cache file when it matches the scenario (epochs, bodies,
//!    ephemeris, frame and cost id), otherwise load the ephemeris, build the body set,
//!    evaluate the grid and refresh the cache,
//! 3. render every plot case.
//!
//! Errors of steps 1 and 2 abort the run. A failing plot case is logged, recorded in the
//! [`RunReport`] and does not prevent the remaining cases from being rendered.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{info, warn};

use crate::{
    environment::Environment,
    plot::{
        plot_case::PlotCase,
        porkchop_plot::{plot_porkchop, PanelSummary},
    },
    porkchop_errors::PorkchopError,
    scenario::ScenarioConfig,
    time::span_days,
    transfer::{
        cache::{load_grid, save_grid, CacheKey, CachedGrid, LAMBERT_COST_ID},
        cost::CostFunction,
        grid::PorkchopGrid,
        porkchop::porkchop,
        window::{TimeResolution, TransferWindow},
    },
};

/// Outcome of one plot case.
#[derive(Debug, PartialEq)]
pub struct CaseReport {
    pub case: PlotCase,
    pub outcome: Result<CaseOutput, PorkchopError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseOutput {
    pub saved_to: Option<Utf8PathBuf>,
    pub panels: Vec<PanelSummary>,
}

/// Everything a run produced.
#[derive(Debug)]
pub struct RunReport {
    pub window: TransferWindow,
    /// Resolution handed to the evaluator
    pub resolution: TimeResolution,
    pub grid: PorkchopGrid,
    /// The grid came from the cache file
    pub from_cache: bool,
    pub plots: Vec<CaseReport>,
}

impl RunReport {
    pub fn failed_plots(&self) -> impl Iterator<Item = &CaseReport> {
        self.plots.iter().filter(|r| r.outcome.is_err())
    }
}

/// Cache key of a scenario evaluated with the cost function `cost_id`.
fn cache_key(config: &ScenarioConfig, cost_id: &str) -> CacheKey {
    CacheKey {
        ephemeris: config.ephemeris.clone(),
        frame_origin: config.frame_origin,
        frame_orientation: config.frame_orientation,
        cost: cost_id.to_string(),
    }
}

/// Whether a cached grid was computed for this scenario.
fn cache_matches(
    cached: &CachedGrid,
    key: &CacheKey,
    config: &ScenarioConfig,
    window: &TransferWindow,
    resolution: TimeResolution,
) -> bool {
    let same_epoch = |a: hifitime::Epoch, b: hifitime::Epoch| span_days(a, b).abs() < 1e-6;
    let grid = &cached.grid;

    cached.key == *key
        && grid.departure_body() == config.departure_body
        && grid.target_body() == config.target_body
        && grid.shape() == window.grid_shape(resolution)
        && same_epoch(grid.departure_epochs()[0], window.departure.earliest())
        && same_epoch(grid.arrival_epochs()[0], window.arrival.earliest())
}

fn load_cached(
    path: &Utf8Path,
    key: &CacheKey,
    config: &ScenarioConfig,
    window: &TransferWindow,
    resolution: TimeResolution,
) -> Option<PorkchopGrid> {
    if !path.exists() {
        return None;
    }
    match load_grid(path) {
        Ok(cached) if cache_matches(&cached, key, config, window, resolution) => {
            Some(cached.grid)
        }
        Ok(_) => {
            warn!(%path, "cached grid does not match the scenario, recomputing");
            None
        }
        Err(err) => {
            warn!(%path, error = %err, "unreadable cache, recomputing");
            None
        }
    }
}

fn evaluate(
    config: &ScenarioConfig,
    window: &TransferWindow,
    resolution: TimeResolution,
    cost: Option<&dyn CostFunction>,
) -> Result<PorkchopGrid, PorkchopError> {
    let env = Environment::new(&config.ephemeris)?;
    let bodies = env.create_body_set(
        &config.bodies,
        config.frame_origin,
        config.frame_orientation,
    )?;

    porkchop(
        &bodies,
        config.frame_orientation,
        &config.departure_body,
        &config.target_body,
        window,
        resolution,
        cost,
    )
}

/// Run the scenario with the default Lambert cost.
pub fn run(config: &ScenarioConfig) -> Result<RunReport, PorkchopError> {
    run_scenario(config, None, Some(LAMBERT_COST_ID))
}

/// Run the scenario with an optional custom cost function.
///
/// A custom cost has no identity the cache could check, so `Some(cost)` neither reads nor
/// writes `config.cache`; use [`run_with_cached_cost`] to cache its grid. `None` is [`run`].
///
/// Return
/// ----------
/// * The [`RunReport`], or the first environment / parameter / evaluation error. Plot errors
///   are reported per case inside the report.
pub fn run_with_cost(
    config: &ScenarioConfig,
    cost: Option<&dyn CostFunction>,
) -> Result<RunReport, PorkchopError> {
    match cost {
        Some(cost) => {
            if let Some(path) = &config.cache {
                info!(%path, "custom cost function, cache bypassed");
            }
            run_scenario(config, Some(cost), None)
        }
        None => run(config),
    }
}

/// Run the scenario with a custom cost function identified by `cost_id` in the cache.
///
/// A cached grid is reused only if it was saved under the same `cost_id`, so two different
/// cost functions must not share an id. [`LAMBERT_COST_ID`] is reserved for the default cost.
pub fn run_with_cached_cost(
    config: &ScenarioConfig,
    cost_id: &str,
    cost: &dyn CostFunction,
) -> Result<RunReport, PorkchopError> {
    if cost_id == LAMBERT_COST_ID {
        return Err(PorkchopError::InvalidConfig(format!(
            "cost id '{LAMBERT_COST_ID}' is reserved for the default cost"
        )));
    }
    run_scenario(config, Some(cost), Some(cost_id))
}

/// `cost_id` is `None` when the cache must be left alone.
fn run_scenario(
    config: &ScenarioConfig,
    cost: Option<&dyn CostFunction>,
    cost_id: Option<&str>,
) -> Result<RunReport, PorkchopError> {
    config.validate()?;
    let window = config.transfer_window()?;
    let resolution = window.resolution(config.time_window_percentage)?;
    info!(
        departure = %window.departure,
        arrival = %window.arrival,
        %resolution,
        "scenario ready"
    );

    let cache = config
        .cache
        .as_deref()
        .zip(cost_id)
        .map(|(path, cost_id)| (path, cache_key(config, cost_id)));

    let cached = cache
        .as_ref()
        .and_then(|(path, key)| load_cached(path, key, config, &window, resolution));
    let from_cache = cached.is_some();

    let grid = match cached {
        Some(grid) => grid,
        None => {
            let grid = evaluate(config, &window, resolution, cost)?;
            if let Some((path, key)) = &cache {
                save_grid(&grid, key, path)?;
            }
            grid
        }
    };
    let plots = config
        .plot
        .iter()
        .map(|case| {
            let outcome = plot_porkchop(&grid, case, &config.style).map(|rendered| CaseOutput {
                saved_to: rendered.saved_to,
                panels: rendered.panels,
            });
            if let Err(err) = &outcome {
                warn!(case = %case.label(), error = %err, "plot case failed");
            }
            CaseReport {
                case: case.clone(),
                outcome,
            }
        })
        .collect();

    Ok(RunReport {
        window,
        resolution,
        grid,
        from_cache,
        plots,
    })
}
