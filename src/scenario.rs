//! # Scenario configuration
//!
//! [`ScenarioConfig`] gathers every literal of a porkchop run: the ephemeris source, the body
//! set and its frame, the departure and target bodies, the four window dates, the window
//! percentage used for the grid resolution, an optional cache file, and the plot cases.
//!
//! The default scenario is the 2005 Earth → Mars opportunity:
//!
//! | field                    | default                                   |
//! |--------------------------|-------------------------------------------|
//! | `ephemeris`              | `"naif:DE440"`                            |
//! | `bodies`                 | `["Sun", "Earth", "Mars"]`                |
//! | `frame_origin`           | `Sun`                                     |
//! | `frame_orientation`      | `ECLIPJ2000`                              |
//! | `departure_window`       | 2005-04-30 → 2005-10-07                   |
//! | `arrival_window`         | 2005-11-16 → 2006-12-21                   |
//! | `time_window_percentage` | `0.5` (0.8 day steps)                     |
//! | `plot`                   | ΔV and C3, split and total, in `figures/` |
//!
//! A scenario is built either with [`ScenarioConfig::builder`] or read from TOML with
//! [`ScenarioConfig::from_toml_file`]; both paths end with [`ScenarioConfig::validate`], so
//! parameter errors surface before anything is loaded or computed.
//!
//! ```toml
//! ephemeris = "analytic"
//! time_window_percentage = 1.0
//!
//! [departure_window]
//! earliest = "2005-04-30"
//! latest = "2005-10-07"
//!
//! [[plot]]
//! energy_metric = true
//! combined = true
//! threshold = 42.0
//! output_path = "figures/C3_total.png"
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::{
    bodies::{Body, FrameOrigin},
    plot::plot_case::{PlotCase, PlotStyle},
    porkchop_errors::PorkchopError,
    ref_system::FrameOrientation,
    transfer::window::{DateWindowConfig, TimeResolution, TransferWindow},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Ephemeris source descriptor, see [`crate::environment::Environment::new`]
    pub ephemeris: String,
    pub bodies: Vec<String>,
    pub frame_origin: FrameOrigin,
    pub frame_orientation: FrameOrientation,
    pub departure_body: String,
    pub target_body: String,
    pub departure_window: DateWindowConfig,
    pub arrival_window: DateWindowConfig,
    /// Grid step as a percentage of the smaller window, in `(0, 100)`
    pub time_window_percentage: f64,
    /// Parquet file holding the evaluated grid between runs
    pub cache: Option<Utf8PathBuf>,
    pub plot: Vec<PlotCase>,
    pub style: PlotStyle,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        ScenarioConfig {
            ephemeris: "naif:DE440".into(),
            bodies: vec!["Sun".into(), "Earth".into(), "Mars".into()],
            frame_origin: FrameOrigin::Sun,
            frame_orientation: FrameOrientation::EclipJ2000,
            departure_body: "Earth".into(),
            target_body: "Mars".into(),
            departure_window: DateWindowConfig::new("2005-04-30", "2005-10-07"),
            arrival_window: DateWindowConfig::new("2005-11-16", "2006-12-21"),
            time_window_percentage: 0.5,
            cache: None,
            plot: default_plot_cases(),
            style: PlotStyle::default(),
        }
    }
}

/// ΔV and C3, split and total, saved under `figures/`.
pub fn default_plot_cases() -> Vec<PlotCase> {
    vec![
        PlotCase::new(false, false, 15.0).with_output("figures/Delta_V.png"),
        PlotCase::new(true, false, 42.0).with_output("figures/C3.png"),
        PlotCase::new(false, true, 15.0).with_output("figures/Delta_V_total.png"),
        PlotCase::new(true, true, 42.0).with_output("figures/C3_total.png"),
    ]
}

impl ScenarioConfig {
    pub fn builder() -> ScenarioConfigBuilder {
        ScenarioConfigBuilder::new()
    }

    /// Parse and validate a TOML scenario; missing fields take their default value.
    pub fn from_toml_str(content: &str) -> Result<Self, PorkchopError> {
        let config: ScenarioConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Utf8Path) -> Result<Self, PorkchopError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Departure and arrival windows (dates parsed, ordering checked).
    pub fn transfer_window(&self) -> Result<TransferWindow, PorkchopError> {
        Ok(TransferWindow::new(
            self.departure_window.to_window("departure")?,
            self.arrival_window.to_window("arrival")?,
        ))
    }

    /// Grid resolution: `min(departure span, arrival span) · percentage / 100`.
    pub fn resolution(&self) -> Result<TimeResolution, PorkchopError> {
        self.transfer_window()?
            .resolution(self.time_window_percentage)
    }

    /// Check the whole scenario without loading the ephemeris.
    ///
    /// Validation rules
    /// -----------------
    /// * both windows parse and satisfy `earliest < latest`,
    /// * `0 < time_window_percentage < 100`,
    /// * the body list is not empty, every name is a known body,
    /// * departure and target bodies are distinct members of the body list,
    /// * every plot case and the plot style are valid.
    pub fn validate(&self) -> Result<(), PorkchopError> {
        self.resolution()?;

        if self.bodies.is_empty() {
            return Err(PorkchopError::InvalidConfig("empty body list".into()));
        }
        let members = self
            .bodies
            .iter()
            .map(|name| name.parse::<Body>())
            .collect::<Result<Vec<_>, _>>()?;

        let departure: Body = self.departure_body.parse()?;
        let target: Body = self.target_body.parse()?;
        for (name, body) in [(&self.departure_body, departure), (&self.target_body, target)] {
            if !members.contains(&body) {
                return Err(PorkchopError::BodyNotInSet(name.clone()));
            }
        }
        if departure == target {
            return Err(PorkchopError::InvalidConfig(format!(
                "departure and target are the same body ({departure})"
            )));
        }

        for case in &self.plot {
            case.validate()?;
        }
        self.style.validate()
    }
}

/// Builder for [`ScenarioConfig`], with validation.
#[derive(Debug, Clone, Default)]
pub struct ScenarioConfigBuilder {
    config: ScenarioConfig,
}

impl ScenarioConfigBuilder {
    /// Builder initialised with the default scenario.
    pub fn new() -> Self {
        Self {
            config: ScenarioConfig::default(),
        }
    }

    pub fn ephemeris(mut self, v: impl Into<String>) -> Self {
        self.config.ephemeris = v.into();
        self
    }

    pub fn bodies<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.config.bodies = names.iter().map(|n| n.as_ref().to_string()).collect();
        self
    }

    pub fn frame_origin(mut self, v: FrameOrigin) -> Self {
        self.config.frame_origin = v;
        self
    }

    pub fn frame_orientation(mut self, v: FrameOrientation) -> Self {
        self.config.frame_orientation = v;
        self
    }

    pub fn departure_body(mut self, v: impl Into<String>) -> Self {
        self.config.departure_body = v.into();
        self
    }

    pub fn target_body(mut self, v: impl Into<String>) -> Self {
        self.config.target_body = v.into();
        self
    }

    pub fn departure_window(mut self, earliest: &str, latest: &str) -> Self {
        self.config.departure_window = DateWindowConfig::new(earliest, latest);
        self
    }

    pub fn arrival_window(mut self, earliest: &str, latest: &str) -> Self {
        self.config.arrival_window = DateWindowConfig::new(earliest, latest);
        self
    }

    pub fn time_window_percentage(mut self, v: f64) -> Self {
        self.config.time_window_percentage = v;
        self
    }

    pub fn cache(mut self, path: Option<Utf8PathBuf>) -> Self {
        self.config.cache = path;
        self
    }

    /// Replace the plot cases.
    pub fn plot_cases(mut self, cases: Vec<PlotCase>) -> Self {
        self.config.plot = cases;
        self
    }

    pub fn add_plot_case(mut self, case: PlotCase) -> Self {
        self.config.plot.push(case);
        self
    }

    pub fn style(mut self, v: PlotStyle) -> Self {
        self.config.style = v;
        self
    }

    /// Validate and return the scenario, see [`ScenarioConfig::validate`].
    pub fn build(self) -> Result<ScenarioConfig, PorkchopError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
