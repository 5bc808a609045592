//! Plot case records and rendering style.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::{porkchop_errors::PorkchopError, transfer::grid::CostMetric};

/// One output image: which quantity, how the legs are combined, where values are clipped and
/// where the image goes.
///
/// | field           | default | meaning                                             |
/// |-----------------|---------|-----------------------------------------------------|
/// | `energy_metric` | `false` | plot C3 = ΔV² (km²/s²) instead of ΔV (km/s)         |
/// | `combined`      | `false` | one panel with the summed legs instead of two       |
/// | `threshold`     | `10.0`  | values above it share the top colour band           |
/// | `output_path`   | `None`  | PNG destination; `None` renders in memory only      |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotCase {
    pub energy_metric: bool,
    pub combined: bool,
    pub threshold: f64,
    pub output_path: Option<Utf8PathBuf>,
}

impl Default for PlotCase {
    fn default() -> Self {
        PlotCase {
            energy_metric: false,
            combined: false,
            threshold: 10.0,
            output_path: None,
        }
    }
}

impl PlotCase {
    pub fn new(energy_metric: bool, combined: bool, threshold: f64) -> Self {
        PlotCase {
            energy_metric,
            combined,
            threshold,
            output_path: None,
        }
    }

    pub fn with_output(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn metric(&self) -> CostMetric {
        CostMetric::from_energy_flag(self.energy_metric)
    }

    /// Short description used in logs and reports, e.g. `"C3 total ≤ 42"`.
    pub fn label(&self) -> String {
        let legs = if self.combined { "total" } else { "split" };
        format!("{} {legs} ≤ {}", self.metric().label(), self.threshold)
    }

    pub fn validate(&self) -> Result<(), PorkchopError> {
        if !(self.threshold > 0.0 && self.threshold.is_finite()) {
            return Err(PorkchopError::InvalidConfig(format!(
                "plot threshold must be positive, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Raster size and contour settings shared by every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    /// Number of colour bands between the minimum and the threshold
    pub levels: usize,
    /// Draw caption, axes and tick labels (needs a system font)
    pub annotate: bool,
}

impl Default for PlotStyle {
    fn default() -> Self {
        PlotStyle {
            width: 1200,
            height: 900,
            levels: 10,
            annotate: true,
        }
    }
}

impl PlotStyle {
    pub fn validate(&self) -> Result<(), PorkchopError> {
        if self.width < 16 || self.height < 16 {
            return Err(PorkchopError::InvalidConfig(format!(
                "plot size {}×{} is too small",
                self.width, self.height
            )));
        }
        if self.levels == 0 {
            return Err(PorkchopError::InvalidConfig(
                "plot needs at least one contour level".into(),
            ));
        }
        Ok(())
    }
}
