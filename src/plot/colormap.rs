//! Discrete colour bands for the filled contours.
//!
//! Values from the panel minimum up to the threshold are split into `levels` equal bands, each
//! painted with a sample of the *viridis* palette (dark blue for the cheapest transfers, yellow
//! at the threshold). Values above the threshold take the last band.

use plotters::style::RGBColor;

/// Viridis control points, evenly spaced on `[0, 1]`.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

/// Linear interpolation in the viridis palette, `t` clamped to `[0, 1]`.
pub fn viridis(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let k = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - k as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (r0, g0, b0) = VIRIDIS[k];
    let (r1, g1, b1) = VIRIDIS[k + 1];
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Bands between a panel minimum and the display threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourBands {
    min: f64,
    threshold: f64,
    levels: usize,
}

impl ContourBands {
    /// `levels ≥ 1`; a minimum at or above the threshold collapses every value into the top band.
    pub fn new(min: f64, threshold: f64, levels: usize) -> Self {
        ContourBands {
            min,
            threshold,
            levels: levels.max(1),
        }
    }

    /// Band index of a value in `0..levels`, `None` for `NaN`.
    pub fn band(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        let top = self.levels - 1;
        let span = self.threshold - self.min;
        if value >= self.threshold || span <= 0.0 {
            return Some(top);
        }
        let k = ((value - self.min) / span * self.levels as f64).floor();
        Some((k.max(0.0) as usize).min(top))
    }

    pub fn color(&self, band: usize) -> RGBColor {
        if self.levels == 1 {
            viridis(0.0)
        } else {
            viridis(band as f64 / (self.levels - 1) as f64)
        }
    }

    /// Lower edge of every band.
    pub fn edges(&self) -> Vec<f64> {
        let span = (self.threshold - self.min).max(0.0);
        (0..self.levels)
            .map(|k| self.min + span * k as f64 / self.levels as f64)
            .collect()
    }
}

#[cfg(test)]
mod colormap_test {
    use super::*;

    #[test]
    fn test_viridis_ends() {
        assert_eq!(viridis(0.0), RGBColor(68, 1, 84));
        assert_eq!(viridis(1.0), RGBColor(253, 231, 37));
        assert_eq!(viridis(2.0), viridis(1.0));
        assert_eq!(viridis(0.5), RGBColor(33, 144, 141));
    }

    #[test]
    fn test_bands() {
        let bands = ContourBands::new(5.0, 15.0, 10);
        assert_eq!(bands.band(5.0), Some(0));
        assert_eq!(bands.band(5.99), Some(0));
        assert_eq!(bands.band(6.0), Some(1));
        assert_eq!(bands.band(14.99), Some(9));
        assert_eq!(bands.band(15.0), Some(9));
        assert_eq!(bands.band(1e6), Some(9));
        assert_eq!(bands.band(f64::NAN), None);
        assert_eq!(bands.edges().len(), 10);
        assert_eq!(bands.edges()[1], 6.0);
    }

    #[test]
    fn test_degenerate_bands() {
        let bands = ContourBands::new(20.0, 15.0, 4);
        assert_eq!(bands.band(20.0), Some(3));
        assert_eq!(ContourBands::new(1.0, 2.0, 0).band(1.5), Some(0));
    }
}
