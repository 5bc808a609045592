//! # Porkchop plot rendering
//!
//! [`plot_porkchop`] turns a [`PorkchopGrid`] into a raster heat map with discrete contour
//! bands: departure date along `x`, arrival date along `y`, one panel for the summed legs or two
//! side-by-side panels (departure | arrival) for split legs.
//!
//! Every plot is rendered into memory. With [`PlotCase::output_path`] set, the same drawing is
//! also written as a PNG (parent directories are created); without it no file is touched.
//!
//! The grid is only borrowed: all panel values are fresh matrices computed by
//! [`PorkchopGrid::panels`].

use camino::{Utf8Path, Utf8PathBuf};
use nalgebra::DMatrix;
use plotters::{coord::Shift, prelude::*};
use tracing::info;

use crate::{
    constants::Days,
    porkchop_errors::PorkchopError,
    time::{days, format_date, span_days},
    transfer::grid::{CostMetric, Leg, PorkchopGrid},
};

use super::{
    colormap::ContourBands,
    plot_case::{PlotCase, PlotStyle},
};

/// Minimum of one panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelMinimum {
    pub departure_index: usize,
    pub arrival_index: usize,
    pub value: f64,
}

/// What was drawn in one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSummary {
    pub leg: Leg,
    pub minimum: Option<PanelMinimum>,
    /// Lower edge of each colour band
    pub band_edges: Vec<f64>,
    /// Cells at or above the threshold
    pub clipped_cells: usize,
}

/// An in-memory rendering of a plot case.
#[derive(Debug, Clone)]
pub struct RenderedPlot {
    pub width: u32,
    pub height: u32,
    /// RGB8 pixels, row-major, `width · height · 3` bytes
    pub pixels: Vec<u8>,
    pub panels: Vec<PanelSummary>,
    /// PNG written by this call, if any
    pub saved_to: Option<Utf8PathBuf>,
}

impl RenderedPlot {
    /// RGB value of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = 3 * (y as usize * self.width as usize + x as usize);
        Some([
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        ])
    }
}

fn plot_error<E: std::fmt::Display>(err: E) -> PorkchopError {
    PorkchopError::PlotError(err.to_string())
}

/// Coordinates (days from the first epoch) of an axis and the width of one cell.
fn axis_days(epochs: &[hifitime::Epoch]) -> (Vec<Days>, Days) {
    let origin = epochs[0];
    let offsets: Vec<Days> = epochs.iter().map(|e| span_days(origin, *e)).collect();
    let step = if offsets.len() > 1 {
        offsets[1] - offsets[0]
    } else {
        1.0
    };
    (offsets, step)
}

fn panel_minimum(values: &DMatrix<f64>) -> Option<PanelMinimum> {
    let (rows, cols) = values.shape();
    (0..rows)
        .flat_map(|i| (0..cols).map(move |j| (i, j)))
        .filter(|&ij| !values[ij].is_nan())
        .min_by(|&a, &b| values[a].total_cmp(&values[b]))
        .map(|(i, j)| PanelMinimum {
            departure_index: i,
            arrival_index: j,
            value: values[(i, j)],
        })
}

fn panel_caption(grid: &PorkchopGrid, metric: CostMetric, leg: Leg, threshold: f64) -> String {
    format!(
        "{} → {}: {} {} (≤ {threshold} {})",
        grid.departure_body(),
        grid.target_body(),
        metric.label(),
        leg.label(),
        metric.unit()
    )
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    grid: &PorkchopGrid,
    metric: CostMetric,
    leg: Leg,
    values: &DMatrix<f64>,
    case: &PlotCase,
    style: &PlotStyle,
) -> Result<PanelSummary, PorkchopError> {
    let (x_days, dx) = axis_days(grid.departure_epochs());
    let (y_days, dy) = axis_days(grid.arrival_epochs());
    let x_range = (x_days[0] - dx / 2.0)..(x_days[x_days.len() - 1] + dx / 2.0);
    let y_range = (y_days[0] - dy / 2.0)..(y_days[y_days.len() - 1] + dy / 2.0);

    let minimum = panel_minimum(values);
    let bands = ContourBands::new(
        minimum.map_or(case.threshold, |m| m.value),
        case.threshold,
        style.levels,
    );

    let (_, height) = area.dim_in_pixel();
    let mut builder = ChartBuilder::on(area);
    builder.margin(height / 40);
    if style.annotate {
        builder
            .caption(
                panel_caption(grid, metric, leg, case.threshold),
                ("sans-serif", height / 30).into_font(),
            )
            .x_label_area_size(height / 12)
            .y_label_area_size(height / 8);
    }
    let mut chart = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_error)?;

    if style.annotate {
        let departure0 = grid.departure_epochs()[0];
        let arrival0 = grid.arrival_epochs()[0];
        let x_fmt = |d: &f64| format_date(departure0 + days(*d));
        let y_fmt = |d: &f64| format_date(arrival0 + days(*d));
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Departure (TDB)")
            .y_desc("Arrival (TDB)")
            .x_labels(6)
            .y_labels(8)
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .label_style(("sans-serif", height / 50).into_font())
            .draw()
            .map_err(plot_error)?;
    }

    let mut clipped_cells = 0;
    let mut cells = Vec::with_capacity(values.len());
    for (i, x) in x_days.iter().enumerate() {
        for (j, y) in y_days.iter().enumerate() {
            let value = values[(i, j)];
            let Some(band) = bands.band(value) else {
                continue;
            };
            if value >= case.threshold {
                clipped_cells += 1;
            }
            cells.push(Rectangle::new(
                [(x - dx / 2.0, y - dy / 2.0), (x + dx / 2.0, y + dy / 2.0)],
                bands.color(band).filled(),
            ));
        }
    }
    chart.draw_series(cells).map_err(plot_error)?;

    if let Some(min) = minimum {
        let at = (x_days[min.departure_index], y_days[min.arrival_index]);
        let radius = (height / 90).max(3) as i32;
        chart
            .draw_series([
                Circle::new(at, radius, WHITE.filled()),
                Circle::new(at, radius, BLACK.stroke_width(2)),
            ])
            .map_err(plot_error)?;
    }

    Ok(PanelSummary {
        leg,
        minimum,
        band_edges: bands.edges(),
        clipped_cells,
    })
}

fn draw_plot<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    grid: &PorkchopGrid,
    case: &PlotCase,
    style: &PlotStyle,
) -> Result<Vec<PanelSummary>, PorkchopError> {
    root.fill(&WHITE).map_err(plot_error)?;

    let metric = case.metric();
    let panels = grid.panels(metric, case.combined);
    let areas = root.split_evenly((1, panels.len()));

    let summaries = areas
        .iter()
        .zip(panels.iter())
        .map(|(area, (leg, values))| draw_panel(area, grid, metric, *leg, values, case, style))
        .collect::<Result<Vec<_>, _>>()?;

    root.present().map_err(plot_error)?;
    Ok(summaries)
}

fn save_png(
    path: &Utf8Path,
    grid: &PorkchopGrid,
    case: &PlotCase,
    style: &PlotStyle,
) -> Result<(), PorkchopError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    draw_plot(&root, grid, case, style)?;
    Ok(())
}

/// Render a porkchop plot.
///
/// Arguments
/// -----------------
/// * `grid`: evaluated grid, read only
/// * `case`: metric, leg combination, threshold and optional PNG destination
/// * `style`: raster size, number of colour bands and annotations
///
/// Return
/// ----------
/// * The [`RenderedPlot`], or
///   - [`PorkchopError::InvalidConfig`] for an invalid case or style,
///   - [`PorkchopError::GridShapeMismatch`] for a grid without cells,
///   - [`PorkchopError::PlotError`] / [`PorkchopError::IoError`] when drawing or writing fails.
pub fn plot_porkchop(
    grid: &PorkchopGrid,
    case: &PlotCase,
    style: &PlotStyle,
) -> Result<RenderedPlot, PorkchopError> {
    case.validate()?;
    style.validate()?;

    let shape = grid.shape();
    if shape.0 == 0 || shape.1 == 0 {
        return Err(PorkchopError::GridShapeMismatch {
            expected: (shape.0.max(1), shape.1.max(1)),
            found: shape,
        });
    }

    let mut pixels = vec![255u8; style.width as usize * style.height as usize * 3];
    let panels = {
        let root =
            BitMapBackend::with_buffer(&mut pixels, (style.width, style.height)).into_drawing_area();
        draw_plot(&root, grid, case, style)?
    };

    let saved_to = match &case.output_path {
        Some(path) => {
            save_png(path, grid, case, style)?;
            info!(case = %case.label(), %path, "porkchop plot saved");
            Some(path.clone())
        }
        None => None,
    };

    Ok(RenderedPlot {
        width: style.width,
        height: style.height,
        pixels,
        panels,
        saved_to,
    })
}

#[cfg(test)]
mod porkchop_plot_test {
    use super::*;
    use crate::time::parse_date;

    fn grid() -> PorkchopGrid {
        let t0 = parse_date("2005-06-01").unwrap();
        let dep: Vec<_> = (0..4).map(|k| t0 + days(k as f64)).collect();
        let arr: Vec<_> = (0..5).map(|k| t0 + days(200.0 + k as f64)).collect();
        let dv_dep = DMatrix::from_fn(4, 5, |i, j| 3.0 + (i as f64 - 1.0).powi(2) + j as f64);
        let mut dv_arr = DMatrix::from_fn(4, 5, |i, j| 2.0 + 0.5 * (j as f64 - 3.0).abs() + i as f64);
        dv_arr[(0, 0)] = f64::NAN;
        PorkchopGrid::new("Earth", "Mars", dep, arr, dv_dep, dv_arr).unwrap()
    }

    fn style() -> PlotStyle {
        PlotStyle {
            width: 160,
            height: 120,
            levels: 4,
            annotate: false,
        }
    }

    #[test]
    fn test_split_panels_in_memory() {
        let grid = grid();
        let rendered = plot_porkchop(&grid, &PlotCase::new(false, false, 6.0), &style()).unwrap();

        assert_eq!(rendered.pixels.len(), 160 * 120 * 3);
        assert_eq!(rendered.saved_to, None);
        assert_eq!(rendered.panels.len(), 2);

        let departure = &rendered.panels[0];
        assert_eq!(departure.leg, Leg::Departure);
        let min = departure.minimum.unwrap();
        assert_eq!((min.departure_index, min.arrival_index), (1, 0));
        assert_eq!(min.value, 3.0);
        assert_eq!(departure.band_edges.len(), 4);
        assert!(departure.clipped_cells > 0);

        // something other than the white background was drawn
        assert!(rendered.pixels.iter().any(|p| *p != 255));
    }

    #[test]
    fn test_combined_c3_panel() {
        let grid = grid();
        let rendered = plot_porkchop(&grid, &PlotCase::new(true, true, 42.0), &style()).unwrap();
        assert_eq!(rendered.panels.len(), 1);
        assert_eq!(rendered.panels[0].leg, Leg::Total);
        let min = rendered.panels[0].minimum.unwrap();
        let expected = grid
            .best_transfer(CostMetric::C3, true)
            .map(|b| b.value)
            .unwrap();
        assert_eq!(min.value, expected);
    }

    #[test]
    fn test_grid_is_not_mutated() {
        let grid = grid();
        let before = grid.clone();
        plot_porkchop(&grid, &PlotCase::new(true, false, 20.0), &style()).unwrap();
        plot_porkchop(&grid, &PlotCase::new(false, true, 8.0), &style()).unwrap();
        assert_eq!(grid.departure_epochs(), before.departure_epochs());
        assert_eq!(grid.dv_departure(), before.dv_departure());
        assert_eq!(grid.dv_arrival()[(1, 1)], before.dv_arrival()[(1, 1)]);
    }

    #[test]
    fn test_invalid_case() {
        let grid = grid();
        assert!(matches!(
            plot_porkchop(&grid, &PlotCase::new(false, false, -1.0), &style()),
            Err(PorkchopError::InvalidConfig(_))
        ));
    }
}
