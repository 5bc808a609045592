//! Tabular summary of the cheapest transfers of a grid.
//!
//! ```rust,ignore
//! use porkchop::transfer::grid::CostMetric;
//!
//! println!("{}", grid.summary(CostMetric::C3, false).with_rows(5));
//! ```

use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::time::format_date;

use super::grid::{CostMetric, PorkchopGrid};

/// Display adaptor listing the best cells of a [`PorkchopGrid`].
pub struct GridSummary<'a> {
    grid: &'a PorkchopGrid,
    metric: CostMetric,
    combined: bool,
    rows: usize,
}

impl<'a> GridSummary<'a> {
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    fn render(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let objective = if self.combined { "total" } else { "departure" };
        table.set_header(vec![
            Cell::new("#"),
            Cell::new("Departure (TDB)"),
            Cell::new("Arrival (TDB)"),
            Cell::new("TOF [d]"),
            Cell::new("ΔV dep [km/s]"),
            Cell::new("ΔV arr [km/s]"),
            Cell::new(format!("{} {objective} [{}]", self.metric.label(), self.metric.unit())),
        ]);

        for (rank, best) in self
            .grid
            .best_transfers(self.metric, self.combined, self.rows)
            .iter()
            .enumerate()
        {
            table.add_row(Row::from(vec![
                Cell::new(rank + 1).set_alignment(CellAlignment::Right),
                Cell::new(format_date(best.departure)),
                Cell::new(format_date(best.arrival)),
                Cell::new(format!("{:.1}", best.time_of_flight)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.3}", best.dv_departure)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.3}", best.dv_arrival)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.3}", best.value)).set_alignment(CellAlignment::Right),
            ]));
        }

        table.to_string()
    }
}

impl fmt::Display for GridSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.grid.shape();
        writeln!(
            f,
            "{} → {} ({rows}×{cols} cells, {} empty)",
            self.grid.departure_body(),
            self.grid.target_body(),
            self.grid.nan_count()
        )?;
        f.write_str(&self.render())
    }
}

impl PorkchopGrid {
    /// Table of the best cells for a metric, 10 rows unless changed with
    /// [`GridSummary::with_rows`].
    pub fn summary(&self, metric: CostMetric, combined: bool) -> GridSummary<'_> {
        GridSummary {
            grid: self,
            metric,
            combined,
            rows: 10,
        }
    }
}
