//! Porkchop plot rendering: plot cases, colour bands and the raster renderer (`plotters`).

pub mod colormap;
pub mod plot_case;
pub mod porkchop_plot;
