//! # Transfer grid: windows, cost strategies, evaluation and persistence
//!
//! * [`window`] – departure/arrival windows and the grid resolution,
//! * [`cost`] – the [`cost::CostFunction`] strategy and its Lambert default,
//! * [`porkchop`](mod@porkchop) – the grid scan producing a [`grid::PorkchopGrid`],
//! * [`grid`] – result views (ΔV / C3, per leg or combined) and best transfers,
//! * [`cache`] – Parquet save/load of a grid,
//! * [`display`] – table of the best transfers.

pub mod cache;
pub mod cost;
pub mod display;
pub mod grid;
pub mod porkchop;
pub mod window;
