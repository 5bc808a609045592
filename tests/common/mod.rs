#![allow(dead_code)]

use camino::Utf8PathBuf;
use porkchop::{
    plot::plot_case::PlotStyle,
    scenario::ScenarioConfig,
    transfer::window::{DateWindow, TransferWindow},
};

/// Fresh, empty scratch directory for one test.
pub fn scratch_dir(test_name: &str) -> Utf8PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "porkchop_{test_name}_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    Utf8PathBuf::from_path_buf(dir).unwrap()
}

pub fn small_style() -> PlotStyle {
    PlotStyle {
        width: 240,
        height: 160,
        levels: 6,
        annotate: false,
    }
}

/// The 2005 Earth → Mars windows.
pub fn window_2005() -> TransferWindow {
    TransferWindow::new(
        DateWindow::from_dates("departure", "2005-04-30", "2005-10-07").unwrap(),
        DateWindow::from_dates("arrival", "2005-11-16", "2006-12-21").unwrap(),
    )
}

/// Default 2005 scenario on the analytic ephemeris with a coarse grid and no plot case.
pub fn coarse_scenario(percentage: f64) -> ScenarioConfig {
    ScenarioConfig::builder()
        .ephemeris("analytic")
        .time_window_percentage(percentage)
        .plot_cases(vec![])
        .style(small_style())
        .build()
        .unwrap()
}
