//! Progress reporting for the grid scan.
//!
//! With the `progress` feature, [`GridProgress`] drives an `indicatif` bar advanced once per
//! departure row, with the row time smoothed by [`IterTimer`] (exponential moving average
//! `ema ← α·dt + (1−α)·ema`). Without the feature it compiles to nothing.

#[cfg(feature = "progress")]
use std::time::{Duration, Instant};

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// Smoothed duration of the iterations of a loop.
#[cfg(feature = "progress")]
pub struct IterTimer {
    last: Instant,
    ema_ns: f64,
    alpha: f64,
    count: u64,
}

#[cfg(feature = "progress")]
impl IterTimer {
    /// `alpha` in `(0, 1]`; 1 disables smoothing.
    pub fn new(alpha: f64) -> Self {
        Self {
            last: Instant::now(),
            ema_ns: 0.0,
            alpha,
            count: 0,
        }
    }

    /// Close the current iteration and return its duration.
    #[inline]
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        self.count += 1;

        let dt_ns = dt.as_nanos() as f64;
        self.ema_ns = if self.count == 1 {
            dt_ns
        } else {
            self.alpha * dt_ns + (1.0 - self.alpha) * self.ema_ns
        };

        dt
    }

    #[inline]
    pub fn avg(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.ema_ns as u64)
        }
    }
}

/// `"253µs"`, `"42ms"` or `"3.14s"`.
#[cfg(feature = "progress")]
#[inline]
pub fn fmt_dur(d: Duration) -> String {
    let us = d.as_micros();
    if us < 1_000 {
        format!("{us}µs")
    } else if d.as_millis() < 1_000 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.2}s", d.as_secs_f32())
    }
}

/// Row-level progress of a porkchop scan.
pub(crate) struct GridProgress {
    #[cfg(feature = "progress")]
    bar: ProgressBar,
    #[cfg(feature = "progress")]
    timer: IterTimer,
}

#[cfg(feature = "progress")]
impl GridProgress {
    pub(crate) fn new(rows: usize, cols: usize) -> Self {
        let bar = ProgressBar::new(rows.max(1) as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} departures ({percent:>3}%) \
             | ETA {eta_precise} | {msg}",
        ) {
            bar.set_style(style);
        }
        bar.set_message(format!("{cols} arrivals per row"));
        bar.enable_steady_tick(Duration::from_millis(200));
        GridProgress {
            bar,
            timer: IterTimer::new(0.2),
        }
    }

    pub(crate) fn row_done(&mut self) {
        let last = self.timer.tick();
        let avg = self.timer.avg();
        self.bar
            .set_message(format!("last row: {}, avg: {}", fmt_dur(last), fmt_dur(avg)));
        self.bar.inc(1);
    }

    pub(crate) fn finish(self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(not(feature = "progress"))]
impl GridProgress {
    pub(crate) fn new(_rows: usize, _cols: usize) -> Self {
        GridProgress {}
    }

    pub(crate) fn row_done(&mut self) {}

    pub(crate) fn finish(self) {}
}
