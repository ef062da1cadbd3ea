//! Simulation clock
//!
//! Every component reads time from this clock, which only advances by the
//! elapsed time handed to each tick. Wall-clock time is never consulted.

use serde::{Deserialize, Serialize};

/// Simulation time in time-units since the simulation started.
pub type SimTime = f64;

/// Monotonic simulation clock advanced once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    now: SimTime,
    ticks: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` and return the sanitized step actually applied.
    ///
    /// Negative, NaN or infinite steps are treated as zero.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let step = sanitize_dt(dt);
        self.now += f64::from(step);
        self.ticks += 1;
        step
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Clamp an elapsed-time value to a finite, non-negative step.
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}
