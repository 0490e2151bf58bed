use std::time::Duration;

use crate::foundation::error::{ScrollscapeError, ScrollscapeResult};

/// Nominal refresh interval assumed for the very first wall-clock tick.
pub const NOMINAL_FRAME: Duration = Duration::from_nanos(16_666_667);

/// Largest elapsed time a single wall-clock tick may account for.
///
/// A stalled host (backgrounded tab, debugger pause) must not make the wave jump.
pub const MAX_TICK_DELTA: Duration = Duration::from_millis(250);

/// How the animation time accumulator advances per tick.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeStep {
    /// Advance by real elapsed time, independent of refresh rate.
    WallClock {
        /// Time units per second of elapsed time.
        units_per_second: f64,
    },
    /// Advance a fixed amount per tick, so speed follows the refresh rate.
    FixedPerTick {
        /// Units added per tick.
        step: f64,
    },
}

impl Default for TimeStep {
    fn default() -> Self {
        // 0.05 per tick at 60 Hz.
        Self::WallClock {
            units_per_second: 3.0,
        }
    }
}

impl TimeStep {
    /// The per-tick cadence of the original ambient background.
    pub const PER_TICK: Self = Self::FixedPerTick { step: 0.05 };

    pub(crate) fn validate(&self) -> ScrollscapeResult<()> {
        let v = match *self {
            Self::WallClock { units_per_second } => units_per_second,
            Self::FixedPerTick { step } => step,
        };
        if !v.is_finite() || v < 0.0 {
            return Err(ScrollscapeError::validation(
                "time step must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Monotonic time accumulator owned by one scheduler.
#[derive(Clone, Debug)]
pub struct TimeAccumulator {
    step: TimeStep,
    t: f64,
    last: Option<Duration>,
}

impl TimeAccumulator {
    /// Start at `t = 0`.
    pub fn new(step: TimeStep) -> Self {
        Self {
            step,
            t: 0.0,
            last: None,
        }
    }

    /// Current time.
    pub fn time(&self) -> f64 {
        self.t
    }

    /// Advance for a tick fired at host time `at` and return the new time.
    pub fn advance(&mut self, at: Duration) -> f64 {
        match self.step {
            TimeStep::FixedPerTick { step } => self.t += step,
            TimeStep::WallClock { units_per_second } => {
                let dt = match self.last {
                    None => NOMINAL_FRAME,
                    Some(prev) => at.saturating_sub(prev).min(MAX_TICK_DELTA),
                };
                self.t += dt.as_secs_f64() * units_per_second;
            }
        }
        self.last = Some(at);
        self.t
    }
}

#[cfg(test)]
#[path = "../../tests/unit/anim/clock.rs"]
mod tests;
