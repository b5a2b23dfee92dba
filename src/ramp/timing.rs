use std::time::Duration;

use crate::ramp::curve::dark_fraction;

/// Off time plus on time for every step, in microseconds
pub const CYCLE_MICROS: f64 = 10_000.0;

/// Splits one PWM cycle into `(off_micros, on_micros)` for a dark fraction.
///
/// The scaling is fixed: each percent of darkness is 100µs of off time.
/// Nothing is clamped.
pub fn cycle_timing(dark_fraction_percent: f64) -> (f64, f64) {
    let off = dark_fraction_percent * 100.0;
    let on = (100.0 - dark_fraction_percent) * 100.0;
    (off, on)
}

/// Everything needed to run one step of the ramp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    pub step_index: u32,
    pub dark_fraction_percent: f64,
    pub off_micros: f64,
    pub on_micros: f64,
}

impl StepPlan {
    pub fn new(step_index: u32, step_count: u32) -> Self {
        let dark_fraction_percent = dark_fraction(step_index, step_count);
        let (off_micros, on_micros) = cycle_timing(dark_fraction_percent);
        StepPlan {
            step_index,
            dark_fraction_percent,
            off_micros,
            on_micros,
        }
    }

    /// How long the line is held low each cycle, truncated to whole microseconds
    pub fn off_duration(&self) -> Duration {
        Duration::from_micros(self.off_micros as u64)
    }

    /// How long the line is held high each cycle, truncated to whole microseconds
    pub fn on_duration(&self) -> Duration {
        Duration::from_micros(self.on_micros as u64)
    }
}
