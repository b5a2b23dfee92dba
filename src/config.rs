use std::fmt;
use std::time::Duration;

use crate::ramp::{RampError, StepPlan};

/// A validated ramp configuration. Read-only once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampConfig {
    step_count: u32,
    step_duration_secs: u32,
    gpio_line: u8,
    debug: bool,
}

impl RampConfig {
    pub fn new(
        step_count: u32,
        step_duration_secs: u32,
        gpio_line: u8,
        debug: bool,
    ) -> Result<Self, RampError> {
        if step_count < 1 {
            return Err(RampError::Configuration(
                "the ramp needs at least 1 step".to_string(),
            ));
        }
        // Debug mode holds every step for 1 second whatever was asked for
        if step_duration_secs < 1 && !debug {
            return Err(RampError::Configuration(
                "each step has to last at least 1 second".to_string(),
            ));
        }

        Ok(RampConfig {
            step_count,
            step_duration_secs,
            gpio_line,
            debug,
        })
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// The step duration as given, before the debug override
    pub fn step_duration_secs(&self) -> u32 {
        self.step_duration_secs
    }

    pub fn gpio_line(&self) -> u8 {
        self.gpio_line
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// How long each step is held. Always 1 second in debug mode.
    pub fn step_duration(&self) -> Duration {
        if self.debug {
            Duration::from_secs(1)
        } else {
            Duration::from_secs(u64::from(self.step_duration_secs))
        }
    }

    /// The steps of the ramp, dimmest first
    pub fn plans(&self) -> impl Iterator<Item = StepPlan> {
        let count = self.step_count;
        (1..=count).rev().map(move |index| StepPlan::new(index, count))
    }
}

impl fmt::Display for RampConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of Steps = {}", self.step_count)?;
        writeln!(f, "GPIO = {}", self.gpio_line)?;
        write!(f, "Step Duration = {}", self.step_duration_secs)?;
        if self.debug {
            write!(f, " (1 in debug mode)")?;
        }
        Ok(())
    }
}
