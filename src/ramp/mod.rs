//! The sunrise itself: the brightness curve, the per-step PWM timing, and
//! the driver that toggles the light through every step.
use log::*;

use crate::clock::WallClock;
use crate::config::RampConfig;
use crate::drivers::gpio::RppalBackend;
use crate::drivers::{GpioBackend, Hardware, HardwareError};

pub mod curve;
pub mod driver;
pub mod timing;

mod ramp_error;
pub use ramp_error::RampError;

pub use curve::dark_fraction;
pub use driver::{RampDriver, RampState};
pub use timing::{cycle_timing, StepPlan};

/// Runs a sunrise on the Pi's GPIO, blocking until it's done
pub fn run_ramp(config: RampConfig) -> Result<(), RampError> {
    run_ramp_with(config, RppalBackend::new)
}

/// Runs a sunrise against whatever backend `setup` produces, on the wall clock
pub fn run_ramp_with<B, F>(config: RampConfig, setup: F) -> Result<(), RampError>
where
    B: GpioBackend,
    F: FnOnce() -> Result<B, HardwareError>,
{
    let hw = Hardware::acquire(setup).map_err(|e| {
        error!("Couldn't acquire the GPIO hardware: {e}");
        RampError::HardwareUnavailable(e)
    })?;
    debug!("GPIO set up, driving GPIO {}", config.gpio_line());

    RampDriver::new(config, WallClock).run(hw)
}
