use std::collections::HashMap;

use log::*;
use rppal::gpio::{Gpio, OutputPin};

use crate::drivers::{GpioBackend, HardwareError, Level, Result};

impl From<Level> for rppal::gpio::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => rppal::gpio::Level::Low,
            Level::High => rppal::gpio::Level::High,
        }
    }
}

/// Memory-mapped GPIO on a Raspberry Pi, through rppal
pub struct RppalBackend {
    gpio: Option<Gpio>,
    pins: HashMap<u8, OutputPin>,
}

impl RppalBackend {
    /// Maps the GPIO registers. Fails if /dev/gpiomem (or /dev/mem) isn't accessible.
    pub fn new() -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| {
            error!("Failed to map the GPIO registers. You probably don't have access to the hardware.");
            HardwareError::from(e)
        })?;
        Ok(RppalBackend {
            gpio: Some(gpio),
            pins: HashMap::new(),
        })
    }
}

impl GpioBackend for RppalBackend {
    fn configure_output(&mut self, line: u8) -> Result<()> {
        let gpio = self
            .gpio
            .as_ref()
            .ok_or_else(|| HardwareError::NoConnection("GPIO already released".to_string()))?;

        trace!("Configuring GPIO {line} as an output");
        let mut pin = gpio.get(line)?.into_output();
        // The light has to stay in whatever state we leave it in
        pin.set_reset_on_drop(false);
        self.pins.insert(line, pin);
        Ok(())
    }

    fn write_line(&mut self, line: u8, level: Level) -> Result<()> {
        let pin = self
            .pins
            .get_mut(&line)
            .ok_or(HardwareError::LineNotConfigured(line))?;
        pin.write(level.into());
        Ok(())
    }

    fn release(&mut self) {
        if self.gpio.is_none() {
            return;
        }
        trace!("Unmapping GPIO, releasing pins {:?}", self.pins.keys());
        self.pins.clear();
        self.gpio = None;
    }
}
