use std::ops::{Deref, DerefMut};

use log::*;
use thiserror::Error;

pub mod gpio;
pub mod sim;

/// The logical level of a GPIO line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

#[derive(Error, Debug, PartialEq)]
pub enum HardwareError {
    #[error("No hardware connection: {0}")]
    NoConnection(String),
    #[error("GPIO {0} was never configured as an output")]
    LineNotConfigured(u8),
    #[error("Communication error: {0}")]
    CommunicationError(String),
}

impl From<rppal::gpio::Error> for HardwareError {
    fn from(e: rppal::gpio::Error) -> Self {
        match e {
            rppal::gpio::Error::PermissionDenied(path) => {
                HardwareError::NoConnection(format!("permission denied on {path}"))
            }
            other => HardwareError::CommunicationError(format!("{other}")),
        }
    }
}

/// A custom result type using the HardwareError defined above
pub type Result<T> = std::result::Result<T, HardwareError>;

/// The operations the ramp needs from the GPIO hardware.
pub trait GpioBackend {
    /// Configures the line as a digital output
    fn configure_output(&mut self, line: u8) -> Result<()>;
    /// Sets the logical level of a configured line. Must take effect immediately.
    fn write_line(&mut self, line: u8, level: Level) -> Result<()>;
    /// Tears down the hardware mapping. Calling this more than once is a no-op.
    fn release(&mut self);
}

/// An owned hardware handle.
///
/// The backend is released when the handle is dropped, whichever way the
/// owner exits.
pub struct Hardware<B: GpioBackend> {
    backend: B,
}

impl<B: GpioBackend> Hardware<B> {
    /// Runs the one-time setup and wraps the resulting backend
    pub fn acquire<F>(setup: F) -> Result<Self>
    where
        F: FnOnce() -> Result<B>,
    {
        let backend = setup()?;
        trace!("Hardware acquired");
        Ok(Hardware { backend })
    }

    /// Releases the hardware now instead of waiting for the drop
    pub fn release(mut self) {
        self.backend.release();
    }
}

impl<B: GpioBackend> Deref for Hardware<B> {
    type Target = B;

    fn deref(&self) -> &B {
        &self.backend
    }
}

impl<B: GpioBackend> DerefMut for Hardware<B> {
    fn deref_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: GpioBackend> Drop for Hardware<B> {
    fn drop(&mut self) {
        trace!("Releasing hardware");
        self.backend.release();
    }
}
