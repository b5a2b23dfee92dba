use crate::drivers::HardwareError;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RampError {
    /// Rejected before any hardware is touched
    #[error("Invalid ramp configuration: {0}")]
    Configuration(String),
    #[error("Couldn't set up the GPIO hardware: {0}")]
    HardwareUnavailable(#[source] HardwareError),
    /// A write failed after the ramp had started
    #[error("Writing to GPIO {line} failed: {source}")]
    HardwareWrite { line: u8, source: HardwareError },
}
