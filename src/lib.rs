pub mod cli;
pub mod clock;
pub mod config;
pub mod defaults;
pub mod drivers;
pub mod ramp;

pub mod prelude {
    pub use crate::clock::{Clock, MonotonicClock, StepBoundary, WallClock};
    pub use crate::config::RampConfig;
    pub use crate::drivers::gpio::RppalBackend;
    pub use crate::drivers::sim::SimBackend;
    pub use crate::drivers::{GpioBackend, Hardware, HardwareError, Level};
    pub use crate::ramp::{run_ramp, run_ramp_with, RampDriver, RampError, RampState, StepPlan};
}
