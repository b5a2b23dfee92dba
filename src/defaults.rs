use std::env::var;

pub fn gpio() -> u8 {
    var("SUNRISE_GPIO")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(4)
}

pub fn num_steps() -> u32 {
    15
}

/// Seconds each brightness level is held
pub fn step_duration_secs() -> u32 {
    60
}

/// Set SUNRISE_HARDWARE=0 to run against simulated GPIO
pub fn hardware_enabled() -> bool {
    var("SUNRISE_HARDWARE").map(|v| v.trim() != "0").unwrap_or(true)
}
