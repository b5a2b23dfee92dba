/// How much of each PWM cycle the light is off at a step, as a percentage.
///
/// `log(step_index) / log(step_count + 1) * 100`, so step 1 is exactly 0
/// (fully on) and `step_count` is the dimmest step, just short of 100.
/// Both arguments must be at least 1; `RampConfig` guarantees that for
/// every step the driver runs.
pub fn dark_fraction(step_index: u32, step_count: u32) -> f64 {
    let base = f64::from(step_count) + 1.0;
    f64::from(step_index).ln() / base.ln() * 100.0
}
