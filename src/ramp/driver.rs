use log::*;

use crate::clock::{Clock, StepBoundary};
use crate::config::RampConfig;
use crate::drivers::{GpioBackend, Hardware, HardwareError, Level};
use crate::ramp::{RampError, StepPlan};

/// Where the driver is in the ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampState {
    NotStarted,
    /// Holding the step with this index. Counts down to 1.
    RunningStep(u32),
    Completed,
}

/// Runs a ramp on a GPIO line, one step at a time
pub struct RampDriver<C: Clock> {
    config: RampConfig,
    clock: C,
    boundary: StepBoundary,
    state: RampState,
}

impl<C: Clock> RampDriver<C> {
    pub fn new(config: RampConfig, clock: C) -> Self {
        RampDriver {
            config,
            clock,
            boundary: StepBoundary::default(),
            state: RampState::NotStarted,
        }
    }

    /// Changes how the end of each step is detected
    pub fn with_boundary(mut self, boundary: StepBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn state(&self) -> RampState {
        self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Runs the whole ramp, blocking until the light is fully on.
    ///
    /// The hardware is released before this returns, on success or failure.
    pub fn run<B: GpioBackend>(&mut self, mut hw: Hardware<B>) -> Result<(), RampError> {
        let line = self.config.gpio_line();

        hw.configure_output(line)
            .map_err(RampError::HardwareUnavailable)?;
        if let Err(source) = hw.write_line(line, Level::Low) {
            return Err(self.abort(hw, line, source));
        }

        info!(
            "Starting a {} step sunrise on GPIO {line}, {}s per step",
            self.config.step_count(),
            self.config.step_duration().as_secs()
        );

        for plan in self.config.plans() {
            self.state = RampState::RunningStep(plan.step_index);
            debug!("PWM={:.6}", plan.dark_fraction_percent);

            match self.run_step(&mut *hw, &plan) {
                Ok(cycles) => trace!("Step {} ran {cycles} cycles", plan.step_index),
                Err(source) => return Err(self.abort(hw, line, source)),
            }
        }

        hw.write_line(line, Level::High)
            .map_err(|source| RampError::HardwareWrite { line, source })?;
        self.state = RampState::Completed;
        hw.release();

        info!("Sunrise finished, GPIO {line} left fully on");
        Ok(())
    }

    /// Toggles the line with the plan's timing until the step is over.
    /// Returns the number of cycles run.
    fn run_step<B: GpioBackend>(
        &mut self,
        hw: &mut B,
        plan: &StepPlan,
    ) -> Result<u64, HardwareError> {
        let line = self.config.gpio_line();
        let duration = self.config.step_duration();
        let off = plan.off_duration();
        let on = plan.on_duration();

        let start = self.clock.now();
        let mut cycles = 0;
        loop {
            // The time is read before the cycle and checked after it, so the
            // cycle that crosses the boundary still runs to completion
            let now = self.clock.now();

            hw.write_line(line, Level::Low)?;
            self.clock.sleep(off);
            hw.write_line(line, Level::High)?;
            self.clock.sleep(on);
            cycles += 1;

            if self.boundary.reached(start, now, duration) {
                return Ok(cycles);
            }
        }
    }

    /// Best effort at leaving the light on after a fault, then hands back the fault
    fn abort<B: GpioBackend>(
        &mut self,
        mut hw: Hardware<B>,
        line: u8,
        source: HardwareError,
    ) -> RampError {
        error!("GPIO {line} failed during the ramp ({:?}): {source}", self.state);

        if let Err(e) = hw.write_line(line, Level::High) {
            error!("Couldn't leave GPIO {line} fully on: {e}");
        }
        hw.release();

        RampError::HardwareWrite { line, source }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::clock::ManualClock;
    use crate::drivers::sim::{SimBackend, SimEvent};

    fn sim_hardware() -> (Hardware<SimBackend>, SimBackend) {
        let sim = SimBackend::new();
        let monitor = sim.clone();
        (Hardware::acquire(|| Ok(sim)).unwrap(), monitor)
    }

    // Counts the low-then-high cycles between the start reference write and the final high
    fn cycle_count(events: &[SimEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, SimEvent::Write(_, Level::Low)))
            .count()
            - 1
    }

    #[test]
    fn test_single_step_ramp() {
        let config = RampConfig::new(1, 60, 4, false).unwrap();
        let (hw, monitor) = sim_hardware();
        let mut driver = RampDriver::new(config, ManualClock::default());
        assert_eq!(driver.state(), RampState::NotStarted);

        driver.run(hw).unwrap();

        assert_eq!(driver.state(), RampState::Completed);
        assert_eq!(monitor.level(4), Some(Level::High));
        assert!(monitor.released());

        // Every sleep pair is 0µs off, 10000µs on
        let sleeps = &driver.clock().sleeps;
        for pair in sleeps.chunks(2) {
            assert_eq!(pair, [Duration::ZERO, Duration::from_micros(10_000)]);
        }

        // 60s of 10ms cycles, plus the one that crosses the boundary
        let events = monitor.events();
        assert_eq!(cycle_count(&events), 6001);
        assert_eq!(events[0], SimEvent::Configure(4));
        assert_eq!(events[1], SimEvent::Write(4, Level::Low));
        assert_eq!(events[2], SimEvent::Write(4, Level::Low));
        assert_eq!(events[3], SimEvent::Write(4, Level::High));
    }

    #[test]
    fn test_debug_ramp_of_fifteen_steps() {
        let config = RampConfig::new(15, 60, 17, true).unwrap();
        let (hw, monitor) = sim_hardware();
        let mut driver = RampDriver::new(config, ManualClock::default());

        driver.run(hw).unwrap();
        assert_eq!(driver.state(), RampState::Completed);

        // Each step is about a second of toggling
        let total = driver.clock().now();
        assert!(total >= Duration::from_secs(15), "{total:?}");
        assert!(total <= Duration::from_secs(16), "{total:?}");

        // Off times shrink step by step down to nothing
        let offs: Vec<Duration> = driver.clock().sleeps.iter().step_by(2).copied().collect();
        assert_eq!(*offs.last().unwrap(), Duration::ZERO);
        for pair in offs.windows(2) {
            assert!(pair[0] >= pair[1]);
        }

        let events = monitor.events();
        let last_write = events
            .iter()
            .rev()
            .find(|e| matches!(e, SimEvent::Write(..)))
            .unwrap();
        assert_eq!(*last_write, SimEvent::Write(17, Level::High));
        assert_eq!(monitor.level(17), Some(Level::High));
    }

    #[test]
    fn test_whole_second_boundary_cycle_counts() {
        let config = RampConfig::new(2, 1, 4, false).unwrap();
        let (hw, monitor) = sim_hardware();
        let mut driver = RampDriver::new(config, ManualClock::default());
        driver.run(hw).unwrap();

        // Step 2 cycles are 9999µs (6309 off + 3690 on after truncation), so
        // the sample at 1.009899s is the first past the boundary: 102 cycles.
        // Step 1 starts at 1.019898s and with whole seconds runs until the
        // sample at 2.009898s: 100 cycles.
        assert_eq!(cycle_count(&monitor.events()), 202);
    }

    #[test]
    fn test_exact_boundary_cycle_counts() {
        let config = RampConfig::new(2, 1, 4, false).unwrap();
        let (hw, monitor) = sim_hardware();
        let mut driver =
            RampDriver::new(config, ManualClock::default()).with_boundary(StepBoundary::Exact);
        driver.run(hw).unwrap();

        // Step 2 is unchanged at 102 cycles, but step 1 now has to run a
        // full second from 1.019898s: 101 cycles
        assert_eq!(cycle_count(&monitor.events()), 203);
    }

    #[test]
    fn test_sub_second_start_shortens_first_step() {
        let config = RampConfig::new(1, 1, 4, false).unwrap();
        let (hw, monitor) = sim_hardware();
        let clock = ManualClock::starting_at(Duration::from_millis(5_500));
        let mut driver = RampDriver::new(config, clock);
        driver.run(hw).unwrap();

        // Samples at 5.50s .. 6.00s
        assert_eq!(cycle_count(&monitor.events()), 51);
    }

    #[test]
    fn test_write_failure_mid_ramp() {
        let config = RampConfig::new(3, 1, 4, false).unwrap();
        let sim = SimBackend::failing_after(50);
        let monitor = sim.clone();
        let hw = Hardware::acquire(|| Ok(sim)).unwrap();
        let mut driver = RampDriver::new(config, ManualClock::default());

        let res = driver.run(hw);
        assert!(matches!(
            res,
            Err(RampError::HardwareWrite {
                line: 4,
                source: HardwareError::CommunicationError(_)
            })
        ));
        assert_eq!(driver.state(), RampState::RunningStep(3));
        assert!(monitor.released());
        assert_eq!(monitor.write_count(), 50);

        // The fault itself, then the attempt to leave the light on
        let failed: Vec<SimEvent> = monitor
            .events()
            .into_iter()
            .filter(|e| matches!(e, SimEvent::FailedWrite(..)))
            .collect();
        assert_eq!(failed.len(), 2);
        assert_eq!(failed[1], SimEvent::FailedWrite(4, Level::High));
    }

    #[test]
    fn test_single_write_failure_leaves_light_on() {
        let config = RampConfig::new(3, 1, 4, false).unwrap();
        // After the start write and 25 full cycles, the next write is the low half of cycle 26
        let sim = SimBackend::failing_once_after(51);
        let monitor = sim.clone();
        let hw = Hardware::acquire(|| Ok(sim)).unwrap();
        let mut driver = RampDriver::new(config, ManualClock::default());

        let res = driver.run(hw);
        assert!(matches!(
            res,
            Err(RampError::HardwareWrite {
                line: 4,
                source: HardwareError::CommunicationError(_)
            })
        ));
        assert_eq!(driver.state(), RampState::RunningStep(3));
        assert_eq!(monitor.level(4), Some(Level::High));
        assert!(monitor.released());

        let events = monitor.events();
        let fault = events
            .iter()
            .position(|e| *e == SimEvent::FailedWrite(4, Level::Low))
            .unwrap();
        assert_eq!(events[fault + 1], SimEvent::Write(4, Level::High));
        assert_eq!(events[fault + 2], SimEvent::Release);
    }

    #[test]
    fn test_configure_failure_touches_nothing() {
        let config = RampConfig::new(15, 60, 4, false).unwrap();
        let sim = SimBackend::failing_configure();
        let monitor = sim.clone();
        let hw = Hardware::acquire(|| Ok(sim)).unwrap();
        let mut driver = RampDriver::new(config, ManualClock::default());

        assert!(matches!(
            driver.run(hw),
            Err(RampError::HardwareUnavailable(_))
        ));
        assert_eq!(driver.state(), RampState::NotStarted);
        assert!(!monitor
            .events()
            .iter()
            .any(|e| matches!(e, SimEvent::Write(..) | SimEvent::FailedWrite(..))));
        assert!(monitor.released());
    }

    #[test]
    fn test_same_config_same_timing() {
        let config = RampConfig::new(5, 1, 4, false).unwrap();

        let mut first = RampDriver::new(config, ManualClock::default());
        first.run(sim_hardware().0).unwrap();
        let mut second = RampDriver::new(config, ManualClock::default());
        second.run(sim_hardware().0).unwrap();

        assert_eq!(first.clock().sleeps, second.clock().sleeps);
    }
}
