//! A GPIO backend that lives entirely in memory
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::*;

use crate::drivers::{GpioBackend, HardwareError, Level, Result};

/// Everything that happened to the simulated hardware, in order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    Configure(u8),
    Write(u8, Level),
    /// A write that was attempted but made to fail
    FailedWrite(u8, Level),
    Release,
}

#[derive(Debug, Default)]
struct SimState {
    events: Vec<SimEvent>,
    levels: HashMap<u8, Level>,
    writes: usize,
    attempts: usize,
    fail_after: Option<usize>,
    fail_only: Option<usize>,
    fail_configure: bool,
    releases: usize,
}

/// Records every call instead of touching registers.
///
/// Clones share the same state, so a test can keep one clone as a monitor
/// while the driver owns the other.
#[derive(Debug, Clone, Default)]
pub struct SimBackend {
    state: Rc<RefCell<SimState>>,
}

impl SimBackend {
    pub fn new() -> Self {
        SimBackend::default()
    }

    /// Makes every write after the first `writes` fail
    pub fn failing_after(writes: usize) -> Self {
        let sim = SimBackend::new();
        sim.state.borrow_mut().fail_after = Some(writes);
        sim
    }

    /// Makes only the write attempted after the first `writes` fail
    pub fn failing_once_after(writes: usize) -> Self {
        let sim = SimBackend::new();
        sim.state.borrow_mut().fail_only = Some(writes);
        sim
    }

    /// Makes every `configure_output` fail, as if the pin were taken
    pub fn failing_configure() -> Self {
        let sim = SimBackend::new();
        sim.state.borrow_mut().fail_configure = true;
        sim
    }

    pub fn events(&self) -> Vec<SimEvent> {
        self.state.borrow().events.clone()
    }

    /// The level last written to the line, if any
    pub fn level(&self, line: u8) -> Option<Level> {
        self.state.borrow().levels.get(&line).copied()
    }

    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }

    pub fn released(&self) -> bool {
        self.state.borrow().releases > 0
    }

    pub fn release_count(&self) -> usize {
        self.state.borrow().releases
    }
}

impl GpioBackend for SimBackend {
    fn configure_output(&mut self, line: u8) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_configure {
            return Err(HardwareError::CommunicationError(format!(
                "simulated GPIO {line} is already in use"
            )));
        }
        state.events.push(SimEvent::Configure(line));
        state.levels.entry(line).or_insert(Level::Low);
        Ok(())
    }

    fn write_line(&mut self, line: u8, level: Level) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.levels.contains_key(&line) {
            return Err(HardwareError::LineNotConfigured(line));
        }
        let attempt = state.attempts;
        state.attempts += 1;
        let fails = state.fail_after.map_or(false, |limit| attempt >= limit)
            || state.fail_only == Some(attempt);
        if fails {
            state.events.push(SimEvent::FailedWrite(line, level));
            return Err(HardwareError::CommunicationError(format!(
                "simulated write failure on GPIO {line}"
            )));
        }
        state.writes += 1;
        state.events.push(SimEvent::Write(line, level));
        state.levels.insert(line, level);
        Ok(())
    }

    fn release(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.releases == 0 {
            trace!("Releasing simulated GPIO");
        }
        state.releases += 1;
        state.events.push(SimEvent::Release);
    }
}
