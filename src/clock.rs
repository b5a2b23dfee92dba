//! Time sources for the ramp, and the policy deciding when a step is over
use std::thread::sleep;
use std::time::{Duration, Instant};

use chrono::Utc;

/// Something the ramp can read the time from and block on.
pub trait Clock {
    /// Time elapsed since the clock's epoch
    fn now(&self) -> Duration;
    /// Blocks the calling thread for `dur`
    fn sleep(&mut self, dur: Duration);
}

/// Wall-clock time since the Unix epoch
#[derive(Debug, Default, Clone, Copy)]
pub struct WallClock;

impl Clock for WallClock {
    fn now(&self) -> Duration {
        let micros = Utc::now().timestamp_micros();
        // Before 1970 only happens on a board with no RTC and no network time
        Duration::from_micros(u64::try_from(micros).unwrap_or(0))
    }

    fn sleep(&mut self, dur: Duration) {
        sleep(dur);
    }
}

/// Monotonic time since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        MonotonicClock::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, dur: Duration) {
        sleep(dur);
    }
}

/// How the end of a step is detected
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StepBoundary {
    /// Start and current time are both read in whole seconds, so a step ends
    /// on the first second boundary at or after `start + duration`. This
    /// makes a step anywhere from `duration - 1s` to `duration` long, plus
    /// the cycle in flight when the boundary passes.
    #[default]
    WholeSeconds,
    /// The step ends once `duration` has actually elapsed
    Exact,
}

impl StepBoundary {
    /// Returns true once a step that started at `start` and lasts `duration` is over at `now`
    pub fn reached(&self, start: Duration, now: Duration, duration: Duration) -> bool {
        match self {
            StepBoundary::WholeSeconds => {
                now.as_secs() >= start.as_secs().saturating_add(duration.as_secs())
            }
            StepBoundary::Exact => now.saturating_sub(start) >= duration,
        }
    }
}

/// A clock that only moves when slept on
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub(crate) struct ManualClock {
    now: Duration,
    pub(crate) sleeps: Vec<Duration>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn starting_at(now: Duration) -> Self {
        ManualClock {
            now,
            sleeps: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, dur: Duration) {
        self.sleeps.push(dur);
        self.now += dur;
    }
}
