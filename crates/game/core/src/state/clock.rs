//! Simulation time and buffer timers.
//!
//! The core never reads wall-clock time. The host advances [`SimClock`] once
//! per frame and every timer compares against it, so a replay with the same
//! tick sizes reproduces the same staging.

use std::time::Duration;

/// Monotonic simulation time, advanced by the host tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SimClock {
    now: Duration,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
    }
}

/// Minimum-duration gate between two action stages.
///
/// A zero-length buffer is ready immediately.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferTimer {
    deadline: Duration,
}

impl BufferTimer {
    pub fn start(clock: &SimClock, length: Duration) -> Self {
        Self {
            deadline: clock.now() + length,
        }
    }

    pub fn is_ready(&self, clock: &SimClock) -> bool {
        clock.now() >= self.deadline
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_waits_for_deadline() {
        let mut clock = SimClock::new();
        let timer = BufferTimer::start(&clock, Duration::from_millis(100));
        assert!(!timer.is_ready(&clock));
        clock.advance(Duration::from_millis(60));
        assert!(!timer.is_ready(&clock));
        clock.advance(Duration::from_millis(40));
        assert!(timer.is_ready(&clock));
    }

    #[test]
    fn zero_buffer_is_ready_at_once() {
        let clock = SimClock::new();
        assert!(BufferTimer::start(&clock, Duration::ZERO).is_ready(&clock));
    }
}
