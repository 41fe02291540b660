use std::time::{Duration, Instant};

use crate::config::GameConfig;

/// Current tick interval of a session, in milliseconds.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct Speed(u64);

impl Speed {
    /// Interval every session starts with.
    #[must_use]
    pub fn initial(config: &GameConfig) -> Self {
        Self(config.initial_speed_ms)
    }

    /// Interval after eating one food: shorter by the configured decrement,
    /// never below the configured floor.
    #[must_use]
    pub fn accelerated(self, config: &GameConfig) -> Self {
        Self(
            self.0
                .saturating_sub(config.speed_decrement_ms)
                .max(config.min_speed_ms),
        )
    }

    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn interval(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

/// One-shot tick timer that the game loop re-arms after every tick.
///
/// Only one deadline exists at a time. Re-arming replaces it, disarming drops
/// it, and [`TickScheduler::fire`] consumes it, so ticks never overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickScheduler {
    deadline: Option<Instant>,
}

impl TickScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules the next tick `period` after `now`.
    pub fn arm(&mut self, now: Instant, period: Duration) {
        self.deadline = Some(now + period);
    }

    /// Cancels the pending tick, if any.
    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true, and clears the deadline, when a tick is due at `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the pending tick; `None` when disarmed.
    #[must_use]
    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}
