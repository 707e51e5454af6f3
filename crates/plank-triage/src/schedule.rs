//! Debounced recomputation.
//!
//! A board emits a burst of changes when several items move at once. The
//! [`Debouncer`] coalesces such a burst into one recomputation that fires
//! once no new change has arrived for `delay`. The caller owns it and
//! passes the current time in, so there is no global timer and tests can
//! drive it with synthetic instants.

use std::time::{Duration, Instant};

/// Trailing-edge debouncer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the timer: fire `delay` after `now`.
    pub fn request(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Whether a request is waiting and its quiet period has elapsed.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Consume a due request. Returns `false` and leaves the timer armed
    /// when the quiet period is still running.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    pub const fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}
