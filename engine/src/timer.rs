//! Cancellable deadlines driven by the caller's clock.
//!
//! A [`Deadline`] holds at most one pending instant. Scheduling again replaces
//! it, which is all a debounce needs. Nothing here sleeps: the owner polls
//! [`Deadline::fire`] from its tick.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    due: Option<Instant>,
}

impl Deadline {
    #[must_use]
    pub const fn new() -> Self {
        Self { due: None }
    }

    /// Arm for `now + delay`, replacing any earlier schedule.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.due = Some(now.checked_add(delay).unwrap_or(now));
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    #[must_use]
    pub const fn due(&self) -> Option<Instant> {
        self.due
    }

    /// Disarm and return `true` if the deadline has passed at `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_due() {
        let start = Instant::now();
        let mut deadline = Deadline::new();
        deadline.schedule(start, Duration::from_millis(10));

        assert!(!deadline.fire(start + Duration::from_millis(9)));
        assert!(deadline.is_armed());
        assert!(deadline.fire(start + Duration::from_millis(10)));
        assert!(!deadline.is_armed());
        assert!(!deadline.fire(start + Duration::from_millis(20)));
    }

    #[test]
    fn reschedule_pushes_out() {
        let start = Instant::now();
        let mut deadline = Deadline::new();
        deadline.schedule(start, Duration::from_millis(10));
        deadline.schedule(start + Duration::from_millis(8), Duration::from_millis(10));

        assert!(!deadline.fire(start + Duration::from_millis(12)));
        assert_eq!(deadline.due(), Some(start + Duration::from_millis(18)));
    }

    #[test]
    fn cancel_disarms() {
        let start = Instant::now();
        let mut deadline = Deadline::new();
        deadline.schedule(start, Duration::ZERO);
        deadline.cancel();
        assert!(!deadline.fire(start));
    }

    #[test]
    fn zero_delay_is_due_immediately() {
        let start = Instant::now();
        let mut deadline = Deadline::new();
        deadline.schedule(start, Duration::ZERO);
        assert!(deadline.fire(start));
    }
}
