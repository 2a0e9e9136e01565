// SPDX-License-Identifier: GPL-3.0-only

//! Single-slot timer for delayed messages
//!
//! Scheduling replaces whatever was pending, so restarting the countdown
//! cancels the old tick instead of adding a second one.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Scheduler<M> {
    pending: Option<(Instant, M)>,
}

impl<M> Default for Scheduler<M> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<M> Scheduler<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `message` at `at`; returns true if it replaced a pending one
    pub fn schedule(&mut self, at: Instant, message: M) -> bool {
        self.pending.replace((at, message)).is_some()
    }

    pub fn schedule_after(&mut self, after: Duration, message: M) -> bool {
        self.schedule(Instant::now() + after, message)
    }

    /// Pending message, if its deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<M> {
        match &self.pending {
            Some((at, _)) if *at <= now => self.pending.take().map(|(_, message)| message),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_due_before_deadline() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(now + Duration::from_secs(1), "tick");

        assert_eq!(scheduler.take_due(now), None);
        assert!(scheduler.is_pending());
        assert_eq!(scheduler.take_due(now + Duration::from_secs(1)), Some("tick"));
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn test_schedule_replaces_pending() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new();
        assert!(!scheduler.schedule(now, 1));
        assert!(scheduler.schedule(now + Duration::from_secs(5), 2));

        // The first message is gone for good
        assert_eq!(scheduler.take_due(now + Duration::from_secs(1)), None);
        assert_eq!(scheduler.take_due(now + Duration::from_secs(5)), Some(2));
        assert_eq!(scheduler.take_due(now + Duration::from_secs(10)), None);
    }

    #[test]
    fn test_cancel() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(now, ());
        scheduler.cancel();
        assert!(!scheduler.is_pending());
        assert_eq!(scheduler.take_due(now), None);
    }
}
