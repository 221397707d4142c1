//! Timer Queue
//!
//! Keyed one-shot timers on a caller-supplied clock. Scheduling a key that is
//! already pending replaces its deadline, which gives both the announcement
//! reset and trailing-edge debounce behaviour.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::controllers::Platform;

/// Identifies a pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKey {
    /// Empty the live region after an announcement
    ClearAnnouncement,
    /// Apply the latest slider value once input settles
    SliderDebounce(Platform),
    /// Announce that the page is ready
    ReadyAnnouncement,
}

/// Pending timers by key
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    pending: BTreeMap<TimerKey, Instant>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to fire `delay` after `now`, replacing any pending deadline
    pub fn schedule(&mut self, key: TimerKey, now: Instant, delay: Duration) {
        self.pending.insert(key, now + delay);
    }

    /// Cancel a pending timer, returning whether one was pending
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.pending.remove(&key).is_some()
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.pending.contains_key(&key)
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }

    /// Remove and return every timer due at `now`, earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerKey> {
        let mut due: Vec<(Instant, TimerKey)> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, deadline)| (*deadline, *key))
            .collect();
        due.sort();

        for (_, key) in &due {
            self.pending.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reschedule_replaces_deadline() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        timers.schedule(TimerKey::ClearAnnouncement, start, Duration::from_millis(1000));
        timers.schedule(
            TimerKey::ClearAnnouncement,
            start + Duration::from_millis(600),
            Duration::from_millis(1000),
        );

        assert!(timers.take_due(start + Duration::from_millis(1000)).is_empty());
        assert_eq!(
            timers.take_due(start + Duration::from_millis(1600)),
            vec![TimerKey::ClearAnnouncement]
        );
        assert!(timers.is_empty());
    }

    #[test]
    fn test_take_due_in_deadline_order() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        timers.schedule(TimerKey::ReadyAnnouncement, start, Duration::from_millis(500));
        timers.schedule(
            TimerKey::SliderDebounce(Platform::Ios),
            start,
            Duration::from_millis(16),
        );

        assert_eq!(timers.next_deadline(), Some(start + Duration::from_millis(16)));
        let due = timers.take_due(start + Duration::from_secs(1));
        assert_eq!(
            due,
            vec![TimerKey::SliderDebounce(Platform::Ios), TimerKey::ReadyAnnouncement]
        );
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        timers.schedule(TimerKey::ReadyAnnouncement, start, Duration::ZERO);
        assert!(timers.cancel(TimerKey::ReadyAnnouncement));
        assert!(!timers.cancel(TimerKey::ReadyAnnouncement));
        assert!(timers.take_due(start).is_empty());
    }
}
