//! Actions scheduled for a later tick.

use chrono::{DateTime, Utc};

/// Something to do once its due time has passed.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredAction {
    Announce { text: String, interrupt: bool },
}

#[derive(Debug, Clone, PartialEq)]
struct DeferredEntry {
    due_at: DateTime<Utc>,
    action: DeferredAction,
}

/// Pending deferred actions, checked once per tick.
#[derive(Debug, Clone, Default)]
pub struct DeferredQueue {
    entries: Vec<DeferredEntry>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_at: DateTime<Utc>, action: DeferredAction) {
        self.entries.push(DeferredEntry { due_at, action });
    }

    /// Remove and return every action due at or before `now`, earliest first.
    /// Actions due at the same time keep their scheduling order.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<DeferredAction> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|entry| entry.due_at <= now);
        self.entries = pending;
        due.sort_by_key(|entry| entry.due_at);
        due.into_iter().map(|entry| entry.action).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn announce(text: &str) -> DeferredAction {
        DeferredAction::Announce {
            text: text.to_string(),
            interrupt: false,
        }
    }

    #[test]
    fn test_take_due_in_time_order() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut queue = DeferredQueue::new();
        queue.schedule(start + Duration::milliseconds(300), announce("late"));
        queue.schedule(start + Duration::milliseconds(100), announce("first"));
        queue.schedule(start + Duration::milliseconds(100), announce("second"));

        assert!(queue.take_due(start).is_empty());
        assert_eq!(
            queue.take_due(start + Duration::milliseconds(150)),
            vec![announce("first"), announce("second")]
        );
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.take_due(start + Duration::seconds(1)), vec![announce("late")]);
        assert!(queue.is_empty());
    }
}
