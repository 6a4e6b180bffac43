//! Transition history tracking.
//!
//! Each registry keeps a bounded record of its most recent transitions so
//! that domain logic can return to the previous state and diagnostics can
//! show how the machine got where it is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single transition between two keys.
///
/// `from` is `None` for the first activation after an enter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The key being transitioned from
    pub from: Option<String>,
    /// The key being transitioned to
    pub to: String,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Bounded, ordered history of transitions (oldest first).
///
/// When the capacity is reached the oldest record is dropped. A capacity of
/// zero disables recording.
///
/// # Example
///
/// ```rust
/// use statecraft::core::TransitionHistory;
///
/// let mut history = TransitionHistory::new(2);
/// history.record(None, "Patrol");
/// history.record(Some("Patrol"), "Alert");
/// history.record(Some("Alert"), "Combat");
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.previous(), Some("Alert"));
/// assert_eq!(history.get_path(), vec!["Patrol", "Alert", "Combat"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionHistory {
    records: VecDeque<TransitionRecord>,
    capacity: usize,
}

impl Default for TransitionHistory {
    fn default() -> Self {
        Self::new(crate::settings::DEFAULT_HISTORY_CAPACITY)
    }
}

impl TransitionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity,
        }
    }

    /// Record a transition, evicting the oldest record when full.
    pub fn record(&mut self, from: Option<&str>, to: &str) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(TransitionRecord {
            from: from.map(str::to_string),
            to: to.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// Key that was active before the most recent transition.
    pub fn previous(&self) -> Option<&str> {
        self.records.back().and_then(|r| r.from.as_deref())
    }

    /// Sequence of keys visited, starting from the oldest known origin.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(from) = self.records.front().and_then(|r| r.from.as_deref()) {
            path.push(from);
        }
        for record in &self.records {
            path.push(record.to.as_str());
        }
        path
    }

    /// Time between the oldest and newest recorded transitions.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
