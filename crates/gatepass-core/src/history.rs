//! # Recent Results Ring
//!
//! The last few validation outcomes, newest first, for the operator to glance
//! back at. In memory only; a restart starts empty.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::outcome::ValidationOutcome;

/// Number of outcomes retained.
pub const HISTORY_CAPACITY: usize = 3;

/// One remembered outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The outcome as delivered.
    pub outcome: ValidationOutcome,
    /// When it was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Fixed-capacity ring, newest first, oldest evicted.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    /// Create an empty ring.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    /// Record an outcome at the front, evicting the oldest past capacity.
    pub fn push(&mut self, outcome: ValidationOutcome) {
        self.entries.push_front(HistoryEntry {
            recorded_at: Utc::now(),
            outcome,
        });
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Owned copy of the entries, newest first.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
