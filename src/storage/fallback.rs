//! In-process fallback buffer.
//!
//! Holds records saved while the primary store was unreachable. Nothing here
//! is persisted: the buffer lives as long as its owning
//! [`TimerStore`](crate::storage::TimerStore) and is only emptied by an
//! explicit [`MemoryFallback::clear`].

use crate::model::{CompletedTimer, NewTimer};
use chrono::{DateTime, Utc};

/// Ordered, unbounded buffer of fallback records.
#[derive(Debug, Default)]
pub struct MemoryFallback {
    records: Vec<CompletedTimer>,
    last_id: i64,
}

impl MemoryFallback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record stamped with the current time and return its id.
    pub fn append(&mut self, timer: &NewTimer) -> i64 {
        self.append_at(timer, Utc::now())
    }

    /// Append a record stamped with `completed_at`.
    ///
    /// Ids come from the timestamp in milliseconds, bumped past the last
    /// issued id so two saves in the same millisecond stay distinct.
    pub fn append_at(&mut self, timer: &NewTimer, completed_at: DateTime<Utc>) -> i64 {
        let id = completed_at.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        self.records.push(timer.complete(id, completed_at));
        tracing::info!(id, "Timer saved to memory fallback");
        id
    }

    /// Copy of the buffer in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<CompletedTimer> {
        self.records.clone()
    }

    /// Drop every buffered record.
    ///
    /// Id issuance stays monotonic across clears.
    pub fn clear(&mut self) {
        let dropped = self.records.len();
        self.records.clear();
        tracing::info!(dropped, "Memory fallback cleared");
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
