use std::collections::VecDeque;

use crate::models::{TradeRecord, JOURNAL_CAPACITY};

/// Most-recent-first log of executed trades.
#[derive(Debug, Clone)]
pub struct TradeJournal {
    capacity: usize,
    entries: VecDeque<TradeRecord>,
}

impl Default for TradeJournal {
    fn default() -> Self {
        Self::new()
    }
}

impl TradeJournal {
    pub fn new() -> Self {
        Self::with_capacity(JOURNAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::with_capacity(capacity.max(1) + 1),
        }
    }

    pub fn record(&mut self, entry: TradeRecord) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Entries newest first.
    pub fn all(&self) -> Vec<TradeRecord> {
        self.entries.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&TradeRecord> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
