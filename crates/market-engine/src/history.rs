use std::collections::{HashMap, VecDeque};

use crate::models::{Price, HISTORY_CAPACITY};

/// Bounded rolling window of recent prices per symbol, oldest evicted first.
#[derive(Debug, Clone)]
pub struct PriceHistoryStore {
    capacity: usize,
    series: HashMap<String, VecDeque<Price>>,
}

impl Default for PriceHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceHistoryStore {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// A zero capacity is bumped to one so the latest price is always kept.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            series: HashMap::new(),
        }
    }

    /// Append a price; unknown symbols start with an empty window.
    pub fn record(&mut self, symbol: &str, price: Price) {
        let capacity = self.capacity;
        let window = self
            .series
            .entry(symbol.to_string())
            .or_insert_with(|| VecDeque::with_capacity(capacity));
        window.push_back(price);
        while window.len() > capacity {
            window.pop_front();
        }
    }

    /// Prices in arrival order, oldest first. Empty for unknown symbols.
    pub fn get(&self, symbol: &str) -> Vec<Price> {
        self.series
            .get(symbol)
            .map(|w| w.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, symbol: &str) -> usize {
        self.series.get(symbol).map_or(0, VecDeque::len)
    }

    pub fn latest(&self, symbol: &str) -> Option<Price> {
        self.series.get(symbol).and_then(|w| w.back().copied())
    }

    /// Make sure a symbol has a (possibly empty) window.
    pub(crate) fn track(&mut self, symbol: &str) {
        self.series.entry(symbol.to_string()).or_default();
    }
}
