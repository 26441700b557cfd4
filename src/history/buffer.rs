//! Per-symbol bounded price buffers

use std::collections::{HashMap, VecDeque};

/// Bounded FIFO of recent prices, one buffer per symbol
///
/// A buffer never holds more than `capacity` prices; pushing onto a full
/// buffer evicts the oldest entry first. Entries are never reordered.
#[derive(Debug, Clone)]
pub struct HistoryBook {
    capacity: usize,
    buffers: HashMap<String, VecDeque<f64>>,
}

impl HistoryBook {
    /// Create a history book retaining `capacity` prices per symbol
    ///
    /// A zero capacity is clamped to one; configuration validation rejects
    /// it before an engine is ever built.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            buffers: HashMap::new(),
        }
    }

    /// Maximum prices retained per symbol
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a price, evicting the oldest one when the buffer is full
    pub fn push(&mut self, symbol: &str, price: f64) {
        // Grows on demand; capacity is only an upper bound
        let buffer = self.buffers.entry(symbol.to_string()).or_default();

        if buffer.len() == self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(price);
    }

    /// Copy of the buffered prices, oldest first
    pub fn snapshot(&self, symbol: &str) -> Vec<f64> {
        self.buffers
            .get(symbol)
            .map(|b| b.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of buffered prices for a symbol
    pub fn len(&self, symbol: &str) -> usize {
        self.buffers.get(symbol).map_or(0, VecDeque::len)
    }

    /// Whether no price has been recorded for a symbol
    pub fn is_empty(&self, symbol: &str) -> bool {
        self.len(symbol) == 0
    }

    /// Most recent price for a symbol
    pub fn latest(&self, symbol: &str) -> Option<f64> {
        self.buffers.get(symbol).and_then(|b| b.back().copied())
    }

    /// Lowest and highest buffered price, the y-domain of a line chart
    pub fn range(&self, symbol: &str) -> Option<(f64, f64)> {
        let buffer = self.buffers.get(symbol)?;
        let mut iter = buffer.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

impl Default for HistoryBook {
    fn default() -> Self {
        Self::new(super::DEFAULT_HISTORY_CAPACITY)
    }
}
