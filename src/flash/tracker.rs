//! Per-symbol price change tracker

use super::{Direction, FlashUpdate, HighlightClear, PriceState};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct Entry {
    state: PriceState,
    /// Bumped on every tick; a clear only applies to the generation it was issued for
    generation: u64,
}

/// Tracks last price, move direction and highlight flag per symbol
#[derive(Debug, Clone, Default)]
pub struct PriceTracker {
    entries: HashMap<String, Entry>,
}

impl PriceTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker with pending entries for the given symbols
    pub fn with_symbols<S: AsRef<str>>(symbols: &[S]) -> Self {
        let mut tracker = Self::new();
        for symbol in symbols {
            tracker.register(symbol.as_ref());
        }
        tracker
    }

    /// Add a pending entry for a symbol; existing entries are left alone
    pub fn register(&mut self, symbol: &str) {
        self.entries.entry(symbol.to_string()).or_default();
    }

    /// Apply a tick stamped now and return the new state plus any clear to schedule
    pub fn ingest(&mut self, symbol: &str, price: f64) -> FlashUpdate {
        self.ingest_at(symbol, price, Utc::now())
    }

    /// Apply a tick received at `at`
    pub fn ingest_at(&mut self, symbol: &str, price: f64, at: DateTime<Utc>) -> FlashUpdate {
        let entry = self.entries.entry(symbol.to_string()).or_default();

        let direction = Direction::between(entry.state.last_price, price);
        let highlighted = direction != Direction::None;

        entry.generation += 1;
        entry.state = PriceState {
            last_price: Some(price),
            direction,
            highlighted,
            updated_at: Some(at),
        };

        let clear = highlighted.then(|| HighlightClear {
            symbol: symbol.to_string(),
            generation: entry.generation,
        });

        FlashUpdate {
            state: entry.state,
            clear,
        }
    }

    /// Drop the highlight if no newer tick superseded this clear
    ///
    /// Returns whether the flag was cleared.
    pub fn clear(&mut self, clear: &HighlightClear) -> bool {
        match self.entries.get_mut(&clear.symbol) {
            Some(entry) if entry.generation == clear.generation => {
                let was_highlighted = entry.state.highlighted;
                entry.state.highlighted = false;
                was_highlighted
            }
            _ => false,
        }
    }

    /// Current state for a symbol
    pub fn snapshot(&self, symbol: &str) -> Option<PriceState> {
        self.entries.get(symbol).map(|e| e.state)
    }

    /// All tracked symbols, sorted
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.entries.keys().cloned().collect();
        symbols.sort();
        symbols
    }
}
