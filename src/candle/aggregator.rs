//! Per-symbol candle series

use super::Candle;
use std::collections::HashMap;

/// Builds fixed tick-count candle series, one per symbol
///
/// Series are append-only: only the last (in-progress) candle of a series is
/// ever mutated, and it is frozen once it holds `bucket_size` ticks and the
/// next tick for that symbol arrives.
#[derive(Debug, Clone)]
pub struct CandleAggregator {
    bucket_size: u32,
    series: HashMap<String, Vec<Candle>>,
}

impl CandleAggregator {
    /// Create an aggregator with `bucket_size` ticks per candle (minimum one)
    pub fn new(bucket_size: u32) -> Self {
        Self {
            bucket_size: bucket_size.max(1),
            series: HashMap::new(),
        }
    }

    /// Ticks per candle
    pub fn bucket_size(&self) -> u32 {
        self.bucket_size
    }

    /// Fold a tick into the symbol's series, returning the candle it landed in
    pub fn ingest(&mut self, symbol: &str, price: f64) -> Candle {
        let series = self.series.entry(symbol.to_string()).or_default();

        match series.last_mut() {
            Some(last) if !last.is_complete(self.bucket_size) => {
                last.update(price);
                *last
            }
            _ => {
                let candle = Candle::open_at(price);
                series.push(candle);
                tracing::trace!(symbol, candles = series.len(), "Started new candle");
                candle
            }
        }
    }

    /// Copy of the symbol's candle series, oldest first
    pub fn snapshot(&self, symbol: &str) -> Vec<Candle> {
        self.series.get(symbol).cloned().unwrap_or_default()
    }

    /// The in-progress (or most recently completed) candle
    pub fn last(&self, symbol: &str) -> Option<Candle> {
        self.series.get(symbol).and_then(|s| s.last().copied())
    }

    /// Number of candles in a symbol's series
    pub fn len(&self, symbol: &str) -> usize {
        self.series.get(symbol).map_or(0, Vec::len)
    }
}

impl Default for CandleAggregator {
    fn default() -> Self {
        Self::new(super::DEFAULT_BUCKET_SIZE)
    }
}
