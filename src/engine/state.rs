//! Derived views updated by each tick

use crate::candle::CandleAggregator;
use crate::config::EngineConfig;
use crate::feed::Tick;
use crate::flash::{HighlightClear, PriceTracker};
use crate::history::HistoryBook;

/// History, candles and price state for every symbol
///
/// The three views are independent; they live together so one event can be
/// applied under a single lock.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub history: HistoryBook,
    pub candles: CandleAggregator,
    pub prices: PriceTracker,
}

impl EngineState {
    /// Build empty views sized from config, with pending price entries for `symbols`
    pub fn new<S: AsRef<str>>(config: &EngineConfig, symbols: &[S]) -> Self {
        Self {
            history: HistoryBook::new(config.history_capacity),
            candles: CandleAggregator::new(config.candle_bucket_size),
            prices: PriceTracker::with_symbols(symbols),
        }
    }

    /// Fan a tick out to history, candles and price tracker, in that order
    ///
    /// Returns the highlight clear to schedule, if the tick raised one.
    pub fn apply(&mut self, tick: &Tick) -> Option<HighlightClear> {
        self.history.push(&tick.symbol, tick.price);
        self.candles.ingest(&tick.symbol, tick.price);
        self.prices
            .ingest_at(&tick.symbol, tick.price, tick.received_at)
            .clear
    }
}
