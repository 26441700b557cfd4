//! Tick-count candle aggregation
//!
//! Buckets ticks into OHLC candles of a fixed number of ticks each, so candle
//! width follows feed activity rather than wall-clock time.

mod aggregator;
mod types;

pub use aggregator::CandleAggregator;
pub use types::{price_range, Candle};

/// Default number of ticks per candle
pub const DEFAULT_BUCKET_SIZE: u32 = 30;
