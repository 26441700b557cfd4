//! Candle types

use serde::{Deserialize, Serialize};

/// OHLC summary of a run of ticks
///
/// Always satisfies `low <= open, close <= high` and `tick_count >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Number of ticks folded into this candle
    pub tick_count: u32,
}

impl Candle {
    /// Start a candle from its first tick
    pub fn open_at(price: f64) -> Self {
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            tick_count: 1,
        }
    }

    /// Fold another tick into the candle
    pub fn update(&mut self, price: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.tick_count += 1;
    }

    /// Whether the candle holds a full bucket of ticks
    pub fn is_complete(&self, bucket_size: u32) -> bool {
        self.tick_count >= bucket_size
    }

    /// Close strictly above open (drawn green)
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Low/high span of this candle
    pub fn range(&self) -> (f64, f64) {
        (self.low, self.high)
    }
}

/// Lowest low and highest high across candles, the y-domain of a chart
pub fn price_range(candles: &[Candle]) -> Option<(f64, f64)> {
    let first = candles.first()?;
    Some(
        candles
            .iter()
            .skip(1)
            .fold(first.range(), |(lo, hi), c| (lo.min(c.low), hi.max(c.high))),
    )
}
