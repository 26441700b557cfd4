//! Price change and flash highlighting
//!
//! Tracks the latest price per symbol, the direction of the last move and a
//! transient highlight flag that is cleared by a deferred, generation-tagged
//! clear once the highlight window elapses.

mod tracker;
mod types;

pub use tracker::PriceTracker;
pub use types::{Direction, FlashUpdate, HighlightClear, PriceState};

use std::time::Duration;

/// Default time a price change stays highlighted
pub const DEFAULT_HIGHLIGHT_CLEAR: Duration = Duration::from_millis(500);
