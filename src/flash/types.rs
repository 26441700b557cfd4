//! Price state types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the last price move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Strictly above the previous price
    Up,
    /// Strictly below the previous price
    Down,
    /// Unchanged, or no previous price to compare with
    #[default]
    None,
}

impl Direction {
    /// Compare a new price against the previous one
    pub fn between(previous: Option<f64>, current: f64) -> Self {
        match previous {
            Some(prev) if current > prev => Direction::Up,
            Some(prev) if current < prev => Direction::Down,
            _ => Direction::None,
        }
    }

    /// Arrow glyph shown next to the price
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::None => "",
        }
    }
}

/// Latest price view for one symbol
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceState {
    /// Last traded price; `None` until the first tick arrives
    pub last_price: Option<f64>,
    /// Direction of the last move
    pub direction: Direction,
    /// Set on every directional move, cleared after the highlight window
    pub highlighted: bool,
    /// When the last tick was applied
    pub updated_at: Option<DateTime<Utc>>,
}

impl PriceState {
    /// State of a configured symbol that has not ticked yet
    pub fn pending() -> Self {
        Self::default()
    }

    /// Whether no price has arrived yet
    pub fn is_pending(&self) -> bool {
        self.last_price.is_none()
    }
}

impl fmt::Display for PriceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last_price {
            None => write!(f, "Loading..."),
            Some(price) => match self.direction {
                Direction::None => write!(f, "{price:.2}"),
                dir => write!(f, "{price:.2} {}", dir.arrow()),
            },
        }
    }
}

/// Deferred highlight clear for one symbol
///
/// Only takes effect if no newer update for the symbol happened after it
/// was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightClear {
    pub symbol: String,
    pub generation: u64,
}

/// Result of applying a tick to the tracker
#[derive(Debug, Clone, PartialEq)]
pub struct FlashUpdate {
    /// The stored state after the tick
    pub state: PriceState,
    /// Clear to schedule when the tick raised the highlight
    pub clear: Option<HighlightClear>,
}
