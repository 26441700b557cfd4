//! Rolling price history
//!
//! Keeps the most recent prices per symbol in a bounded FIFO, the data a
//! sparkline or line chart is drawn from.

mod buffer;

pub use buffer::HistoryBook;

/// Default number of prices retained per symbol
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;
