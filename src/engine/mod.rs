//! Tick aggregation engine
//!
//! [`Supervisor`] owns the feed connection and drives every derived view
//! from a single task; [`EngineHandle`] is the read-only side handed to the
//! presentation layer.

mod handle;
mod state;
mod supervisor;

pub use handle::{EngineHandle, SymbolSnapshot};
pub use state::EngineState;
pub use supervisor::Supervisor;

use serde::{Deserialize, Serialize};

/// Lifecycle of the feed connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// A connection attempt is in flight
    Connecting,
    /// Connected and subscribed; ticks are flowing
    Open,
    /// Disconnected, waiting to reconnect (or shut down)
    Closed,
}

impl ConnectionState {
    /// Whether fresh ticks can currently be expected
    pub fn is_live(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }
}
