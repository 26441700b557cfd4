//! Read-only engine access for presentation layers

use super::{ConnectionState, EngineState};
use crate::candle::Candle;
use crate::flash::PriceState;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// All views of one symbol, captured under a single read guard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolSnapshot {
    pub symbol: String,
    pub price: Option<PriceState>,
    pub history: Vec<f64>,
    pub candles: Vec<Candle>,
}

/// Cloneable handle onto a running engine
///
/// Accessors return owned copies; nothing handed out aliases engine state.
/// Dropping every handle shuts the engine down.
#[derive(Clone)]
pub struct EngineHandle {
    symbols: Arc<[String]>,
    state: Arc<RwLock<EngineState>>,
    connection: watch::Receiver<ConnectionState>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl EngineHandle {
    pub(super) fn new(
        symbols: Arc<[String]>,
        state: Arc<RwLock<EngineState>>,
        connection: watch::Receiver<ConnectionState>,
        shutdown: Arc<watch::Sender<bool>>,
    ) -> Self {
        Self {
            symbols,
            state,
            connection,
            shutdown,
        }
    }

    /// Configured symbols, in subscription order
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Latest price state for a symbol
    pub fn price_state(&self, symbol: &str) -> Option<PriceState> {
        self.state.read().prices.snapshot(symbol)
    }

    /// Rolling price history for a symbol, oldest first
    pub fn history(&self, symbol: &str) -> Vec<f64> {
        self.state.read().history.snapshot(symbol)
    }

    /// Lowest and highest price in the rolling history
    pub fn history_range(&self, symbol: &str) -> Option<(f64, f64)> {
        self.state.read().history.range(symbol)
    }

    /// Candle series for a symbol, oldest first
    pub fn candles(&self, symbol: &str) -> Vec<Candle> {
        self.state.read().candles.snapshot(symbol)
    }

    /// Price, history and candles of one symbol from the same instant
    pub fn snapshot(&self, symbol: &str) -> SymbolSnapshot {
        let state = self.state.read();
        SymbolSnapshot {
            symbol: symbol.to_string(),
            price: state.prices.snapshot(symbol),
            history: state.history.snapshot(symbol),
            candles: state.candles.snapshot(symbol),
        }
    }

    /// Current connection state
    pub fn connection_state(&self) -> ConnectionState {
        *self.connection.borrow()
    }

    /// Whether the feed is live
    pub fn is_live(&self) -> bool {
        self.connection_state().is_live()
    }

    /// Receiver notified on every connection state change
    pub fn watch_connection(&self) -> watch::Receiver<ConnectionState> {
        self.connection.clone()
    }

    /// Ask the supervisor to close the transport and stop
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Whether shutdown has been requested
    pub fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow()
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("symbols", &self.symbols)
            .field("connection", &self.connection_state())
            .finish()
    }
}
