//! Connection supervisor
//!
//! Runs the feed lifecycle as an explicit state machine:
//!
//! ```text
//! Connecting --ok--> Open --error/close--> Closed --delay--> Connecting
//!     |                                       ^
//!     +---------------fail--------------------+
//! ```
//!
//! Every event (inbound message, transport change, highlight timer,
//! shutdown) is handled to completion before the next one is taken, and
//! each tick is applied to the shared views under one write guard.

use super::{ConnectionState, EngineHandle, EngineState};
use crate::config::{validate_symbols, ConfigError, EngineConfig};
use crate::feed::{normalize, SubscribeRequest};
use crate::flash::HighlightClear;
use crate::telemetry::{self, CounterMetric};
use crate::ws::{Connector, Transport, WsMessage};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Where the supervisor is in the connection lifecycle
enum Phase {
    Connecting,
    Open(Box<dyn Transport>),
    Closed,
    Stopped,
}

/// Owns the transport and drives all derived state from one task
pub struct Supervisor<C: Connector> {
    connector: C,
    symbols: Arc<[String]>,
    highlight_clear: Duration,
    reconnect_delay: Duration,
    state: Arc<RwLock<EngineState>>,
    connection: watch::Sender<ConnectionState>,
    shutdown: watch::Receiver<bool>,
    clear_tx: mpsc::UnboundedSender<HighlightClear>,
    clear_rx: mpsc::UnboundedReceiver<HighlightClear>,
}

impl<C: Connector> Supervisor<C> {
    /// Build a supervisor and its handle, rejecting invalid configuration
    ///
    /// Nothing connects until [`Supervisor::run`] is awaited.
    pub fn new(
        symbols: Vec<String>,
        config: &EngineConfig,
        connector: C,
    ) -> Result<(Self, EngineHandle), ConfigError> {
        validate_symbols(&symbols)?;
        config.validate()?;

        let symbols: Arc<[String]> = symbols.into();
        let state = Arc::new(RwLock::new(EngineState::new(config, &symbols)));
        let (connection, connection_rx) = watch::channel(ConnectionState::Connecting);
        let (shutdown_tx, shutdown) = watch::channel(false);
        let (clear_tx, clear_rx) = mpsc::unbounded_channel();

        let handle = EngineHandle::new(
            Arc::clone(&symbols),
            Arc::clone(&state),
            connection_rx,
            Arc::new(shutdown_tx),
        );

        let supervisor = Self {
            connector,
            symbols,
            highlight_clear: config.highlight_clear(),
            reconnect_delay: config.reconnect_delay(),
            state,
            connection,
            shutdown,
            clear_tx,
            clear_rx,
        };

        Ok((supervisor, handle))
    }

    /// Run until shutdown is requested or every handle is dropped
    pub async fn run(mut self) {
        tracing::info!(symbols = ?self.symbols, "Starting feed supervisor");
        // The initial Connecting state never goes through publish()
        telemetry::set_feed_live(false);

        let mut phase = Phase::Connecting;
        loop {
            phase = match phase {
                Phase::Connecting => self.connecting().await,
                Phase::Open(transport) => self.open(transport).await,
                Phase::Closed => self.closed().await,
                Phase::Stopped => break,
            };
        }

        self.publish(ConnectionState::Closed);
        tracing::info!("Feed supervisor stopped");
    }

    async fn connecting(&mut self) -> Phase {
        self.publish(ConnectionState::Connecting);

        let connect = self.connector.connect();
        tokio::pin!(connect);

        let mut transport = loop {
            tokio::select! {
                result = &mut connect => match result {
                    Ok(transport) => break transport,
                    Err(e) => {
                        tracing::warn!(error = %e, "Feed connection failed");
                        return Phase::Closed;
                    }
                },
                Some(clear) = self.clear_rx.recv() => {
                    self.state.write().prices.clear(&clear);
                }
                _ = self.shutdown.changed() => return Phase::Stopped,
            }
        };

        // Shutdown may have been requested while connect() was resolving
        if *self.shutdown.borrow() {
            transport.close().await;
            return Phase::Stopped;
        }

        let subscribe = match SubscribeRequest::new(&self.symbols).to_json() {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode subscription");
                transport.close().await;
                return Phase::Closed;
            }
        };

        if let Err(e) = transport.send(subscribe).await {
            tracing::warn!(error = %e, "Subscription failed");
            transport.close().await;
            return Phase::Closed;
        }

        telemetry::increment(CounterMetric::ConnectionsOpened);
        tracing::info!(symbols = ?self.symbols, "Feed connected and subscribed");
        Phase::Open(transport)
    }

    async fn open(&mut self, mut transport: Box<dyn Transport>) -> Phase {
        self.publish(ConnectionState::Open);

        let next = loop {
            tokio::select! {
                msg = transport.next_message() => match msg {
                    Some(Ok(WsMessage::Text(text))) => self.dispatch(&text),
                    Some(Ok(WsMessage::Binary(data))) => {
                        tracing::debug!(bytes = data.len(), "Ignoring binary frame");
                    }
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Feed transport error");
                        break Phase::Closed;
                    }
                    None => {
                        tracing::warn!("Feed connection closed");
                        break Phase::Closed;
                    }
                },
                Some(clear) = self.clear_rx.recv() => {
                    self.state.write().prices.clear(&clear);
                }
                _ = self.shutdown.changed() => break Phase::Stopped,
            }
        };

        transport.close().await;
        next
    }

    async fn closed(&mut self) -> Phase {
        self.publish(ConnectionState::Closed);
        telemetry::increment(CounterMetric::ReconnectsScheduled);
        tracing::warn!(
            delay_ms = self.reconnect_delay.as_millis() as u64,
            "Live prices unavailable, reconnecting"
        );

        let wait = tokio::time::sleep(self.reconnect_delay);
        tokio::pin!(wait);

        loop {
            tokio::select! {
                _ = &mut wait => return Phase::Connecting,
                Some(clear) = self.clear_rx.recv() => {
                    self.state.write().prices.clear(&clear);
                }
                _ = self.shutdown.changed() => return Phase::Stopped,
            }
        }
    }

    /// Normalize one text frame and fan the tick out to every view
    fn dispatch(&self, raw: &str) {
        let tick = match normalize(raw) {
            Ok(Some(tick)) => tick,
            Ok(None) => {
                telemetry::increment(CounterMetric::EventsIgnored);
                tracing::trace!(payload = raw, "Ignoring non-price event");
                return;
            }
            Err(e) => {
                telemetry::increment(CounterMetric::TicksRejected);
                tracing::debug!(error = %e, payload = raw, "Dropping malformed message");
                return;
            }
        };

        let clear = self.state.write().apply(&tick);
        telemetry::increment(CounterMetric::TicksIngested);
        tracing::trace!(symbol = %tick.symbol, price = tick.price, "Tick applied");

        if let Some(clear) = clear {
            self.schedule_clear(clear);
        }
    }

    /// Post the clear back to this loop once the highlight window elapses
    fn schedule_clear(&self, clear: HighlightClear) {
        let tx = self.clear_tx.clone();
        let delay = self.highlight_clear;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver is gone once the supervisor stopped; nothing to clear then
            let _ = tx.send(clear);
        });
    }

    fn publish(&self, next: ConnectionState) {
        let changed = self.connection.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });

        if changed {
            telemetry::set_feed_live(next.is_live());
            tracing::debug!(state = ?next, "Connection state changed");
        }
    }
}
