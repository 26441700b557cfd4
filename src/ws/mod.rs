//! WebSocket transport
//!
//! The supervisor talks to the feed through the [`Connector`] and
//! [`Transport`] traits; [`WsConnector`] is the `tokio-tungstenite`
//! implementation with ping/pong keepalive.

mod client;
mod types;

pub use client::{WsConnector, WsTransport};
pub use types::{WsConfig, WsError, WsMessage, DEFAULT_CONNECT_TIMEOUT};

use async_trait::async_trait;

/// One established duplex connection
#[async_trait]
pub trait Transport: Send {
    /// Send a text frame
    async fn send(&mut self, text: String) -> Result<(), WsError>;

    /// Wait for the next inbound message
    ///
    /// Returns `None` once the peer has closed the connection. Must be
    /// cancellation safe, it is polled inside `tokio::select!`.
    async fn next_message(&mut self) -> Option<Result<WsMessage, WsError>>;

    /// Close the connection; safe to call more than once
    ///
    /// Must return in bounded time even if the peer stops reading.
    async fn close(&mut self);
}

/// Factory for fresh transports, called once per connection attempt
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a transport; a handshake that never completes must time out
    async fn connect(&self) -> Result<Box<dyn Transport>, WsError>;
}
