//! WebSocket types and configuration

use std::time::Duration;
use thiserror::Error;

/// WebSocket client configuration
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// WebSocket URL to connect to, credentials included
    pub url: String,
    /// Interval for sending keepalive pings (`None` disables them)
    pub ping_interval: Option<Duration>,
    /// Upper bound on the TCP, TLS and upgrade handshake
    pub connect_timeout: Duration,
}

/// Default handshake bound
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            ping_interval: Some(Duration::from_secs(30)),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl WsConfig {
    /// Create a new config with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set ping interval; a zero duration disables keepalive pings
    pub fn ping_interval(mut self, d: Duration) -> Self {
        self.ping_interval = (!d.is_zero()).then_some(d);
        self
    }

    /// Set the handshake bound; also caps how long a close may take
    pub fn connect_timeout(mut self, d: Duration) -> Self {
        self.connect_timeout = d;
        self
    }
}

/// Inbound WebSocket messages
#[derive(Debug, Clone)]
pub enum WsMessage {
    /// Text message
    Text(String),
    /// Binary message
    Binary(Vec<u8>),
}

/// WebSocket errors
#[derive(Debug, Clone, Error)]
pub enum WsError {
    /// Connection failed or dropped
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// Send failed
    #[error("Send failed: {0}")]
    SendFailed(String),
    /// No pong arrived within one ping interval
    #[error("Pong timeout")]
    PongTimeout,
}
