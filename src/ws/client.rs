//! `tokio-tungstenite` transport with ping/pong keepalive

use super::types::{WsConfig, WsError, WsMessage};
use super::{Connector, Transport};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens a fresh WebSocket connection per call
pub struct WsConnector {
    config: WsConfig,
}

impl WsConnector {
    /// Create a new connector with the given configuration
    pub fn new(config: WsConfig) -> Self {
        Self { config }
    }

    /// Create a connector with just a URL using default config
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::new(WsConfig::new(url))
    }

    /// Get the configured URL
    pub fn url(&self) -> &str {
        &self.config.url
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self) -> Result<Box<dyn Transport>, WsError> {
        tracing::info!(url = %redact(&self.config.url), "Connecting to WebSocket");

        let timeout = self.config.connect_timeout;
        let (stream, _response) = tokio::time::timeout(timeout, connect_async(&self.config.url))
            .await
            .map_err(|_| {
                WsError::ConnectionFailed(format!("handshake timed out after {timeout:?}"))
            })?
            .map_err(|e| WsError::ConnectionFailed(e.to_string()))?;

        tracing::info!("WebSocket connected");

        Ok(Box::new(WsTransport::new(stream, &self.config)))
    }
}

/// Live WebSocket connection
pub struct WsTransport {
    stream: WsStream,
    keepalive: Option<Interval>,
    close_timeout: Duration,
    waiting_for_pong: bool,
    closed: bool,
}

impl WsTransport {
    fn new(stream: WsStream, config: &WsConfig) -> Self {
        let keepalive = config.ping_interval.map(|period| {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        Self {
            stream,
            keepalive,
            close_timeout: config.connect_timeout,
            waiting_for_pong: false,
            closed: false,
        }
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&mut self, text: String) -> Result<(), WsError> {
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|e| WsError::SendFailed(e.to_string()))
    }

    async fn next_message(&mut self) -> Option<Result<WsMessage, WsError>> {
        if self.closed {
            return None;
        }

        loop {
            let stream = &mut self.stream;
            let keepalive = &mut self.keepalive;

            tokio::select! {
                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => return Some(Ok(WsMessage::Text(text))),
                        Some(Ok(Message::Binary(data))) => return Some(Ok(WsMessage::Binary(data))),
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = stream.send(Message::Pong(data)).await {
                                return Some(Err(WsError::SendFailed(e.to_string())));
                            }
                        }
                        Some(Ok(Message::Pong(_))) => {
                            self.waiting_for_pong = false;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            tracing::info!(?frame, "Received close frame");
                            self.closed = true;
                            return None;
                        }
                        Some(Ok(Message::Frame(_))) => {}
                        Some(Err(e)) => return Some(Err(WsError::ConnectionFailed(e.to_string()))),
                        None => {
                            self.closed = true;
                            return None;
                        }
                    }
                }

                _ = async {
                    match keepalive {
                        Some(interval) => interval.tick().await,
                        None => std::future::pending().await,
                    }
                } => {
                    if self.waiting_for_pong {
                        return Some(Err(WsError::PongTimeout));
                    }
                    if let Err(e) = stream.send(Message::Ping(vec![])).await {
                        return Some(Err(WsError::SendFailed(e.to_string())));
                    }
                    self.waiting_for_pong = true;
                }
            }
        }
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        match tokio::time::timeout(self.close_timeout, self.stream.close(None)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!(error = %e, "Error while closing WebSocket"),
            Err(_) => tracing::warn!("WebSocket close timed out, dropping connection"),
        }
    }
}

/// Strip the query string so credentials never reach the logs
fn redact(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}
