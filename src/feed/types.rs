//! Price feed types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single normalized price update for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Instrument symbol (e.g., "BTC/USD")
    pub symbol: String,
    /// Trade price, always finite
    pub price: f64,
    /// Local timestamp when the tick was received
    pub received_at: DateTime<Utc>,
}

impl Tick {
    /// Create a tick stamped with the current time
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            received_at: Utc::now(),
        }
    }
}

/// Reasons an inbound payload is rejected
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Payload is not valid JSON, or a price event has mistyped fields
    #[error("Undecodable payload: {0}")]
    Decode(#[from] serde_json::Error),
    /// Payload is valid JSON but not an object
    #[error("Payload is not a JSON object")]
    NotAnObject,
    /// A required field is absent or empty
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    /// Price string does not parse as a number
    #[error("Invalid price: {0:?}")]
    InvalidPrice(String),
    /// Price parsed but is NaN or infinite
    #[error("Non-finite price: {0}")]
    NonFinitePrice(f64),
}

/// Outbound subscription message, sent once per successful connection
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeRequest {
    pub action: &'static str,
    pub params: SubscribeParams,
}

/// Parameters of a subscription request
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeParams {
    /// Comma-joined symbol list
    pub symbols: String,
}

impl SubscribeRequest {
    /// Build a subscribe request for the given symbols, preserving order
    pub fn new<S: AsRef<str>>(symbols: &[S]) -> Self {
        let symbols = symbols
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(",");

        Self {
            action: "subscribe",
            params: SubscribeParams { symbols },
        }
    }

    /// Serialize to the JSON text frame
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
