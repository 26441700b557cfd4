//! Inbound message normalization

use super::{NormalizeError, Tick};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Event kind carried by price updates
const PRICE_EVENT: &str = "price";

/// Body of a price event; unknown fields are ignored
#[derive(Debug, Deserialize)]
struct PriceMessage {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    price: Option<RawPrice>,
}

/// Prices arrive either as JSON numbers or numeric-looking strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
}

impl RawPrice {
    fn to_f64(&self) -> Result<f64, NormalizeError> {
        let price = match self {
            RawPrice::Number(n) => *n,
            RawPrice::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| NormalizeError::InvalidPrice(s.clone()))?,
        };

        if !price.is_finite() {
            return Err(NormalizeError::NonFinitePrice(price));
        }
        Ok(price)
    }
}

/// Parse a raw feed payload into a tick
///
/// Returns `Ok(None)` for well-formed messages that are not price updates
/// (subscription acks, heartbeats, vendor errors). Returns an error when
/// the payload cannot be decoded or carries no usable symbol and price.
pub fn normalize(raw: &str) -> Result<Option<Tick>, NormalizeError> {
    let fields: Map<String, Value> = match serde_json::from_str::<Value>(raw)? {
        Value::Object(fields) => fields,
        _ => return Err(NormalizeError::NotAnObject),
    };

    // Other event kinds may reuse field names with different shapes
    if fields.get("event").and_then(Value::as_str) != Some(PRICE_EVENT) {
        return Ok(None);
    }

    let msg: PriceMessage = serde_json::from_value(Value::Object(fields))?;

    let symbol = msg
        .symbol
        .filter(|s| !s.trim().is_empty())
        .ok_or(NormalizeError::MissingField("symbol"))?;
    let price = msg
        .price
        .ok_or(NormalizeError::MissingField("price"))?
        .to_f64()?;

    Ok(Some(Tick {
        symbol,
        price,
        received_at: Utc::now(),
    }))
}
