//! Configuration types for tick-pulse

use crate::ws::WsConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides `feed.api_key`
pub const API_KEY_ENV: &str = "TICK_PULSE_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub feed: FeedConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Price feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// WebSocket endpoint
    pub url: String,
    /// Credential appended to the endpoint as `apikey`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Symbols to subscribe to, in subscription order
    pub symbols: Vec<String>,
    /// Keepalive ping interval in milliseconds (0 disables pings)
    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,
    /// Bound on each connection handshake and close in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl FeedConfig {
    /// Endpoint with the credential attached, preferring the environment
    pub fn endpoint(&self) -> String {
        let key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone());

        match key {
            Some(key) => {
                let sep = if self.url.contains('?') { '&' } else { '?' };
                format!("{}{}apikey={}", self.url, sep, key)
            }
            None => self.url.clone(),
        }
    }

    /// WebSocket client settings for this feed
    pub fn ws_config(&self) -> WsConfig {
        WsConfig::new(self.endpoint())
            .ping_interval(Duration::from_millis(self.ping_interval_ms))
            .connect_timeout(Duration::from_millis(self.connect_timeout_ms))
    }
}

fn default_ping_interval_ms() -> u64 {
    30_000
}
fn default_connect_timeout_ms() -> u64 {
    crate::ws::DEFAULT_CONNECT_TIMEOUT.as_millis() as u64
}

/// Aggregation and supervision tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Prices retained per symbol in the rolling history
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Ticks per candle
    #[serde(default = "default_candle_bucket_size")]
    pub candle_bucket_size: u32,

    /// How long a price change stays highlighted (milliseconds)
    #[serde(default = "default_highlight_clear_ms")]
    pub highlight_clear_ms: u64,

    /// Fixed wait before reconnecting after a close (milliseconds)
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

fn default_history_capacity() -> usize {
    crate::history::DEFAULT_HISTORY_CAPACITY
}
fn default_candle_bucket_size() -> u32 {
    crate::candle::DEFAULT_BUCKET_SIZE
}
fn default_highlight_clear_ms() -> u64 {
    crate::flash::DEFAULT_HIGHLIGHT_CLEAR.as_millis() as u64
}
fn default_reconnect_delay_ms() -> u64 {
    3_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            candle_bucket_size: default_candle_bucket_size(),
            highlight_clear_ms: default_highlight_clear_ms(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

impl EngineConfig {
    pub fn highlight_clear(&self) -> Duration {
        Duration::from_millis(self.highlight_clear_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Reject zero capacities and delays
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::NonPositive("history_capacity"));
        }
        if self.candle_bucket_size == 0 {
            return Err(ConfigError::NonPositive("candle_bucket_size"));
        }
        if self.highlight_clear_ms == 0 {
            return Err(ConfigError::NonPositive("highlight_clear_ms"));
        }
        if self.reconnect_delay_ms == 0 {
            return Err(ConfigError::NonPositive("reconnect_delay_ms"));
        }
        Ok(())
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Port for the Prometheus exporter; disabled when absent
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

/// Configuration mistakes caught before the engine starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("At least one symbol must be configured")]
    NoSymbols,
    #[error("Symbol names must not be blank")]
    BlankSymbol,
    #[error("Duplicate symbol: {0}")]
    DuplicateSymbol(String),
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),
    #[error("Feed URL must not be empty")]
    MissingUrl,
}

/// Check a subscription symbol set: non-empty, no blanks, no duplicates
pub fn validate_symbols<S: AsRef<str>>(symbols: &[S]) -> Result<(), ConfigError> {
    if symbols.is_empty() {
        return Err(ConfigError::NoSymbols);
    }

    let mut seen = HashSet::new();
    for symbol in symbols {
        let symbol = symbol.as_ref();
        if symbol.trim().is_empty() {
            return Err(ConfigError::BlankSymbol);
        }
        if !seen.insert(symbol) {
            return Err(ConfigError::DuplicateSymbol(symbol.to_string()));
        }
    }
    Ok(())
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Fail fast on operator mistakes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.url.trim().is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        validate_symbols(&self.feed.symbols)?;
        if self.feed.connect_timeout_ms == 0 {
            return Err(ConfigError::NonPositive("connect_timeout_ms"));
        }
        self.engine.validate()
    }
}
