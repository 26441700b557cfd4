//! tick-pulse: live price tick aggregation
//!
//! This library provides the core components for:
//! - Normalizing raw feed payloads into typed ticks
//! - Rolling per-symbol price history
//! - Fixed tick-count OHLC candles
//! - Price direction tracking with self-clearing highlights
//! - A supervised WebSocket feed with fixed-interval reconnection
//! - Structured logging and Prometheus metrics

pub mod candle;
pub mod cli;
pub mod config;
pub mod engine;
pub mod feed;
pub mod flash;
pub mod history;
pub mod telemetry;
pub mod ws;
