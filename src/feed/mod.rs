//! Price feed module
//!
//! Turns raw inbound feed payloads into typed ticks and builds the
//! outbound subscription request.

mod normalizer;
mod types;

pub use normalizer::normalize;
pub use types::{NormalizeError, SubscribeParams, SubscribeRequest, Tick};
