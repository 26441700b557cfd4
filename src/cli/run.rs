//! Run command implementation

use crate::candle;
use crate::config::Config;
use crate::engine::{ConnectionState, EngineHandle, Supervisor};
use crate::ws::WsConnector;
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Seconds between snapshot reports
    #[arg(short, long, default_value_t = 5)]
    pub report_interval_secs: u64,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let connector = WsConnector::new(config.feed.ws_config());
        let (supervisor, handle) =
            Supervisor::new(config.feed.symbols.clone(), &config.engine, connector)?;

        let engine = tokio::spawn(supervisor.run());

        let mut report = tokio::time::interval(Duration::from_secs(self.report_interval_secs.max(1)));
        let mut connection = handle.watch_connection();

        loop {
            tokio::select! {
                _ = report.tick() => report_views(&handle),
                changed = connection.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = *connection.borrow_and_update();
                    match state {
                        ConnectionState::Open => tracing::info!("Live prices available"),
                        ConnectionState::Connecting => tracing::info!("Connecting to feed"),
                        ConnectionState::Closed => {
                            tracing::warn!("Live prices unavailable. Reconnecting...")
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupt received, shutting down");
                    break;
                }
            }
        }

        handle.shutdown();
        engine.await?;
        Ok(())
    }
}

/// Log one line per symbol with price, history and candle summaries
fn report_views(handle: &EngineHandle) {
    for symbol in handle.symbols() {
        let snap = handle.snapshot(symbol);
        let price = snap
            .price
            .map(|p| p.to_string())
            .unwrap_or_else(|| "Loading...".to_string());
        let last = snap.candles.last();

        tracing::info!(
            symbol = %symbol,
            price = %price,
            highlighted = snap.price.is_some_and(|p| p.highlighted),
            live = handle.is_live(),
            history_len = snap.history.len(),
            history_range = ?handle.history_range(symbol),
            candles = snap.candles.len(),
            candle_range = ?candle::price_range(&snap.candles),
            last_close = last.map(|c| c.close),
            last_ticks = last.map(|c| c.tick_count),
            "Snapshot"
        );
    }
}
