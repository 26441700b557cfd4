//! Prometheus metrics

/// Counter metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMetric {
    /// Ticks applied to the derived views
    TicksIngested,
    /// Payloads dropped by the normalizer
    TicksRejected,
    /// Well-formed non-price events
    EventsIgnored,
    /// Successful connection opens (subscription sent)
    ConnectionsOpened,
    /// Reconnections scheduled after a close
    ReconnectsScheduled,
}

impl CounterMetric {
    /// Exported metric name
    pub fn name(&self) -> &'static str {
        match self {
            CounterMetric::TicksIngested => "tickpulse_ticks_ingested_total",
            CounterMetric::TicksRejected => "tickpulse_ticks_rejected_total",
            CounterMetric::EventsIgnored => "tickpulse_events_ignored_total",
            CounterMetric::ConnectionsOpened => "tickpulse_connections_opened_total",
            CounterMetric::ReconnectsScheduled => "tickpulse_reconnects_scheduled_total",
        }
    }
}

/// Gauge name for feed liveness (1 = live)
const FEED_LIVE_GAUGE: &str = "tickpulse_feed_live";

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    metrics::counter!(metric.name()).increment(1);
}

/// Publish feed liveness
pub fn set_feed_live(live: bool) {
    metrics::gauge!(FEED_LIVE_GAUGE).set(if live { 1.0 } else { 0.0 });
}
