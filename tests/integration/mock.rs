//! Channel-backed transport for driving the supervisor in tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tick_pulse::ws::{Connector, Transport, WsError, WsMessage};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Test side of one accepted connection
pub struct MockSession {
    /// Feed messages into the supervisor; dropping it closes the connection
    pub inbound: mpsc::UnboundedSender<Result<WsMessage, WsError>>,
    /// Frames the supervisor sent
    pub sent: mpsc::UnboundedReceiver<String>,
    /// Set once the supervisor closed the transport
    pub closed: Arc<AtomicBool>,
}

impl MockSession {
    pub fn push_text(&self, text: impl Into<String>) {
        let _ = self.inbound.send(Ok(WsMessage::Text(text.into())));
    }

    pub fn push_price(&self, symbol: &str, price: &str) {
        self.push_text(format!(
            r#"{{"event":"price","symbol":"{symbol}","price":"{price}"}}"#
        ));
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Test side of the connector
pub struct MockController {
    pub sessions: mpsc::UnboundedReceiver<MockSession>,
    /// Remaining connection attempts that will fail
    pub failures: Arc<AtomicUsize>,
    /// Remaining connections whose outbound sends will fail
    pub broken_sends: Arc<AtomicUsize>,
    /// When each connection attempt happened
    pub attempts: Arc<Mutex<Vec<Instant>>>,
}

impl MockController {
    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().len()
    }
}

pub struct MockConnector {
    sessions: mpsc::UnboundedSender<MockSession>,
    failures: Arc<AtomicUsize>,
    broken_sends: Arc<AtomicUsize>,
    attempts: Arc<Mutex<Vec<Instant>>>,
}

pub fn mock_connector() -> (MockConnector, MockController) {
    let (sessions_tx, sessions_rx) = mpsc::unbounded_channel();
    let failures = Arc::new(AtomicUsize::new(0));
    let broken_sends = Arc::new(AtomicUsize::new(0));
    let attempts = Arc::new(Mutex::new(Vec::new()));

    let connector = MockConnector {
        sessions: sessions_tx,
        failures: Arc::clone(&failures),
        broken_sends: Arc::clone(&broken_sends),
        attempts: Arc::clone(&attempts),
    };
    let controller = MockController {
        sessions: sessions_rx,
        failures,
        broken_sends,
        attempts,
    };
    (connector, controller)
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self) -> Result<Box<dyn Transport>, WsError> {
        self.attempts.lock().push(Instant::now());

        if take_one(&self.failures) {
            return Err(WsError::ConnectionFailed("refused".into()));
        }

        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (sent_tx, mut sent_rx) = mpsc::unbounded_channel();
        if take_one(&self.broken_sends) {
            // Sends fail once the receiving side is gone
            sent_rx.close();
        }
        let closed = Arc::new(AtomicBool::new(false));

        let _ = self.sessions.send(MockSession {
            inbound: inbound_tx,
            sent: sent_rx,
            closed: Arc::clone(&closed),
        });

        Ok(Box::new(MockTransport {
            inbound: inbound_rx,
            sent: sent_tx,
            closed,
        }))
    }
}

/// Decrement a budget, returning whether one was available
fn take_one(budget: &AtomicUsize) -> bool {
    budget
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

struct MockTransport {
    inbound: mpsc::UnboundedReceiver<Result<WsMessage, WsError>>,
    sent: mpsc::UnboundedSender<String>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, text: String) -> Result<(), WsError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(WsError::SendFailed("closed".into()));
        }
        self.sent
            .send(text)
            .map_err(|e| WsError::SendFailed(e.to_string()))
    }

    async fn next_message(&mut self) -> Option<Result<WsMessage, WsError>> {
        if self.closed.load(Ordering::SeqCst) {
            return None;
        }
        self.inbound.recv().await
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Recorder that keeps every gauge write, in order
#[derive(Clone, Default)]
pub struct GaugeLog {
    writes: Arc<Mutex<Vec<(String, f64)>>>,
}

impl GaugeLog {
    /// Values written to one gauge, oldest first
    pub fn values(&self, name: &str) -> Vec<f64> {
        self.writes
            .lock()
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .collect()
    }
}

struct GaugeHandle {
    name: String,
    writes: Arc<Mutex<Vec<(String, f64)>>>,
}

impl metrics::GaugeFn for GaugeHandle {
    fn increment(&self, _value: f64) {}

    fn decrement(&self, _value: f64) {}

    fn set(&self, value: f64) {
        self.writes.lock().push((self.name.clone(), value));
    }
}

impl metrics::Recorder for GaugeLog {
    fn describe_counter(
        &self,
        _: metrics::KeyName,
        _: Option<metrics::Unit>,
        _: metrics::SharedString,
    ) {
    }

    fn describe_gauge(
        &self,
        _: metrics::KeyName,
        _: Option<metrics::Unit>,
        _: metrics::SharedString,
    ) {
    }

    fn describe_histogram(
        &self,
        _: metrics::KeyName,
        _: Option<metrics::Unit>,
        _: metrics::SharedString,
    ) {
    }

    fn register_counter(&self, _: &metrics::Key, _: &metrics::Metadata<'_>) -> metrics::Counter {
        metrics::Counter::noop()
    }

    fn register_gauge(&self, key: &metrics::Key, _: &metrics::Metadata<'_>) -> metrics::Gauge {
        metrics::Gauge::from_arc(Arc::new(GaugeHandle {
            name: key.name().to_string(),
            writes: Arc::clone(&self.writes),
        }))
    }

    fn register_histogram(
        &self,
        _: &metrics::Key,
        _: &metrics::Metadata<'_>,
    ) -> metrics::Histogram {
        metrics::Histogram::noop()
    }
}
