//! WebSocket transport tests against a local server

use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tick_pulse::config::EngineConfig;
use tick_pulse::engine::{ConnectionState, Supervisor};
use tick_pulse::ws::{Connector, Transport, WsConfig, WsConnector, WsMessage};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// Accepts connections; for each one reports the first frame received,
/// sends `script`, then closes.
async fn spawn_server(script: Vec<String>) -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (first_tx, first_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((tcp, _)) = listener.accept().await {
            let script = script.clone();
            let first_tx = first_tx.clone();
            tokio::spawn(async move {
                let mut ws = accept_async(tcp).await.unwrap();
                if let Some(Ok(Message::Text(text))) = ws.next().await {
                    let _ = first_tx.send(text);
                }
                for frame in script {
                    ws.send(Message::Text(frame)).await.unwrap();
                }
                let _ = ws.close(None).await;
            });
        }
    });

    (format!("ws://{}", addr), first_rx)
}

#[tokio::test]
async fn test_ws_transport_round_trip() {
    let (url, mut first) = spawn_server(vec![
        r#"{"event":"price","symbol":"BTC/USD","price":"42500.50"}"#.to_string(),
    ])
    .await;

    let connector = WsConnector::new(WsConfig::new(url).ping_interval(Duration::ZERO));
    let mut transport = connector.connect().await.unwrap();

    transport.send("hello".to_string()).await.unwrap();
    assert_eq!(first.recv().await.unwrap(), "hello");

    let msg = tokio::time::timeout(Duration::from_secs(5), transport.next_message())
        .await
        .expect("Test timed out");
    match msg {
        Some(Ok(WsMessage::Text(text))) => assert!(text.contains("42500.50")),
        other => panic!("unexpected message: {other:?}"),
    }

    let end = tokio::time::timeout(Duration::from_secs(5), transport.next_message())
        .await
        .expect("Test timed out");
    assert!(end.is_none());

    transport.close().await;
    transport.close().await;
}

#[tokio::test]
async fn test_supervisor_over_real_socket_reconnects() {
    let (url, mut first) = spawn_server(vec![
        r#"{"event":"subscribe-status","status":"ok"}"#.to_string(),
        r#"{"event":"price","symbol":"BTC/USD","price":"100"}"#.to_string(),
        r#"{"event":"price","symbol":"BTC/USD","price":101.5}"#.to_string(),
    ])
    .await;

    let connector = WsConnector::new(WsConfig::new(url).ping_interval(Duration::ZERO));
    let config = EngineConfig {
        reconnect_delay_ms: 50,
        ..Default::default()
    };
    let (supervisor, handle) =
        Supervisor::new(vec!["BTC/USD".to_string()], &config, connector).unwrap();
    let task = tokio::spawn(supervisor.run());

    let subscribe = tokio::time::timeout(Duration::from_secs(5), first.recv())
        .await
        .expect("Test timed out")
        .unwrap();
    assert_eq!(
        subscribe,
        r#"{"action":"subscribe","params":{"symbols":"BTC/USD"}}"#
    );

    // Server closes after its script; the supervisor must come back and resubscribe
    let again = tokio::time::timeout(Duration::from_secs(5), first.recv())
        .await
        .expect("Supervisor did not reconnect")
        .unwrap();
    assert_eq!(again, subscribe);

    let history = handle.history("BTC/USD");
    assert!(history.len() >= 2);
    assert_eq!(&history[..2], &[100.0, 101.5]);

    handle.shutdown();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("Supervisor did not stop")
        .unwrap();
    assert_eq!(handle.connection_state(), ConnectionState::Closed);
}

/// Accepts TCP connections and holds them without answering the upgrade;
/// reports each accept.
async fn spawn_stalled_server() -> (String, mpsc::UnboundedReceiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (accepted_tx, accepted_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((tcp, _)) = listener.accept().await {
            held.push(tcp);
            let _ = accepted_tx.send(());
        }
    });

    (format!("ws://{}", addr), accepted_rx)
}

#[tokio::test]
async fn test_supervisor_retries_after_stalled_handshake() {
    let (url, mut accepted) = spawn_stalled_server().await;

    let connector = WsConnector::new(
        WsConfig::new(url)
            .ping_interval(Duration::ZERO)
            .connect_timeout(Duration::from_millis(200)),
    );
    let config = EngineConfig {
        reconnect_delay_ms: 50,
        ..Default::default()
    };
    let (supervisor, handle) =
        Supervisor::new(vec!["BTC/USD".to_string()], &config, connector).unwrap();
    let mut states = handle.watch_connection();
    let task = tokio::spawn(supervisor.run());

    // The stalled attempt must give up and reach Closed
    tokio::time::timeout(
        Duration::from_secs(5),
        states.wait_for(|s| *s == ConnectionState::Closed),
    )
    .await
    .expect("Supervisor stuck in Connecting")
    .unwrap();

    // ...and the fixed-interval retry must hit the server again
    for _ in 0..2 {
        tokio::time::timeout(Duration::from_secs(5), accepted.recv())
            .await
            .expect("Supervisor never retried")
            .unwrap();
    }
    assert!(!handle.is_live());

    handle.shutdown();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("Supervisor did not stop")
        .unwrap();
}
