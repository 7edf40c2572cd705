//! Integration tests for the WebSocket connection lifecycle and ping routing.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::helpers::TestApp;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open a WebSocket connection with the given token.
async fn connect(addr: SocketAddr, token: &str) -> WsStream {
    let url = format!("ws://{addr}/ws?token={token}");
    let (stream, _) = connect_async(url).await.expect("Failed to connect");
    stream
}

/// Receive the next text frame and parse it as JSON.
async fn recv_json(ws: &mut WsStream) -> Value {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("Timed out waiting for frame")
        .expect("Connection closed unexpectedly")
        .expect("WebSocket error");
    serde_json::from_str(msg.to_text().expect("Expected a text frame"))
        .expect("Frame was not valid JSON")
}

/// Send a JSON value as a text frame.
async fn send_json(ws: &mut WsStream, value: Value) {
    ws.send(Message::text(value.to_string()))
        .await
        .expect("Failed to send frame");
}

fn online_list(frame: &Value) -> Vec<&str> {
    assert_eq!(frame["type"], "presence", "Expected presence, got {frame}");
    frame["online"]
        .as_array()
        .expect("Missing online list")
        .iter()
        .map(|v| v.as_str().expect("Non-string username"))
        .collect()
}

#[tokio::test]
async fn test_presence_on_connect() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let mut alice = connect(addr, &app.issue_token("alice")).await;
    let frame = recv_json(&mut alice).await;
    assert_eq!(online_list(&frame), vec!["alice"]);

    let mut bob = connect(addr, &app.issue_token("bob")).await;
    let frame = recv_json(&mut bob).await;
    assert_eq!(online_list(&frame), vec!["alice", "bob"]);

    // The same membership change reaches already-connected clients.
    let frame = recv_json(&mut alice).await;
    assert_eq!(online_list(&frame), vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_ping_point_to_point() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let mut alice = connect(addr, &app.issue_token("alice")).await;
    recv_json(&mut alice).await;

    let mut bob = connect(addr, &app.issue_token("bob")).await;
    recv_json(&mut bob).await;
    recv_json(&mut alice).await;

    send_json(&mut bob, serde_json::json!({"type": "signal", "target": "alice"})).await;

    let frame = recv_json(&mut alice).await;
    assert_eq!(frame["type"], "notify");
    assert_eq!(frame["from"], "bob");
    assert_eq!(frame["message"], "Ping!");
}

#[tokio::test]
async fn test_broadcast_excludes_sender() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let mut alice = connect(addr, &app.issue_token("alice")).await;
    recv_json(&mut alice).await;

    let mut bob = connect(addr, &app.issue_token("bob")).await;
    recv_json(&mut bob).await;
    recv_json(&mut alice).await;

    let mut carol = connect(addr, &app.issue_token("carol")).await;
    recv_json(&mut carol).await;
    recv_json(&mut alice).await;
    recv_json(&mut bob).await;

    send_json(&mut carol, serde_json::json!({"type": "signal", "target": "all"})).await;

    for ws in [&mut alice, &mut bob] {
        let frame = recv_json(ws).await;
        assert_eq!(frame["type"], "notify");
        assert_eq!(frame["from"], "carol");
    }

    // Carol must not see her own broadcast: the next frame she receives
    // is a direct ping sent afterwards, not the broadcast.
    send_json(&mut alice, serde_json::json!({"type": "signal", "target": "carol"})).await;
    let frame = recv_json(&mut carol).await;
    assert_eq!(frame["from"], "alice");
}

#[tokio::test]
async fn test_signal_to_offline_user_dropped() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let mut alice = connect(addr, &app.issue_token("alice")).await;
    recv_json(&mut alice).await;

    send_json(&mut alice, serde_json::json!({"type": "signal", "target": "ghost"})).await;

    // Connection stays healthy; a follow-up self-ping comes through with
    // nothing queued before it.
    send_json(&mut alice, serde_json::json!({"type": "signal", "target": "alice"})).await;
    let frame = recv_json(&mut alice).await;
    assert_eq!(frame["type"], "notify");
    assert_eq!(frame["from"], "alice");
}

#[tokio::test]
async fn test_malformed_frame_gets_error() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let mut alice = connect(addr, &app.issue_token("alice")).await;
    recv_json(&mut alice).await;

    alice
        .send(Message::text("this is not json"))
        .await
        .expect("Failed to send frame");

    let frame = recv_json(&mut alice).await;
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["code"], "INVALID_MESSAGE");
}

#[tokio::test]
async fn test_invalid_token_gets_error_then_close() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let mut ws = connect(addr, "not-a-real-token").await;

    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["code"], "AUTHENTICATION");

    // Server closes after the terminal error frame.
    let next = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("Timed out waiting for close");
    match next {
        None | Some(Ok(Message::Close(_))) => {}
        other => panic!("Expected close, got {other:?}"),
    }
}

#[tokio::test]
async fn test_disconnect_updates_presence() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let mut alice = connect(addr, &app.issue_token("alice")).await;
    recv_json(&mut alice).await;

    let mut bob = connect(addr, &app.issue_token("bob")).await;
    recv_json(&mut bob).await;
    recv_json(&mut alice).await;

    bob.close(None).await.expect("Failed to close");

    let frame = recv_json(&mut alice).await;
    assert_eq!(online_list(&frame), vec!["alice"]);
}

#[tokio::test]
async fn test_engine_shutdown_closes_clients() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let mut alice = connect(addr, &app.issue_token("alice")).await;
    recv_json(&mut alice).await;

    app.state.realtime.shutdown();

    // The server side drops the connection; the client observes a close
    // frame or the stream ending.
    let next = tokio::time::timeout(Duration::from_secs(5), alice.next())
        .await
        .expect("Timed out waiting for close");
    match next {
        None | Some(Ok(Message::Close(_))) | Some(Err(_)) => {}
        other => panic!("Expected close, got {other:?}"),
    }
    assert_eq!(app.state.realtime.connection_count(), 0);
}

#[tokio::test]
async fn test_login_token_works_for_ws() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    app.register("dave", "password123").await;
    let token = app.login("dave", "password123").await;

    let mut ws = connect(addr, &token).await;
    let frame = recv_json(&mut ws).await;
    assert_eq!(online_list(&frame), vec!["dave"]);
}
