//! WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use pingboard_realtime::message::OutboundMessage;

use crate::state::AppState;

/// Query parameters for WebSocket authentication.
///
/// The token travels as connection metadata, never as an in-channel
/// message.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    #[serde(default)]
    pub token: String,
}

/// GET /ws?token={jwt} — WebSocket upgrade.
///
/// The upgrade always completes; authentication happens on the open socket
/// so a rejected client receives one terminal error frame before closure.
/// A missing token is treated exactly like an invalid one.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    query: Result<Query<WsQuery>, QueryRejection>,
    ws: WebSocketUpgrade,
) -> Response {
    let token = query.ok().map(|Query(q)| q.token).unwrap_or_default();
    ws.on_upgrade(move |socket| handle_ws_connection(state, token, socket))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, token: String, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    // Authenticate and admit. On failure the connection was never
    // registered: send the one-shot error frame and close.
    let (handle, mut outbound_rx) = match state.realtime.connect(&token).await {
        Ok(pair) => pair,
        Err(e) => {
            warn!(error = %e.message, "WebSocket authentication failed");
            let frame = OutboundMessage::Error {
                code: e.kind.to_string(),
                message: e.message,
            };
            if let Ok(text) = serde_json::to_string(&frame) {
                let _ = ws_tx.send(Message::Text(text.into())).await;
            }
            let _ = ws_tx.close().await;
            return;
        }
    };

    let conn_id = handle.id;
    info!(conn_id = %conn_id, user_id = %handle.user_id, "WebSocket connection established");

    // Forward outbound frames from the engine to the socket.
    let outbound_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let Ok(text) = serde_json::to_string(&msg) else {
                continue;
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Process inbound frames until the client goes away or the engine
    // shuts down.
    let mut shutdown_rx = state.realtime.shutdown_receiver();
    loop {
        tokio::select! {
            result = ws_rx.next() => match result {
                Some(Ok(Message::Text(text))) => {
                    state.realtime.handle_inbound(&conn_id, text.as_str());
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            },
            _ = shutdown_rx.recv() => {
                info!(conn_id = %conn_id, "Closing connection on shutdown");
                break;
            }
        }
    }

    // Evict before anything else can observe this connection again.
    outbound_task.abort();
    state.realtime.disconnect(&conn_id);

    info!(conn_id = %conn_id, "WebSocket connection closed");
}
