//! Axum WebSocket upgrade handler and admission control.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::SinkExt;

use super::messages::ROOM_FULL_MESSAGE;
use super::session::run_session;
use crate::app_state::AppState;
use crate::domain::{SessionId, SessionRegistry, outbound_queue};

/// `GET /ws` — Upgrade HTTP connection to WebSocket and try to join the room.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let registry = Arc::clone(&state.registry);

    ws.on_failed_upgrade(|error: axum::Error| {
        tracing::warn!(%error, "websocket upgrade failed");
    })
    .on_upgrade(move |socket| admit(socket, registry))
}

/// Admits the upgraded socket as a session, or turns it away if the room
/// already holds two peers.
async fn admit(socket: WebSocket, registry: Arc<SessionRegistry>) {
    let session_id = SessionId::new();
    let (outbound_tx, outbound_rx) = outbound_queue();

    if !registry.add(session_id, outbound_tx).await {
        reject(socket).await;
        return;
    }

    run_session(socket, session_id, outbound_rx, registry).await;
}

/// Sends the room-full notice on the raw socket and closes it.
async fn reject(mut socket: WebSocket) {
    tracing::info!("room full, rejecting connection");

    if let Err(error) = socket.send(Message::text(ROOM_FULL_MESSAGE)).await {
        tracing::debug!(%error, "failed to deliver room-full notice");
        return;
    }
    if let Err(error) = SinkExt::close(&mut socket).await {
        tracing::debug!(%error, "failed to close rejected connection");
    }
}
