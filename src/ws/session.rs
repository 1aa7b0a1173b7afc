//! Peer session lifecycle.
//!
//! An admitted connection is split into two halves, each driven by its own
//! task:
//!
//! - the inbound task reads frames and hands them to
//!   [`SessionRegistry::broadcast`];
//! - the outbound task drains the session's bounded queue onto the socket.
//!
//! The tasks never reference each other. Whichever ends first triggers the
//! same teardown: the session is removed from the registry (which closes
//! its queue) and the other task is wound down.

use std::fmt;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::task::JoinHandle;

use super::messages::Inbound;
use crate::domain::{OutboundRx, SessionId, SessionRegistry};

/// Why one half of a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The peer sent a close frame or the stream ended.
    PeerClosed,
    /// Reading from the socket failed.
    ReadFailed,
    /// The outbound queue was closed by the registry and fully drained.
    QueueClosed,
    /// Writing to the socket failed.
    WriteFailed,
    /// The task panicked or was cancelled.
    Aborted,
}

impl fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::PeerClosed => "peer closed",
            Self::ReadFailed => "read failed",
            Self::QueueClosed => "queue closed",
            Self::WriteFailed => "write failed",
            Self::Aborted => "aborted",
        };
        f.write_str(reason)
    }
}

/// Runs an admitted session until both of its tasks have finished.
///
/// The session must already be present in `registry`; it is removed here
/// exactly once, regardless of which side fails first.
pub async fn run_session(
    socket: WebSocket,
    session_id: SessionId,
    outbound_rx: OutboundRx,
    registry: Arc<SessionRegistry>,
) {
    let (ws_tx, ws_rx) = socket.split();

    let mut outbound = tokio::spawn(outbound_loop(session_id, ws_tx, outbound_rx));
    let mut inbound = tokio::spawn(inbound_loop(session_id, ws_rx, Arc::clone(&registry)));

    tokio::select! {
        end = &mut inbound => {
            let end = end.unwrap_or(SessionEnd::Aborted);
            teardown(session_id, &registry, end).await;
            // Queue is closed now; the outbound task flushes what is left,
            // sends a close frame, and exits.
            let tail = join(outbound).await;
            tracing::debug!(session_id = %session_id, outbound = %tail, "outbound task finished");
        }
        end = &mut outbound => {
            let end = end.unwrap_or(SessionEnd::Aborted);
            teardown(session_id, &registry, end).await;
            inbound.abort();
            let tail = join(inbound).await;
            tracing::debug!(session_id = %session_id, inbound = %tail, "inbound task finished");
        }
    }
}

/// Single cleanup path for both halves of a session.
async fn teardown(session_id: SessionId, registry: &SessionRegistry, end: SessionEnd) {
    let removed = registry.remove(session_id).await;
    tracing::info!(session_id = %session_id, reason = %end, removed, "session closing");
}

async fn join(handle: JoinHandle<SessionEnd>) -> SessionEnd {
    handle.await.unwrap_or(SessionEnd::Aborted)
}

/// Reads frames from the peer and offers each payload to the other session.
async fn inbound_loop(
    session_id: SessionId,
    mut ws_rx: SplitStream<WebSocket>,
    registry: Arc<SessionRegistry>,
) -> SessionEnd {
    while let Some(frame) = ws_rx.next().await {
        let message = match frame {
            Ok(message) => message,
            Err(error) => {
                tracing::debug!(session_id = %session_id, %error, "ws read failed");
                return SessionEnd::ReadFailed;
            }
        };

        match Inbound::from(message) {
            Inbound::Forward(payload) => {
                let report = registry.broadcast(session_id, &payload).await;
                if report.dropped > 0 {
                    tracing::debug!(
                        session_id = %session_id,
                        delivered = report.delivered,
                        dropped = report.dropped,
                        "peer lagging, frame dropped"
                    );
                }
            }
            Inbound::Ignore => {}
            Inbound::Close => return SessionEnd::PeerClosed,
        }
    }

    SessionEnd::PeerClosed
}

/// Writes queued payloads to the peer until the queue closes or a write fails.
async fn outbound_loop(
    session_id: SessionId,
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut outbound_rx: OutboundRx,
) -> SessionEnd {
    while let Some(payload) = outbound_rx.recv().await {
        if let Err(error) = ws_tx.send(Message::Text(payload)).await {
            tracing::debug!(session_id = %session_id, %error, "ws write failed");
            return SessionEnd::WriteFailed;
        }
    }

    if let Err(error) = ws_tx.close().await {
        tracing::trace!(session_id = %session_id, %error, "ws close after drain failed");
    }
    SessionEnd::QueueClosed
}
