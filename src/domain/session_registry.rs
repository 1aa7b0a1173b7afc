//! Capacity-limited registry of admitted sessions.
//!
//! [`SessionRegistry`] maps each admitted [`SessionId`] to the sending half
//! of that session's bounded outbound queue. Every operation (admission,
//! removal, broadcast) runs under one [`tokio::sync::Mutex`], and none of
//! them performs network I/O while holding it: broadcast only attempts
//! non-blocking enqueues.
//!
//! The registry holds the only [`OutboundTx`] for a session, so removing the
//! entry is what closes the queue. The outbound task then drains whatever is
//! left and observes the closure.

use std::collections::HashMap;

use axum::extract::ws::Utf8Bytes;
use tokio::sync::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::SessionId;

/// Maximum number of concurrently admitted sessions.
pub const MAX_PEERS: usize = 2;

/// Depth of each session's outbound queue.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 16;

/// One opaque text frame as received from a peer. Cheap to clone.
pub type Payload = Utf8Bytes;

/// Producer side of a session's outbound queue, held by the registry.
pub type OutboundTx = mpsc::Sender<Payload>;

/// Consumer side of a session's outbound queue, held by its outbound task.
pub type OutboundRx = mpsc::Receiver<Payload>;

/// Creates a fresh outbound queue with [`OUTBOUND_QUEUE_CAPACITY`] slots.
#[must_use]
pub fn outbound_queue() -> (OutboundTx, OutboundRx) {
    mpsc::channel(OUTBOUND_QUEUE_CAPACITY)
}

/// Outcome of a single [`SessionRegistry::broadcast`] call.
///
/// Informational only: dropped copies are the backpressure policy working
/// as intended, not an error.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Recipients whose queue accepted the payload.
    pub delivered: usize,
    /// Recipients whose queue was full or already closed.
    pub dropped: usize,
}

/// Process-wide set of admitted sessions.
///
/// # Concurrency
///
/// - Admission and removal are serialized with broadcast, so a session is
///   never enqueued to after it has been removed.
/// - Broadcast never waits on a recipient. A full queue loses the frame.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, OutboundTx>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a session if fewer than [`MAX_PEERS`] are present.
    ///
    /// Returns `false` and leaves membership untouched when the registry is
    /// full or `id` is already admitted. A rejected `outbound` is dropped.
    pub async fn add(&self, id: SessionId, outbound: OutboundTx) -> bool {
        let mut sessions = self.sessions.lock().await;
        if sessions.len() >= MAX_PEERS || sessions.contains_key(&id) {
            return false;
        }
        sessions.insert(id, outbound);
        tracing::info!(session_id = %id, peers = sessions.len(), "session admitted");
        true
    }

    /// Removes a session and closes its outbound queue.
    ///
    /// Idempotent: returns `true` only for the call that actually removed
    /// the entry. Later calls are no-ops, so the queue is closed once.
    pub async fn remove(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions.lock().await;
        let removed = sessions.remove(&id);
        let peers = sessions.len();
        drop(sessions);

        match removed {
            Some(outbound) => {
                drop(outbound);
                tracing::info!(session_id = %id, peers, "session removed");
                true
            }
            None => false,
        }
    }

    /// Offers `payload` to every admitted session except `sender`.
    ///
    /// Each enqueue is a `try_send`; a recipient whose queue is full (or
    /// whose outbound task has already exited) simply misses this payload.
    pub async fn broadcast(&self, sender: SessionId, payload: &Payload) -> BroadcastReport {
        let sessions = self.sessions.lock().await;
        let mut report = BroadcastReport::default();

        for (id, outbound) in sessions.iter() {
            if *id == sender {
                continue;
            }
            match outbound.try_send(payload.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::trace!(session_id = %id, "outbound queue full, frame dropped");
                    report.dropped += 1;
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::trace!(session_id = %id, "outbound queue closed, frame dropped");
                    report.dropped += 1;
                }
            }
        }

        report
    }

    /// Returns `true` if `id` is currently admitted.
    pub async fn contains(&self, id: SessionId) -> bool {
        self.sessions.lock().await.contains_key(&id)
    }

    /// Returns the number of admitted sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Returns `true` if no session is admitted.
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    /// Returns the admission limit.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        MAX_PEERS
    }
}
