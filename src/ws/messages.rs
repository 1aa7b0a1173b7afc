//! Frame-level vocabulary of the relay.
//!
//! The relay never looks inside a payload. It only decides, per incoming
//! WebSocket frame, whether the frame is something to forward, something
//! to ignore, or the end of the stream.

use axum::extract::ws::Message;

use crate::domain::Payload;

/// Text sent to a connection that arrives while the room is full.
pub const ROOM_FULL_MESSAGE: &str = "room full (2 clients max)";

/// What the inbound task should do with one received frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Forward this payload to the other peer.
    Forward(Payload),
    /// Control or undecodable frame; keep reading.
    Ignore,
    /// The peer asked to close the connection.
    Close,
}

impl From<Message> for Inbound {
    fn from(message: Message) -> Self {
        match message {
            Message::Text(text) => Self::Forward(text),
            // Binary frames are relayed as text when they hold valid UTF-8.
            Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
                Ok(text) => Self::Forward(Payload::from(text)),
                Err(error) => {
                    tracing::debug!(%error, len = bytes.len(), "dropping non-utf8 binary frame");
                    Self::Ignore
                }
            },
            Message::Ping(_) | Message::Pong(_) => Self::Ignore,
            Message::Close(_) => Self::Close,
        }
    }
}
