//! WebSocket layer: admission, frame classification, session tasks.
//!
//! The WebSocket endpoint at `/ws` admits at most two peers and relays
//! every text frame one peer sends to the other.

pub mod handler;
pub mod messages;
pub mod session;
