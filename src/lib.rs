//! # asciichat-relay
//!
//! Two-peer WebSocket relay for streaming rendered terminal frames.
//!
//! Two clients connect to `/ws`; every text frame one of them sends is
//! forwarded, untouched, to the other. A third client is turned away with
//! a "room full" notice. Each peer has a bounded outbound queue of 16
//! frames, and a frame that arrives while that queue is full is dropped
//! rather than delaying the sender.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket /ws, HTTP /health)
//!     │
//!     ├── WS Handler (ws/handler)   admission: add or reject
//!     ├── Session (ws/session)      inbound task + outbound task
//!     │
//!     └── SessionRegistry (domain/) add / remove / broadcast (drop-on-full)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod ws;
