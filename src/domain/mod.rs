//! Domain layer: session identity and the capacity-limited session registry.
//!
//! The registry is the only state shared between connections. It owns the
//! sending half of every admitted session's outbound queue and implements
//! the drop-on-full broadcast that relays frames between peers.

pub mod session_id;
pub mod session_registry;

pub use session_id::SessionId;
pub use session_registry::{
    BroadcastReport, MAX_PEERS, OUTBOUND_QUEUE_CAPACITY, OutboundRx, OutboundTx, Payload,
    SessionRegistry, outbound_queue,
};
