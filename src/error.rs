//! Relay error types.
//!
//! [`RelayError`] covers the failures that can stop the relay process:
//! configuration and listener errors. Per-connection transport failures
//! are disconnects, handled inside the session tasks, and never become a
//! `RelayError`.
//!
//! # Error Code Ranges
//!
//! | Range     | Category      |
//! |-----------|---------------|
//! | 1000–1999 | Configuration |
//! | 3000–3999 | Server        |

/// Process-level error enum.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// An environment variable was set to an unusable value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: std::net::SocketAddr,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidConfig(_) => 1001,
            Self::Bind { .. } => 3001,
            Self::Serve(_) => 3002,
        }
    }
}
