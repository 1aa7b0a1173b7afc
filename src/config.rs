//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: settings come from environment variables (or a
//! `.env` file via `dotenvy`). The peer limit and queue depth are fixed
//! policy constants in [`crate::domain`], not configuration.

use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::RelayError;

/// Default bind address when `LISTEN_ADDR` is unset.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(RelayError::InvalidConfig(format!(
                "LOG_FORMAT must be `pretty` or `json`, got `{other}`"
            ))),
        }
    }
}

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// Tracing output format.
    pub log_format: LogFormat,
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file, then
    /// reads `LISTEN_ADDR` and `LOG_FORMAT`, falling back to defaults when
    /// they are unset.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidConfig`] if a variable is set but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidConfig`] on unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = raw_addr.parse().map_err(|e| {
            RelayError::InvalidConfig(format!("LISTEN_ADDR `{raw_addr}` is not a socket address: {e}"))
        })?;

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            listen_addr,
            log_format,
        })
    }
}
