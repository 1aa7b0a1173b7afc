//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::SessionRegistry;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Registry of admitted peer sessions.
    pub registry: Arc<SessionRegistry>,
}

impl AppState {
    /// Creates state around a fresh, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
