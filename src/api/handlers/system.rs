//! System endpoints: health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process is serving.
    pub status: String,
    /// RFC 3339 timestamp of the response.
    pub timestamp: String,
    /// Crate version.
    pub version: String,
    /// Sessions currently admitted.
    pub peers: usize,
    /// Admission limit.
    pub capacity: usize,
}

/// `GET /health` — Service health status and room occupancy.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let peers = state.registry.len().await;
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            peers,
            capacity: state.registry.capacity(),
        }),
    )
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
