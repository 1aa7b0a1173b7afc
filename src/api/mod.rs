//! HTTP API layer: operational endpoints served next to the `/ws` upgrade.

pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the router with all plain HTTP endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new().merge(handlers::system::routes())
}
