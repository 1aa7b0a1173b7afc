//! Listener setup and top-level router wiring.
//!
//! The binary and the integration tests both go through [`app`] and
//! [`serve`], so they exercise the same routes and layers.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::error::RelayError;
use crate::ws::handler::ws_handler;

/// Builds the full application: `/health`, `/ws`, and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the listening socket.
///
/// # Errors
///
/// Returns [`RelayError::Bind`] if the address cannot be bound. This is the
/// only fatal runtime failure of the relay.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, RelayError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| RelayError::Bind { addr, source })
}

/// Serves the relay on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns [`RelayError::Serve`] if the server loop fails.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), RelayError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "relay listening");
    }

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
