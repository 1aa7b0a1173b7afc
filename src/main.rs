//! asciichat-relay server entry point.
//!
//! Starts the Axum HTTP server with the `/ws` relay endpoint.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use asciichat_relay::app_state::AppState;
use asciichat_relay::config::{LogFormat, RelayConfig};
use asciichat_relay::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = RelayConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }

    tracing::info!(addr = %config.listen_addr, "starting asciichat-relay");

    // Start server
    let listener = server::bind(config.listen_addr).await?;
    server::serve(listener, AppState::new(), server::shutdown_signal())
        .await
        .context("relay server stopped")?;

    Ok(())
}
