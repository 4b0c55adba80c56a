//! Sales Analytics API Server
//!
//! Run with: cargo run --bin sales-analytics
//!
//! # Configuration
//!
//! Loaded from `SALES_CONFIG`, `~/.config/sales-analytics/config.toml`,
//! `/etc/sales-analytics/config.toml` or `./config.toml`, then overridden by:
//! - `SALES_UPSTREAM_URL`: Sales API base URL
//! - `SALES_UPSTREAM_TIMEOUT_MS`: Per-request timeout (default: 10000)
//! - `SALES_REFRESH_INTERVAL_SECS`: Poll interval (default: 60)
//! - `SALES_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `SALES_API_PORT`: Port to listen on (default: 8050)
//! - `SALES_LOG_LEVEL`: Log level (default: info)
//! - `SALES_LOG_FORMAT`: `pretty` or `json` (default: pretty)
//! - `RUST_LOG`: Full filter directive, wins over `SALES_LOG_LEVEL`

use anyhow::Context;
use sales_analytics::api::{serve, AppState};
use sales_analytics::config::Config;
use sales_analytics::logging::init_logging;
use sales_analytics::refresh::RefreshManager;
use sales_analytics::upstream::SalesApiClient;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging is not up yet; errors here reach stderr through anyhow
    let config = Config::load_default().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    init_logging(&config.logging).context("failed to initialize logging")?;

    tracing::info!("Starting Sales Analytics v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Upstream: {}", config.upstream.base_url);

    let client = SalesApiClient::new(config.upstream_client_config())
        .context("failed to build upstream HTTP client")?;

    let refresh = Arc::new(RefreshManager::new(
        Arc::new(client),
        config.poll_config(),
    ));

    // First tick fires immediately
    let poll_handle = Arc::clone(&refresh).start_background_refresh();
    if poll_handle.is_none() {
        tracing::info!("Use POST /api/v1/refresh to load dashboard data");
    }

    let api_config = config.server_config();
    let state = AppState::with_theme(Arc::clone(&refresh), api_config.clone(), config.theme);

    serve(state, &api_config)
        .await
        .context("API server failed")?;

    if let Some(handle) = poll_handle {
        handle.abort();
    }

    tracing::info!("Sales Analytics stopped");
    Ok(())
}
