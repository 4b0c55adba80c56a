//! Refresh Routes
//!
//! - POST /api/v1/refresh - Run a refresh cycle now
//! - GET /api/v1/refresh/status - Get refresh status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::refresh::{RefreshReport, RefreshStatus};

/// POST /api/v1/refresh
///
/// Fetches all three datasets and rebuilds the dashboard. Upstream
/// failures are reported per resource, never as an HTTP error.
pub async fn trigger_refresh(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RefreshReport>) {
    let report = state.refresh.refresh().await;

    tracing::info!(
        sequence = report.sequence,
        duration_ms = report.duration_ms,
        complete = report.is_complete(),
        "Manual refresh completed"
    );

    (StatusCode::OK, Json(report))
}

/// GET /api/v1/refresh/status
pub async fn get_refresh_status(State(state): State<Arc<AppState>>) -> Json<RefreshStatus> {
    Json(state.refresh.status().await)
}
