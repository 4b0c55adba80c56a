//! Dashboard Refresh
//!
//! A refresh cycle fetches the daily, category and product datasets
//! concurrently, waits for all three, then rebuilds the dashboard view.
//!
//! ## Triggers
//!
//! - Background poll loop (`RefreshManager::start_background_refresh`)
//! - `POST /api/v1/refresh`
//! - `sales-analytics-cli fetch` (one-shot, no server)

mod manager;

pub use manager::{
    RefreshConfig, RefreshManager, RefreshReport, RefreshState, RefreshStatus, ResourceOutcome,
};
