//! # Sales Analytics
//!
//! Polls a remote sales API, aggregates the results into revenue metrics and
//! serves display-ready dashboard data over HTTP.
//!
//! ## Features
//!
//! - **Exact money math**: Totals and averages use `rust_decimal`
//! - **Partial failure tolerance**: A failed dataset degrades only the values derived from it
//! - **Ordered refreshes**: A slow, older refresh never overwrites a newer one
//! - **Display-ready output**: Currency strings, chart series and category cards
//!
//! ## Modules
//!
//! - [`sales`]: Records, aggregation, formatting and the dashboard view
//! - [`upstream`]: HTTP client for the sales API
//! - [`refresh`]: Refresh cycles and the background poll loop
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_analytics::refresh::{RefreshConfig, RefreshManager};
//! use sales_analytics::upstream::{SalesApiClient, UpstreamConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(SalesApiClient::new(UpstreamConfig::default())?);
//!     let manager = RefreshManager::new(client, RefreshConfig::default());
//!
//!     let report = manager.refresh().await;
//!     println!("Failed resources: {:?}", report.failed_resources());
//!
//!     if let Some(view) = manager.latest().await {
//!         println!("Total revenue: {}", view.headline.total_revenue);
//!         println!("Top category: {}", view.headline.top_category);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod logging;
pub mod refresh;
pub mod sales;
pub mod upstream;

// Re-export top-level types for convenience
pub use sales::{
    CategoryDetailView, CategorySalesRecord, DailySalesRecord, DashboardView, ProductSalesRecord,
    SalesSnapshot, Summary,
};

pub use upstream::{Resource, SalesApiClient, SalesSource, UpstreamError};

pub use refresh::{RefreshManager, RefreshReport, RefreshStatus};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig, Theme};
