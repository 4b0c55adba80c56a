//! Data Transfer Objects
//!
//! Response types for the API endpoints that are not domain types
//! themselves. Dashboard views and refresh reports are serialized as-is.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::sales::{CategoryDetailView, Headline, Summary};

/// Headline metrics of the latest refresh
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub generated_at: DateTime<Utc>,
    /// Raw values
    pub summary: Summary,
    /// Formatted values for the metric cards
    pub headline: Headline,
}

/// Category detail cards of the latest refresh
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub generated_at: DateTime<Utc>,
    pub categories: Vec<CategoryDetailView>,
}

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy", "degraded" (data present but last refresh incomplete)
    /// or "starting" (no data yet)
    pub status: String,
    pub has_data: bool,
    pub refresh_count: u64,
    pub uptime_seconds: u64,
    pub version: String,
}
