//! Refresh Manager
//!
//! Runs refresh cycles against a [`SalesSource`] and keeps the latest
//! dashboard view. Failed resources are replaced by empty datasets so one
//! broken endpoint never blocks the metrics derived from the others.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::sales::{
    check_category_totals, check_daily_totals, AggregateResult, DashboardView, SalesSnapshot,
};
use crate::upstream::{Resource, SalesSource, UpstreamError};

/// Manages refresh cycles and the latest dashboard view
pub struct RefreshManager {
    source: Arc<dyn SalesSource>,
    config: RefreshConfig,
    state: Arc<RwLock<RefreshState>>,
    next_sequence: AtomicU64,
}

/// Configuration for the poll loop
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Whether the background poll loop runs
    pub enabled: bool,
    /// Seconds between scheduled refreshes
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 60,
        }
    }
}

/// Current state of the refresh manager
#[derive(Debug, Clone, Default)]
pub struct RefreshState {
    /// Most recently stored dashboard view
    pub latest: Option<Arc<DashboardView>>,
    /// Sequence number of the refresh that produced `latest`
    pub latest_sequence: u64,
    /// Report of the refresh that produced `latest`
    pub last_report: Option<RefreshReport>,
    /// Number of completed refresh cycles, including superseded ones
    pub refresh_count: u64,
}

/// Outcome of fetching one resource during a refresh
#[derive(Debug, Clone, Serialize)]
pub struct ResourceOutcome {
    pub resource: Resource,
    pub success: bool,
    /// Records received; zero when the fetch failed
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one refresh cycle
#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    /// Order in which this refresh was started
    pub sequence: u64,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub resources: Vec<ResourceOutcome>,
    /// False when a later-started refresh had already stored its result
    pub applied: bool,
}

impl RefreshReport {
    /// True when every resource was fetched successfully
    pub fn is_complete(&self) -> bool {
        self.resources.iter().all(|r| r.success)
    }

    /// Resources whose fetch failed
    pub fn failed_resources(&self) -> Vec<Resource> {
        self.resources
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.resource)
            .collect()
    }
}

/// Refresh status as reported to clients
#[derive(Debug, Clone, Serialize)]
pub struct RefreshStatus {
    pub enabled: bool,
    pub interval_secs: u64,
    pub refresh_count: u64,
    pub has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_refresh: Option<RefreshReport>,
}

impl RefreshManager {
    /// Create a new refresh manager
    pub fn new(source: Arc<dyn SalesSource>, config: RefreshConfig) -> Self {
        Self {
            source,
            config,
            state: Arc::new(RwLock::new(RefreshState::default())),
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Check if the background poll loop is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Run one refresh cycle
    ///
    /// Fetches the three resources concurrently, aggregates once all have
    /// settled and stores the resulting view unless a later-started refresh
    /// already stored one.
    pub async fn refresh(&self) -> RefreshReport {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let started_at = Utc::now();
        let start = Instant::now();

        let (daily, categories, products) = tokio::join!(
            self.source.fetch_daily_sales(),
            self.source.fetch_category_sales(),
            self.source.fetch_product_sales(),
        );

        let mut resources = Vec::with_capacity(Resource::all().len());
        let daily = reject_overflow(Resource::Daily, daily, check_daily_totals);
        let categories = reject_overflow(Resource::Category, categories, check_category_totals);

        let daily = settle(Resource::Daily, daily, &mut resources);
        let categories = settle(Resource::Category, categories, &mut resources);
        let products = settle(Resource::Product, products, &mut resources);

        let snapshot = SalesSnapshot::new(daily, categories, products);
        let view = Arc::new(DashboardView::build(&snapshot));

        let mut report = RefreshReport {
            sequence,
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            resources,
            applied: false,
        };

        {
            let mut state = self.state.write().await;
            state.refresh_count += 1;

            if sequence > state.latest_sequence {
                report.applied = true;
                state.latest = Some(view);
                state.latest_sequence = sequence;
                state.last_report = Some(report.clone());
            } else {
                tracing::debug!(
                    sequence,
                    latest_sequence = state.latest_sequence,
                    "Discarding superseded refresh"
                );
            }
        }

        if report.is_complete() {
            tracing::info!(
                sequence,
                duration_ms = report.duration_ms,
                "Dashboard refreshed"
            );
        } else {
            tracing::warn!(
                sequence,
                duration_ms = report.duration_ms,
                failed = ?report.failed_resources(),
                "Dashboard refreshed with missing data"
            );
        }

        report
    }

    /// The most recently stored dashboard view
    pub async fn latest(&self) -> Option<Arc<DashboardView>> {
        self.state.read().await.latest.clone()
    }

    /// Get the current refresh status
    pub async fn status(&self) -> RefreshStatus {
        let state = self.state.read().await;

        RefreshStatus {
            enabled: self.config.enabled,
            interval_secs: self.config.interval_secs,
            refresh_count: state.refresh_count,
            has_data: state.latest.is_some(),
            last_refresh: state.last_report.clone(),
        }
    }

    /// Start the background poll loop
    ///
    /// Refreshes immediately, then every `interval_secs`. Returns `None` when
    /// polling is disabled.
    pub fn start_background_refresh(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            tracing::info!("Background refresh disabled");
            return None;
        }

        tracing::info!(
            interval_secs = self.config.interval_secs,
            "Starting background refresh"
        );

        let handle = tokio::spawn(async move {
            let period = std::time::Duration::from_secs(self.config.interval_secs.max(1));
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                tracing::debug!("Running scheduled refresh");
                self.refresh().await;
            }
        });

        Some(handle)
    }
}

/// Treat a dataset whose totals cannot be summed as a failed fetch
fn reject_overflow<T>(
    resource: Resource,
    result: Result<Vec<T>, UpstreamError>,
    check: fn(&[T]) -> AggregateResult<()>,
) -> Result<Vec<T>, UpstreamError> {
    let records = result?;
    check(&records).map_err(|e| UpstreamError::Decode {
        resource,
        message: e.to_string(),
    })?;
    Ok(records)
}

/// Turn a fetch result into a dataset, recording the outcome
///
/// A failed fetch becomes an empty dataset.
fn settle<T>(
    resource: Resource,
    result: Result<Vec<T>, UpstreamError>,
    outcomes: &mut Vec<ResourceOutcome>,
) -> Vec<T> {
    match result {
        Ok(records) => {
            outcomes.push(ResourceOutcome {
                resource,
                success: true,
                records: records.len(),
                error: None,
            });
            records
        }
        Err(e) => {
            tracing::warn!(resource = %resource, error = %e, "Fetch failed, using empty dataset");
            outcomes.push(ResourceOutcome {
                resource,
                success: false,
                records: 0,
                error: Some(e.to_string()),
            });
            Vec::new()
        }
    }
}
