//! Sales API REST Client
//!
//! HTTP client for the upstream sales analytics service.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::{Resource, SalesSource, UpstreamError};
use crate::sales::{CategorySalesRecord, DailySalesRecord, ProductSalesRecord};

/// Delay added per retry attempt
const RETRY_BACKOFF_MS: u64 = 250;

/// Sales API REST client
pub struct SalesApiClient {
    client: Client,
    config: UpstreamConfig,
}

/// Configuration for the sales API client
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the sales API (e.g., "https://sales-analytics-tz2v.onrender.com")
    pub base_url: String,
    /// Request timeout in milliseconds, applied to every fetch
    pub request_timeout_ms: u64,
    /// Attempts per fetch; only transport failures are retried
    pub max_attempts: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sales-analytics-tz2v.onrender.com".to_string(),
            request_timeout_ms: 10_000,
            max_attempts: 2,
        }
    }
}

impl SalesApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(concat!("sales-analytics/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Full URL of a resource
    pub fn resource_url(&self, resource: Resource) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            resource.path()
        )
    }

    /// GET a resource and decode its JSON body, retrying transport failures
    async fn get_json<T: DeserializeOwned>(&self, resource: Resource) -> Result<T, UpstreamError> {
        let url = self.resource_url(resource);
        let attempts = self.config.max_attempts.max(1);
        let mut last_error = UpstreamError::Unavailable;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = Duration::from_millis(RETRY_BACKOFF_MS * attempt as u64);
                tokio::time::sleep(delay).await;
            }

            match self.get_once(resource, &url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() => {
                    tracing::debug!(
                        resource = %resource,
                        attempt = attempt + 1,
                        error = %e,
                        "Sales API request failed"
                    );
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error)
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        resource: Resource,
        url: &str,
    ) -> Result<T, UpstreamError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(UpstreamError::from_transport)?;

        if response.status() != StatusCode::OK {
            return Err(UpstreamError::Status {
                resource,
                status: response.status().as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(UpstreamError::from_transport)?;

        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode {
            resource,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl SalesSource for SalesApiClient {
    async fn fetch_daily_sales(&self) -> Result<Vec<DailySalesRecord>, UpstreamError> {
        let body: DailySalesResponse = self.get_json(Resource::Daily).await?;
        Ok(body.sales)
    }

    async fn fetch_category_sales(&self) -> Result<Vec<CategorySalesRecord>, UpstreamError> {
        let body: CategorySalesResponse = self.get_json(Resource::Category).await?;
        Ok(body.categories)
    }

    async fn fetch_product_sales(&self) -> Result<Vec<ProductSalesRecord>, UpstreamError> {
        let body: ProductSalesResponse = self.get_json(Resource::Product).await?;
        Ok(body.products)
    }
}

// ============================================
// Response DTOs
// ============================================

#[derive(Debug, Deserialize)]
struct DailySalesResponse {
    sales: Vec<DailySalesRecord>,
}

#[derive(Debug, Deserialize)]
struct CategorySalesResponse {
    categories: Vec<CategorySalesRecord>,
}

#[derive(Debug, Deserialize)]
struct ProductSalesResponse {
    products: Vec<ProductSalesRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::get, Json, Router};
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Serve `router` on an ephemeral local port and return its base URL
    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> SalesApiClient {
        SalesApiClient::new(UpstreamConfig {
            base_url,
            request_timeout_ms: 2_000,
            max_attempts: 1,
        })
        .unwrap()
    }

    fn client_with_attempts(
        base_url: String,
        request_timeout_ms: u64,
        max_attempts: u32,
    ) -> SalesApiClient {
        SalesApiClient::new(UpstreamConfig {
            base_url,
            request_timeout_ms,
            max_attempts,
        })
        .unwrap()
    }

    fn sales_router() -> Router {
        Router::new()
            .route(
                "/sales/day",
                get(|| async {
                    Json(json!({"sales": [
                        {"date": "2024-01-01", "total_sales": 100.0},
                        {"date": "2024-01-02", "total_sales": 50.0}
                    ]}))
                }),
            )
            .route(
                "/sales/category",
                get(|| async {
                    Json(json!({"categories": [{
                        "category": "Electronics",
                        "total_revenue": 500.0,
                        "average_price": 250.0,
                        "day_with_highest_sales": "2024-01-01"
                    }]}))
                }),
            )
            .route(
                "/sales/product",
                get(|| async {
                    Json(json!({"products": [
                        {"product": "Laptop", "total_sales": 1200.0},
                        {"product": "Mouse", "total_sales": 25.5},
                        {"product": "Cable", "total_sales": 9.99}
                    ]}))
                }),
            )
    }

    #[test]
    fn test_default_config() {
        let config = UpstreamConfig::default();
        assert_eq!(config.base_url, "https://sales-analytics-tz2v.onrender.com");
        assert_eq!(config.request_timeout_ms, 10_000);
        assert_eq!(config.max_attempts, 2);
    }

    #[test]
    fn test_resource_url_per_resource() {
        let client = client_for("http://sales.local/".to_string());

        assert_eq!(
            client.resource_url(Resource::Daily),
            "http://sales.local/sales/day"
        );
        assert_eq!(
            client.resource_url(Resource::Category),
            "http://sales.local/sales/category"
        );
        assert_eq!(
            client.resource_url(Resource::Product),
            "http://sales.local/sales/product"
        );
    }

    #[tokio::test]
    async fn test_each_resource_is_fetched_from_its_own_path() {
        let client = client_for(spawn_upstream(sales_router()).await);

        let daily = client.fetch_daily_sales().await.unwrap();
        let categories = client.fetch_category_sales().await.unwrap();
        let products = client.fetch_product_sales().await.unwrap();

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[1].total_sales, Decimal::from(50));
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].category, "Electronics");
        assert_eq!(products.len(), 3);
        assert_eq!(products[2].product, "Cable");
    }

    #[tokio::test]
    async fn test_non_200_status_is_an_error() {
        let router = Router::new().route(
            "/sales/day",
            get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = client_for(spawn_upstream(router).await);

        let err = client.fetch_daily_sales().await.unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::Status {
                resource: Resource::Daily,
                status: 500
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_route_is_an_error() {
        let client = client_for(spawn_upstream(Router::new()).await);

        let err = client.fetch_product_sales().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let router = Router::new().route("/sales/category", get(|| async { "not json" }));
        let client = client_for(spawn_upstream(router).await);

        let err = client.fetch_category_sales().await.unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::Decode {
                resource: Resource::Category,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_list_field_is_decode_error() {
        let router = Router::new().route(
            "/sales/day",
            get(|| async { Json(json!({"days": []})) }),
        );
        let client = client_for(spawn_upstream(router).await);

        let err = client.fetch_daily_sales().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let router = Router::new().route(
            "/sales/day",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"sales": []}))
            }),
        );
        let base_url = spawn_upstream(router).await;
        let client = SalesApiClient::new(UpstreamConfig {
            base_url,
            request_timeout_ms: 100,
            max_attempts: 1,
        })
        .unwrap();

        let err = client.fetch_daily_sales().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Timeout));
    }

    #[tokio::test]
    async fn test_refused_connection_is_unavailable() {
        // Grab a free port, then close it so nothing is listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = SalesApiClient::new(UpstreamConfig {
            base_url: format!("http://{}", addr),
            request_timeout_ms: 1_000,
            max_attempts: 2,
        })
        .unwrap();

        let err = client.fetch_daily_sales().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Unavailable));
    }

    #[tokio::test]
    async fn test_error_status_is_not_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let router = Router::new().route(
            "/sales/day",
            get(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }
            }),
        );
        let client = client_with_attempts(spawn_upstream(router).await, 2_000, 3);

        let err = client.fetch_daily_sales().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 500, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_not_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let router = Router::new().route(
            "/sales/product",
            get(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { "not json" }
            }),
        );
        let client = client_with_attempts(spawn_upstream(router).await, 2_000, 3);

        let err = client.fetch_product_sales().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode { .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeouts_are_retried_up_to_max_attempts() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let router = Router::new().route(
            "/sales/day",
            get(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Json(json!({"sales": []}))
                }
            }),
        );
        let client = client_with_attempts(spawn_upstream(router).await, 100, 3);

        let err = client.fetch_daily_sales().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Timeout));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_timeout_then_success_is_recovered() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let router = Router::new().route(
            "/sales/day",
            get(move || {
                let call = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if call == 0 {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                    Json(json!({"sales": [{"date": "2024-01-01", "total_sales": 10.0}]}))
                }
            }),
        );
        let client = client_with_attempts(spawn_upstream(router).await, 200, 2);

        let daily = client.fetch_daily_sales().await.unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].total_sales, Decimal::TEN);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_base_url_fails_without_retry() {
        let client = client_with_attempts("not a url".to_string(), 1_000, 3);

        let started = std::time::Instant::now();
        let err = client.fetch_category_sales().await.unwrap_err();

        assert!(matches!(err, UpstreamError::Request(_)));
        assert!(!err.is_transient());
        // Retries would add at least 250ms + 500ms of backoff
        assert!(started.elapsed() < Duration::from_millis(250));
    }
}
