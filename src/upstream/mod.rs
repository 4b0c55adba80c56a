//! Upstream Sales API
//!
//! Fetches the three sales datasets from the remote analytics service.
//!
//! ## Resources
//!
//! | Resource | Path              | List field   |
//! |----------|-------------------|--------------|
//! | Daily    | `/sales/day`      | `sales`      |
//! | Category | `/sales/category` | `categories` |
//! | Product  | `/sales/product`  | `products`   |
//!
//! Every resource is requested from its own URL. A request only succeeds on
//! HTTP 200 with a JSON body carrying the list field; anything else is an
//! [`UpstreamError`] which the refresh layer turns into an empty dataset.

mod client;

pub use client::{SalesApiClient, UpstreamConfig};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::sales::{CategorySalesRecord, DailySalesRecord, ProductSalesRecord};

/// A source of the three sales datasets
#[async_trait]
pub trait SalesSource: Send + Sync {
    /// Per-day sales, in date order
    async fn fetch_daily_sales(&self) -> Result<Vec<DailySalesRecord>, UpstreamError>;

    /// Per-category revenue
    async fn fetch_category_sales(&self) -> Result<Vec<CategorySalesRecord>, UpstreamError>;

    /// Per-product sales
    async fn fetch_product_sales(&self) -> Result<Vec<ProductSalesRecord>, UpstreamError>;
}

/// One of the three datasets exposed by the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Daily,
    Category,
    Product,
}

impl Resource {
    /// All resources, in the order they are reported
    pub fn all() -> &'static [Resource] {
        &[Resource::Daily, Resource::Category, Resource::Product]
    }

    /// Path of this resource relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Daily => "/sales/day",
            Resource::Category => "/sales/category",
            Resource::Product => "/sales/product",
        }
    }

    /// Name of the JSON field holding the records
    pub fn list_field(&self) -> &'static str {
        match self {
            Resource::Daily => "sales",
            Resource::Category => "categories",
            Resource::Product => "products",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Daily => write!(f, "daily"),
            Resource::Category => write!(f, "category"),
            Resource::Product => write!(f, "product"),
        }
    }
}

/// Errors that can occur when fetching from the upstream API
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Upstream unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected status {status} for {resource} sales")]
    Status { resource: Resource, status: u16 },

    #[error("Malformed {resource} sales payload: {message}")]
    Decode { resource: Resource, message: String },
}

impl UpstreamError {
    /// Classify a transport-level reqwest failure
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_connect() {
            UpstreamError::Unavailable
        } else {
            UpstreamError::Request(err)
        }
    }

    /// Whether a later attempt could succeed
    ///
    /// Only connect failures and timeouts qualify. Builder, body and
    /// decoding errors would fail the same way again.
    pub fn is_transient(&self) -> bool {
        matches!(self, UpstreamError::Timeout | UpstreamError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths_are_distinct() {
        let paths: Vec<_> = Resource::all().iter().map(|r| r.path()).collect();
        assert_eq!(paths, vec!["/sales/day", "/sales/category", "/sales/product"]);
    }

    #[test]
    fn test_resource_list_fields() {
        assert_eq!(Resource::Daily.list_field(), "sales");
        assert_eq!(Resource::Category.list_field(), "categories");
        assert_eq!(Resource::Product.list_field(), "products");
    }

    #[test]
    fn test_error_display() {
        let err = UpstreamError::Status {
            resource: Resource::Category,
            status: 503,
        };
        assert_eq!(err.to_string(), "Unexpected status 503 for category sales");
        assert!(!err.is_transient());
        assert!(UpstreamError::Timeout.is_transient());
        assert!(UpstreamError::Unavailable.is_transient());

        let err = UpstreamError::Decode {
            resource: Resource::Daily,
            message: "expected value".to_string(),
        };
        assert!(!err.is_transient());
    }
}
