//! Core data types for sales analytics
//!
//! This module defines the records received from the upstream sales API
//! and the values derived from them:
//! - `DailySalesRecord`, `CategorySalesRecord`, `ProductSalesRecord`: raw rows
//! - `SalesSnapshot`: the three datasets captured by one refresh
//! - `Summary`: headline metrics recomputed on every refresh
//! - `CategoryDetailView`: display-ready category card

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Total sales for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySalesRecord {
    /// Calendar date as sent by the upstream (e.g. "2024-01-01")
    pub date: String,
    /// Sum of all sales on that day
    pub total_sales: Decimal,
}

impl DailySalesRecord {
    pub fn new(date: impl Into<String>, total_sales: Decimal) -> Self {
        Self {
            date: date.into(),
            total_sales,
        }
    }
}

/// Revenue figures for one product category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySalesRecord {
    /// Category name, unique within a snapshot
    pub category: String,
    /// Revenue across all days
    pub total_revenue: Decimal,
    /// Mean unit price of items sold in this category
    pub average_price: Decimal,
    /// Date on which this category sold the most
    pub day_with_highest_sales: String,
}

impl CategorySalesRecord {
    pub fn new(category: impl Into<String>, total_revenue: Decimal) -> Self {
        Self {
            category: category.into(),
            total_revenue,
            average_price: Decimal::ZERO,
            day_with_highest_sales: String::new(),
        }
    }

    /// Builder method: set the average price
    pub fn average_price(mut self, average_price: Decimal) -> Self {
        self.average_price = average_price;
        self
    }

    /// Builder method: set the best sales day
    pub fn best_day(mut self, day: impl Into<String>) -> Self {
        self.day_with_highest_sales = day.into();
        self
    }
}

/// Total sales for one product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSalesRecord {
    /// Product name, unique within a snapshot
    pub product: String,
    pub total_sales: Decimal,
}

impl ProductSalesRecord {
    pub fn new(product: impl Into<String>, total_sales: Decimal) -> Self {
        Self {
            product: product.into(),
            total_sales,
        }
    }
}

/// The three datasets captured by a single refresh cycle
///
/// A snapshot is never mutated after it is built. A resource that could not
/// be fetched is represented by an empty collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesSnapshot {
    /// When the fetches for this snapshot completed
    pub fetched_at: DateTime<Utc>,
    /// Per-day sales, in the order received
    pub daily: Vec<DailySalesRecord>,
    /// Per-category sales, in the order received
    pub categories: Vec<CategorySalesRecord>,
    /// Per-product sales, in the order received
    pub products: Vec<ProductSalesRecord>,
}

impl SalesSnapshot {
    /// Create a snapshot stamped with the current time
    pub fn new(
        daily: Vec<DailySalesRecord>,
        categories: Vec<CategorySalesRecord>,
        products: Vec<ProductSalesRecord>,
    ) -> Self {
        Self {
            fetched_at: Utc::now(),
            daily,
            categories,
            products,
        }
    }

    /// A snapshot with no data in any resource
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }

    /// True when none of the three resources returned any rows
    pub fn is_empty(&self) -> bool {
        self.daily.is_empty() && self.categories.is_empty() && self.products.is_empty()
    }
}

/// Headline metrics derived from a snapshot
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Summary {
    /// Sum of all daily totals
    pub total_revenue: Decimal,
    /// Total revenue divided by the number of days, zero when there are none
    pub average_order: Decimal,
    /// Category with the highest revenue, absent when there are no categories
    pub top_category: Option<String>,
}

/// A category record formatted for display
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryDetailView {
    pub category: String,
    /// Currency-formatted revenue (e.g. "$1,234.50")
    pub total_revenue: String,
    /// Currency-formatted average price
    pub average_price: String,
    pub day_with_highest_sales: String,
}
