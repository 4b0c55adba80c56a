//! Sales Aggregation
//!
//! Turns the three raw sales datasets into dashboard values:
//!
//! - **types**: Upstream records, snapshot, summary and detail view
//! - **aggregator**: Revenue, average order, top category, category details
//! - **format**: Currency and percentage formatting
//! - **view**: Full dashboard view built from one snapshot
//! - **error**: Error types
//!
//! # Data Flow
//!
//! ```text
//!   SalesSnapshot → Summary ─┐
//!                 → details ─┼→ DashboardView → rendering layer
//!                 → series  ─┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use sales_analytics::sales::*;
//!
//! let days = vec![
//!     DailySalesRecord::new("2024-01-01", Decimal::new(10000, 2)),
//!     DailySalesRecord::new("2024-01-02", Decimal::new(5000, 2)),
//! ];
//!
//! assert_eq!(compute_total_revenue(&days), Decimal::new(15000, 2));
//! assert_eq!(compute_average_order(&days), Decimal::new(7500, 2));
//! ```

pub mod aggregator;
pub mod error;
pub mod format;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use aggregator::{
    build_category_details, check_category_totals, check_daily_totals, checked_sum,
    compute_average_order, compute_top_category, compute_total_revenue,
};
pub use error::{AggregateError, AggregateResult};
pub use format::{format_currency, format_percent};
pub use types::{
    CategoryDetailView, CategorySalesRecord, DailySalesRecord, ProductSalesRecord, SalesSnapshot,
    Summary,
};
pub use view::{CategoryShare, DashboardView, Headline, ProductBar, NO_DATA_PLACEHOLDER};
