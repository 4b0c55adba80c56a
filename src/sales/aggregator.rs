//! Sales Aggregator
//!
//! Pure reductions over one snapshot. None of these functions fail on empty
//! input except [`compute_top_category`], which has no sensible neutral value;
//! callers substitute a placeholder for it.

use rust_decimal::Decimal;

use super::error::{AggregateError, AggregateResult};
use super::format::format_currency;
use super::types::{
    CategoryDetailView, CategorySalesRecord, DailySalesRecord, SalesSnapshot, Summary,
};

/// Sum of `total_sales` over all days, zero for no days
///
/// Saturates at the `Decimal` bounds; [`check_daily_totals`] rejects such
/// datasets before they reach the dashboard.
pub fn compute_total_revenue(days: &[DailySalesRecord]) -> Decimal {
    days.iter()
        .fold(Decimal::ZERO, |acc, d| acc.saturating_add(d.total_sales))
}

/// Sum of `values`, `None` when the total does not fit in a `Decimal`
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
}

/// Fails when the daily totals cannot be summed
pub fn check_daily_totals(days: &[DailySalesRecord]) -> AggregateResult<()> {
    checked_sum(days.iter().map(|d| d.total_sales))
        .map(|_| ())
        .ok_or(AggregateError::Overflow("daily sales"))
}

/// Fails when the category revenues cannot be summed
pub fn check_category_totals(categories: &[CategorySalesRecord]) -> AggregateResult<()> {
    checked_sum(categories.iter().map(|c| c.total_revenue))
        .map(|_| ())
        .ok_or(AggregateError::Overflow("category revenue"))
}

/// Total revenue divided by the number of days
///
/// Returns zero when `days` is empty.
pub fn compute_average_order(days: &[DailySalesRecord]) -> Decimal {
    if days.is_empty() {
        return Decimal::ZERO;
    }

    compute_total_revenue(days) / Decimal::from(days.len())
}

/// Name of the category with the highest revenue
///
/// Ties go to the category that appears first.
pub fn compute_top_category(categories: &[CategorySalesRecord]) -> AggregateResult<String> {
    let mut best: Option<&CategorySalesRecord> = None;

    for record in categories {
        match best {
            Some(current) if record.total_revenue <= current.total_revenue => {}
            _ => best = Some(record),
        }
    }

    best.map(|record| record.category.clone())
        .ok_or(AggregateError::EmptyInput("categories"))
}

/// One formatted detail view per category, in input order
pub fn build_category_details(categories: &[CategorySalesRecord]) -> Vec<CategoryDetailView> {
    categories
        .iter()
        .map(|record| CategoryDetailView {
            category: record.category.clone(),
            total_revenue: format_currency(record.total_revenue),
            average_price: format_currency(record.average_price),
            day_with_highest_sales: record.day_with_highest_sales.clone(),
        })
        .collect()
}

impl Summary {
    /// Compute the headline metrics for a snapshot
    ///
    /// An empty category set yields `top_category: None` rather than an error.
    pub fn from_snapshot(snapshot: &SalesSnapshot) -> Self {
        Self {
            total_revenue: compute_total_revenue(&snapshot.daily),
            average_order: compute_average_order(&snapshot.daily),
            top_category: compute_top_category(&snapshot.categories).ok(),
        }
    }
}
