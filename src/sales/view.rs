//! Dashboard view
//!
//! Everything a rendering layer needs to draw one refresh: the headline
//! cards, the three chart series and the category detail cards. Values are
//! kept raw (for charts) alongside formatted strings (for labels).

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::aggregator::build_category_details;
use super::format::{format_currency, format_percent};
use super::types::{CategoryDetailView, DailySalesRecord, SalesSnapshot, Summary};

/// Shown in place of the top category when there are no categories
pub const NO_DATA_PLACEHOLDER: &str = "No data";

/// Formatted headline cards
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Headline {
    pub total_revenue: String,
    pub average_order: String,
    pub top_category: String,
}

/// One slice of the category distribution chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub total_revenue: Decimal,
    /// Share of total category revenue, 0-100, one decimal place
    pub share_percent: Decimal,
    pub label: String,
}

/// One bar of the product performance chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductBar {
    pub product: String,
    pub total_sales: Decimal,
    /// Currency-formatted total, drawn on the bar
    pub label: String,
}

/// Display-ready result of one refresh cycle
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// When the underlying snapshot was fetched
    pub generated_at: DateTime<Utc>,
    pub summary: Summary,
    pub headline: Headline,
    /// Line chart series, in upstream order
    pub daily_sales: Vec<DailySalesRecord>,
    pub category_distribution: Vec<CategoryShare>,
    pub product_performance: Vec<ProductBar>,
    pub category_details: Vec<CategoryDetailView>,
}

impl DashboardView {
    /// Derive the full dashboard from a snapshot
    pub fn build(snapshot: &SalesSnapshot) -> Self {
        let summary = Summary::from_snapshot(snapshot);

        let headline = Headline {
            total_revenue: format_currency(summary.total_revenue),
            average_order: format_currency(summary.average_order),
            top_category: summary
                .top_category
                .clone()
                .unwrap_or_else(|| NO_DATA_PLACEHOLDER.to_string()),
        };

        Self {
            generated_at: snapshot.fetched_at,
            summary,
            headline,
            daily_sales: snapshot.daily.clone(),
            category_distribution: category_distribution(snapshot),
            product_performance: product_performance(snapshot),
            category_details: build_category_details(&snapshot.categories),
        }
    }
}

fn category_distribution(snapshot: &SalesSnapshot) -> Vec<CategoryShare> {
    let total = snapshot
        .categories
        .iter()
        .fold(Decimal::ZERO, |acc, c| acc.saturating_add(c.total_revenue));

    snapshot
        .categories
        .iter()
        .map(|record| {
            let share_percent = record
                .total_revenue
                .checked_div(total)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(|p| p.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
                .unwrap_or(Decimal::ZERO);

            CategoryShare {
                category: record.category.clone(),
                total_revenue: record.total_revenue,
                share_percent,
                label: format!("{} {}", record.category, format_percent(share_percent)),
            }
        })
        .collect()
}

fn product_performance(snapshot: &SalesSnapshot) -> Vec<ProductBar> {
    snapshot
        .products
        .iter()
        .map(|record| ProductBar {
            product: record.product.clone(),
            total_sales: record.total_sales,
            label: format_currency(record.total_sales),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sales::types::{CategorySalesRecord, ProductSalesRecord};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_snapshot() -> SalesSnapshot {
        SalesSnapshot::new(
            vec![
                DailySalesRecord::new("2024-01-01", dec("1000")),
                DailySalesRecord::new("2024-01-02", dec("234.5")),
            ],
            vec![
                CategorySalesRecord::new("Electronics", dec("750"))
                    .average_price(dec("250"))
                    .best_day("2024-01-01"),
                CategorySalesRecord::new("Books", dec("250"))
                    .average_price(dec("12.5"))
                    .best_day("2024-01-02"),
            ],
            vec![
                ProductSalesRecord::new("Laptop", dec("1500")),
                ProductSalesRecord::new("Novel", dec("24.99")),
            ],
        )
    }

    #[test]
    fn test_headline_is_formatted() {
        let view = DashboardView::build(&sample_snapshot());

        assert_eq!(view.headline.total_revenue, "$1,234.50");
        assert_eq!(view.headline.average_order, "$617.25");
        assert_eq!(view.headline.top_category, "Electronics");
    }

    #[test]
    fn test_empty_snapshot_uses_placeholder() {
        let view = DashboardView::build(&SalesSnapshot::empty());

        assert_eq!(view.headline.total_revenue, "$0.00");
        assert_eq!(view.headline.average_order, "$0.00");
        assert_eq!(view.headline.top_category, NO_DATA_PLACEHOLDER);
        assert!(view.daily_sales.is_empty());
        assert!(view.category_distribution.is_empty());
        assert!(view.product_performance.is_empty());
        assert!(view.category_details.is_empty());
    }

    #[test]
    fn test_missing_categories_do_not_block_daily_metrics() {
        let mut snapshot = sample_snapshot();
        snapshot.categories.clear();

        let view = DashboardView::build(&snapshot);
        assert_eq!(view.headline.total_revenue, "$1,234.50");
        assert_eq!(view.headline.top_category, NO_DATA_PLACEHOLDER);
        assert_eq!(view.product_performance.len(), 2);
    }

    #[test]
    fn test_category_distribution_shares() {
        let view = DashboardView::build(&sample_snapshot());

        let shares: Vec<_> = view
            .category_distribution
            .iter()
            .map(|s| (s.category.as_str(), s.share_percent))
            .collect();
        assert_eq!(shares, vec![("Electronics", dec("75")), ("Books", dec("25"))]);
        assert_eq!(view.category_distribution[0].label, "Electronics 75.0%");
    }

    #[test]
    fn test_category_distribution_with_zero_total() {
        let snapshot = SalesSnapshot::new(
            Vec::new(),
            vec![
                CategorySalesRecord::new("A", Decimal::ZERO),
                CategorySalesRecord::new("B", Decimal::ZERO),
            ],
            Vec::new(),
        );

        let view = DashboardView::build(&snapshot);
        assert!(view
            .category_distribution
            .iter()
            .all(|s| s.share_percent.is_zero()));
        assert_eq!(view.headline.top_category, "A");
    }

    #[test]
    fn test_share_rounds_half_away_from_zero() {
        // 42.45% exactly
        let snapshot = SalesSnapshot::new(
            Vec::new(),
            vec![
                CategorySalesRecord::new("A", dec("4245")),
                CategorySalesRecord::new("B", dec("5755")),
            ],
            Vec::new(),
        );

        let view = DashboardView::build(&snapshot);
        assert_eq!(view.category_distribution[0].share_percent, dec("42.5"));
        assert_eq!(view.category_distribution[0].label, "A 42.5%");
        assert_eq!(view.category_distribution[1].share_percent, dec("57.6"));
    }

    #[test]
    fn test_huge_amounts_do_not_panic() {
        let huge = dec("50000000000000000000000000000");
        let snapshot = SalesSnapshot::new(
            vec![
                DailySalesRecord::new("2024-01-01", huge),
                DailySalesRecord::new("2024-01-02", huge),
            ],
            vec![
                CategorySalesRecord::new("A", huge),
                CategorySalesRecord::new("B", huge),
            ],
            vec![ProductSalesRecord::new("P", huge)],
        );

        let view = DashboardView::build(&snapshot);
        assert_eq!(view.summary.total_revenue, Decimal::MAX);
        assert_eq!(view.category_distribution.len(), 2);
        assert_eq!(view.product_performance[0].label.chars().next(), Some('$'));
    }

    #[test]
    fn test_product_bars_keep_order_and_labels() {
        let view = DashboardView::build(&sample_snapshot());

        assert_eq!(view.product_performance[0].product, "Laptop");
        assert_eq!(view.product_performance[0].label, "$1,500.00");
        assert_eq!(view.product_performance[1].label, "$24.99");
    }

    #[test]
    fn test_view_serializes_amounts_as_numbers() {
        let view = DashboardView::build(&sample_snapshot());
        let json = serde_json::to_value(&view).unwrap();

        assert!(json["summary"]["total_revenue"].is_number());
        assert_eq!(json["headline"]["top_category"], "Electronics");
        assert_eq!(json["category_details"][1]["average_price"], "$12.50");
    }
}
