//! # Reports Module
//!
//! The read side: dashboard aggregates, filtered history views, and the
//! CSV export, all as pure functions over already-fetched sale history.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Aggregation Engine                                  │
//! │                                                                         │
//! │  SaleRepository::list() ──► Vec<Sale> ──┬──► dashboard_stats()          │
//! │                                         ├──► weekly_trend()             │
//! │                                         ├──► recent_sales()             │
//! │                                         ├──► filter_sales(SaleFilter)   │
//! │                                         └──► export_csv()               │
//! │                                                                         │
//! │  ProductRepository::list() ─► Vec<Product> ─► category_distribution()   │
//! │                                                                         │
//! │  No clock reads in here: "today" is always passed in, so every          │
//! │  aggregate is reproducible in a test.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Day Boundary
//! All bucketing uses the UTC calendar day of `created_at`. Sales are
//! stored with UTC timestamps, so `created_at.date_naive()` is the UTC
//! date.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{Product, Sale};

// =============================================================================
// Dashboard Statistics
// =============================================================================

/// The dashboard's headline numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Revenue (total_cents) for sales on the given day.
    pub today_revenue_cents: i64,
    /// Revenue for sales in the given day's calendar month.
    pub month_revenue_cents: i64,
    /// Count of all persisted sales, no date filter.
    pub order_count: i64,
    /// Products currently sale-eligible.
    pub active_product_count: i64,
}

/// Computes the headline numbers for `today`.
pub fn dashboard_stats(sales: &[Sale], products: &[Product], today: NaiveDate) -> DashboardStats {
    let today_revenue_cents = sales
        .iter()
        .filter(|s| s.created_at.date_naive() == today)
        .map(|s| s.total_cents)
        .sum();

    let month_revenue_cents = sales
        .iter()
        .filter(|s| {
            let d = s.created_at.date_naive();
            d.year() == today.year() && d.month() == today.month()
        })
        .map(|s| s.total_cents)
        .sum();

    DashboardStats {
        today_revenue_cents,
        month_revenue_cents,
        order_count: sales.len() as i64,
        active_product_count: products.iter().filter(|p| p.is_active()).count() as i64,
    }
}

// =============================================================================
// Weekly Trend
// =============================================================================

/// One day's bucket in the trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub revenue_cents: i64,
}

/// Revenue per day for the 7-day window ending on `today`.
///
/// Always exactly 7 buckets, chronological, zero-filled for days with no
/// sales. The last bucket is `today` itself.
pub fn weekly_trend(sales: &[Sale], today: NaiveDate) -> Vec<TrendPoint> {
    (0..7)
        .map(|i| {
            let date = today - Duration::days(6 - i);
            let revenue_cents = sales
                .iter()
                .filter(|s| s.created_at.date_naive() == date)
                .map(|s| s.total_cents)
                .sum();
            TrendPoint {
                date,
                revenue_cents,
            }
        })
        .collect()
}

// =============================================================================
// Recent Sales and Categories
// =============================================================================

/// The most recent `limit` sales, newest first.
pub fn recent_sales(sales: &[Sale], limit: usize) -> Vec<&Sale> {
    let mut ordered: Vec<&Sale> = sales.iter().collect();
    ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    ordered.truncate(limit);
    ordered
}

/// A category's share of the active catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Product counts per category over the active catalog, largest first
/// (ties broken alphabetically).
pub fn category_distribution(products: &[Product]) -> Vec<CategoryCount> {
    let mut counts: std::collections::BTreeMap<&str, i64> = std::collections::BTreeMap::new();
    for product in products.iter().filter(|p| p.is_active()) {
        *counts.entry(product.category.as_str()).or_insert(0) += 1;
    }

    let mut result: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));
    result
}

// =============================================================================
// Filtered History
// =============================================================================

/// Ad-hoc history filter. All present criteria AND together; an entirely
/// empty filter matches every sale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleFilter {
    /// Free text, matched against the sale id digits and the canonical
    /// 2-decimal amount string ("110.70").
    pub query: Option<String>,
    /// Inclusive lower bound, compared by UTC calendar day.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound, compared by UTC calendar day.
    pub date_to: Option<NaiveDate>,
    /// Inclusive lower bound on total_cents.
    pub min_cents: Option<i64>,
    /// Inclusive upper bound on total_cents.
    pub max_cents: Option<i64>,
}

impl SaleFilter {
    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.query.as_deref().map_or(true, |q| q.trim().is_empty())
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.min_cents.is_none()
            && self.max_cents.is_none()
    }

    /// Whether one sale passes every present criterion.
    pub fn matches(&self, sale: &Sale) -> bool {
        if let Some(query) = self.query.as_deref() {
            let query = query.trim();
            if !query.is_empty() {
                let id_text = sale.id.to_string();
                let amount_text = sale.total().to_decimal_string();
                if !id_text.contains(query) && !amount_text.contains(query) {
                    return false;
                }
            }
        }

        let day = sale.created_at.date_naive();
        if let Some(from) = self.date_from {
            if day < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if day > to {
                return false;
            }
        }

        if let Some(min) = self.min_cents {
            if sale.total_cents < min {
                return false;
            }
        }
        if let Some(max) = self.max_cents {
            if sale.total_cents > max {
                return false;
            }
        }

        true
    }
}

/// Applies a filter, preserving input order.
pub fn filter_sales<'a>(sales: &'a [Sale], filter: &SaleFilter) -> Vec<&'a Sale> {
    sales.iter().filter(|s| filter.matches(s)).collect()
}

// =============================================================================
// CSV Export
// =============================================================================

/// Header row of the export, fixed shape.
pub const CSV_HEADER: &str = "Receipt ID,Date,Total Amount,Items Count";

/// Renders sales as delimited text: the fixed header, then one row per
/// sale with id, UTC timestamp, decimal amount, and line-item count.
///
/// ## Example Output
/// ```text
/// Receipt ID,Date,Total Amount,Items Count
/// 42,2026-08-21 14:03:09,110.70,2
/// 43,2026-08-22 09:12:44,30.00,1
/// ```
pub fn export_csv<'a, I>(sales: I) -> String
where
    I: IntoIterator<Item = &'a Sale>,
{
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for sale in sales {
        let row = [
            sale.id.to_string(),
            sale.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            sale.total().to_decimal_string(),
            sale.item_count().to_string(),
        ];
        let escaped: Vec<String> = row.iter().map(|f| csv_field(f)).collect();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }

    out
}

/// Quotes a field if it contains the delimiter, a quote, or a newline;
/// inner quotes are doubled per RFC 4180.
pub fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

/// Suggested filename for an export made on `today`.
pub fn export_filename(today: NaiveDate) -> String {
    format!("sales_report_{}.csv", today.format("%Y-%m-%d"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProductStatus, SaleItem};
    use chrono::{NaiveDate, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_sale(id: i64, total_cents: i64, date: NaiveDate) -> Sale {
        let created_at = date.and_hms_opt(12, 30, 0).unwrap().and_utc();
        Sale {
            id,
            subtotal_cents: total_cents,
            tax_cents: 0,
            total_cents,
            created_by: "admin".to_string(),
            created_at,
            items: vec![SaleItem {
                id,
                sale_id: id,
                product_id: 1,
                product_name: Some("Espresso Beans 1kg".to_string()),
                quantity: 1,
                price_at_sale_cents: total_cents,
                line_total_cents: total_cents,
            }],
        }
    }

    fn test_product(id: i64, category: &str, status: ProductStatus) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            price_cents: 1000,
            category: category.to_string(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_dashboard_stats() {
        let today = day(2026, 8, 25);
        let sales = vec![
            test_sale(1, 1000, today),
            test_sale(2, 2000, today),
            test_sale(3, 4000, day(2026, 8, 1)),  // this month, not today
            test_sale(4, 8000, day(2026, 7, 31)), // last month
        ];
        let products = vec![
            test_product(1, "Coffee", ProductStatus::Active),
            test_product(2, "Coffee", ProductStatus::Inactive),
            test_product(3, "Sweets", ProductStatus::Active),
        ];

        let stats = dashboard_stats(&sales, &products, today);
        assert_eq!(stats.today_revenue_cents, 3000);
        assert_eq!(stats.month_revenue_cents, 7000);
        assert_eq!(stats.order_count, 4);
        assert_eq!(stats.active_product_count, 2);
    }

    #[test]
    fn test_month_boundary_excludes_prior_month() {
        let today = day(2026, 3, 1);
        let sales = vec![
            test_sale(1, 500, day(2026, 2, 28)),
            test_sale(2, 700, today),
        ];
        let stats = dashboard_stats(&sales, &[], today);
        assert_eq!(stats.month_revenue_cents, 700);
    }

    #[test]
    fn test_weekly_trend_shape() {
        let today = day(2026, 8, 25);
        let sales = vec![
            test_sale(1, 1000, today),
            test_sale(2, 2000, today - Duration::days(3)),
            test_sale(3, 4000, today - Duration::days(6)),
            test_sale(4, 9999, today - Duration::days(7)), // outside the window
        ];

        let trend = weekly_trend(&sales, today);

        // Exactly 7 buckets, chronological, ending today
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, today - Duration::days(6));
        assert_eq!(trend[6].date, today);
        for pair in trend.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }

        // Zero-filled and summing to the in-window total
        assert_eq!(trend[0].revenue_cents, 4000);
        assert_eq!(trend[3].revenue_cents, 2000);
        assert_eq!(trend[6].revenue_cents, 1000);
        assert_eq!(trend[1].revenue_cents, 0);
        let window_total: i64 = trend.iter().map(|p| p.revenue_cents).sum();
        assert_eq!(window_total, 7000);
    }

    #[test]
    fn test_recent_sales_newest_first() {
        let today = day(2026, 8, 25);
        let sales = vec![
            test_sale(1, 100, today - Duration::days(2)),
            test_sale(2, 200, today),
            test_sale(3, 300, today - Duration::days(1)),
        ];

        let recent = recent_sales(&sales, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, 2);
        assert_eq!(recent[1].id, 3);
    }

    #[test]
    fn test_category_distribution_active_only() {
        let products = vec![
            test_product(1, "Coffee", ProductStatus::Active),
            test_product(2, "Coffee", ProductStatus::Active),
            test_product(3, "Sweets", ProductStatus::Active),
            test_product(4, "Sweets", ProductStatus::Inactive),
            test_product(5, "Beverages", ProductStatus::Active),
        ];

        let dist = category_distribution(&products);
        assert_eq!(dist.len(), 3);
        assert_eq!(dist[0].category, "Coffee");
        assert_eq!(dist[0].count, 2);
        // Ties break alphabetically
        assert_eq!(dist[1].category, "Beverages");
        assert_eq!(dist[2].category, "Sweets");
    }

    #[test]
    fn test_amount_range_filter() {
        // min 50.00 / max 100.00 over [30, 75, 120] keeps only the 75 sale
        let today = day(2026, 8, 25);
        let sales = vec![
            test_sale(1, 3000, today),
            test_sale(2, 7500, today),
            test_sale(3, 12000, today),
        ];

        let filter = SaleFilter {
            min_cents: Some(5000),
            max_cents: Some(10000),
            ..Default::default()
        };
        let hits = filter_sales(&sales, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }

    #[test]
    fn test_amount_bounds_are_inclusive() {
        let today = day(2026, 8, 25);
        let sales = vec![test_sale(1, 5000, today), test_sale(2, 10000, today)];

        let filter = SaleFilter {
            min_cents: Some(5000),
            max_cents: Some(10000),
            ..Default::default()
        };
        assert_eq!(filter_sales(&sales, &filter).len(), 2);
    }

    #[test]
    fn test_date_range_filter_by_calendar_day() {
        let sales = vec![
            test_sale(1, 100, day(2026, 8, 10)),
            test_sale(2, 200, day(2026, 8, 15)),
            test_sale(3, 300, day(2026, 8, 20)),
        ];

        let filter = SaleFilter {
            date_from: Some(day(2026, 8, 10)),
            date_to: Some(day(2026, 8, 15)),
            ..Default::default()
        };
        let hits = filter_sales(&sales, &filter);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, 1); // inclusive lower bound
        assert_eq!(hits[1].id, 2); // inclusive upper bound
    }

    #[test]
    fn test_free_text_matches_id_and_amount() {
        let today = day(2026, 8, 25);
        let sales = vec![test_sale(42, 11070, today), test_sale(7, 3000, today)];

        let by_id = SaleFilter {
            query: Some("42".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_sales(&sales, &by_id).len(), 1);
        assert_eq!(filter_sales(&sales, &by_id)[0].id, 42);

        let by_amount = SaleFilter {
            query: Some("110.7".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_sales(&sales, &by_amount)[0].id, 42);

        let no_match = SaleFilter {
            query: Some("999".to_string()),
            ..Default::default()
        };
        assert!(filter_sales(&sales, &no_match).is_empty());
    }

    #[test]
    fn test_filters_and_together() {
        let sales = vec![
            test_sale(1, 7500, day(2026, 8, 10)),
            test_sale(2, 7500, day(2026, 8, 20)),
        ];

        let filter = SaleFilter {
            query: Some("75.00".to_string()),
            date_from: Some(day(2026, 8, 15)),
            min_cents: Some(5000),
            ..Default::default()
        };
        let hits = filter_sales(&sales, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let sales = vec![test_sale(1, 100, day(2026, 8, 25))];
        let filter = SaleFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter_sales(&sales, &filter).len(), 1);
    }

    #[test]
    fn test_export_csv_shape() {
        let sales = vec![test_sale(42, 11070, day(2026, 8, 21))];
        let csv = export_csv(&sales);

        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Receipt ID,Date,Total Amount,Items Count"
        );
        assert_eq!(lines.next().unwrap(), "42,2026-08-21 12:30:00,110.70,1");
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_field_escaping() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("with,comma"), "\"with,comma\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename(day(2026, 8, 25)),
            "sales_report_2026-08-25.csv"
        );
    }
}
