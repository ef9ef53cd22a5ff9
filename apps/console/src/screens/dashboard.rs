//! # Dashboard Screen
//!
//! One-shot overview: headline numbers, a 7-day revenue bar chart,
//! the five most recent sales, and active products by category.
//!
//! The dashboard is read-only and never fails the console: if the data
//! fetch errors, it renders the zero state with a warning line and logs
//! the underlying failure.

use chrono::{NaiveDate, Utc};
use tillbook_core::reports;
use tillbook_core::{Product, Sale};
use tillbook_db::{Database, DbResult};

use crate::config::ConsoleConfig;
use crate::error::CliError;

use super::format_receipt_id;

/// Widest bar in the 7-day chart, in characters.
const BAR_WIDTH: usize = 30;

pub async fn run(db: &Database, config: &ConsoleConfig) {
    let today = Utc::now().date_naive();

    match fetch(db).await {
        Ok((sales, products)) => render(&sales, &products, today, config),
        Err(err) => {
            tracing::error!(error = %err, "Dashboard data fetch failed");
            render(&[], &[], today, config);
            println!("⚠ Live data unavailable: {}", CliError::from(err).message);
        }
    }
}

async fn fetch(db: &Database) -> DbResult<(Vec<Sale>, Vec<Product>)> {
    let sales = db.sales().list().await?;
    let products = db.products().list(None, false).await?;
    Ok((sales, products))
}

fn render(sales: &[Sale], products: &[Product], today: NaiveDate, config: &ConsoleConfig) {
    let stats = reports::dashboard_stats(sales, products, today);

    println!();
    println!("=== Dashboard ({today}) ===");
    println!(
        "  Today's revenue   {:>12}",
        config.format_cents(stats.today_revenue_cents)
    );
    println!(
        "  Month to date     {:>12}",
        config.format_cents(stats.month_revenue_cents)
    );
    println!("  Orders recorded   {:>12}", stats.order_count);
    println!("  Active products   {:>12}", stats.active_product_count);

    println!();
    println!("  Last 7 days");
    let trend = reports::weekly_trend(sales, today);
    let max = trend.iter().map(|p| p.revenue_cents).max().unwrap_or(0);
    for point in &trend {
        println!(
            "    {}  {:<width$}  {:>10}",
            point.date.format("%a %m-%d"),
            "█".repeat(bar_width(point.revenue_cents, max)),
            config.format_cents(point.revenue_cents),
            width = BAR_WIDTH
        );
    }

    println!();
    println!("  Recent sales");
    let recent = reports::recent_sales(sales, 5);
    if recent.is_empty() {
        println!("    (none yet)");
    }
    for sale in recent {
        println!(
            "    {}  {}  {:>10}  {} item(s)",
            format_receipt_id(sale.id),
            sale.created_at.format("%Y-%m-%d %H:%M"),
            config.format_cents(sale.total_cents),
            sale.item_count()
        );
    }

    println!();
    println!("  Active products by category");
    let categories = reports::category_distribution(products);
    if categories.is_empty() {
        println!("    (no active products)");
    }
    for entry in categories {
        println!("    {:<16} {}", entry.category, entry.count);
    }
    println!();
}

/// Scales a day's revenue against the week's maximum. Any non-zero day
/// gets at least one block so small days stay visible.
fn bar_width(revenue_cents: i64, max_cents: i64) -> usize {
    if max_cents <= 0 || revenue_cents <= 0 {
        return 0;
    }
    let width = (revenue_cents as i128 * BAR_WIDTH as i128 / max_cents as i128) as usize;
    width.max(1)
}
