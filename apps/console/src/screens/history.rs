//! # History Screen
//!
//! Recorded sales: list, filter, inspect a receipt, dump JSON, export CSV.
//!
//! The screen holds one active [`SaleFilter`]. Each `filter` command
//! replaces it wholesale (no merging with the previous one), `clear`
//! resets it, and `show`, `json`, and `export` all apply it to a fresh
//! read of the sales table, so results always reflect current data.

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use tillbook_core::reports::{self, SaleFilter};
use tillbook_core::{Money, Sale};
use tillbook_db::Database;

use crate::config::ConsoleConfig;
use crate::error::CliError;
use crate::shell::Shell;

use super::{clip, format_receipt_id, parse_number};

pub async fn run(
    shell: &mut Shell,
    db: &Database,
    config: &ConsoleConfig,
) -> Result<(), CliError> {
    let mut filter = SaleFilter::default();

    println!();
    println!("=== Sales History ===");
    println!("Commands: show, filter [text] [--from D] [--to D] [--min A] [--max A], clear, view <id>, json, export [path], back");

    loop {
        let Some(line) = shell.prompt("history> ").await? else {
            return Ok(());
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let outcome = match tokens.as_slice() {
            [] => continue,
            ["show"] => show(db, config, &filter).await,
            ["filter", args @ ..] => set_filter(&mut filter, args),
            ["clear"] => {
                filter = SaleFilter::default();
                println!("✓ Filter cleared");
                Ok(())
            }
            ["view", id] => view(db, config, id).await,
            ["json"] => dump_json(db, &filter).await,
            ["export", args @ ..] => export(db, &filter, args.first().copied()).await,
            ["back"] => return Ok(()),
            ["help"] => {
                println!("  show                 List sales matching the active filter");
                println!("  filter [text] [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--min 10.00] [--max 99.99]");
                println!("                       Replace the active filter (text matches id or amount)");
                println!("  clear                Drop the active filter");
                println!("  view <id>            Show one receipt in full");
                println!("  json                 Dump matching sales as JSON");
                println!("  export [path]        Write matching sales to a CSV file");
                println!("  back                 Return to the main prompt");
                Ok(())
            }
            [cmd, ..] => {
                println!("Unknown command '{cmd}'. Type 'help' for commands.");
                Ok(())
            }
        };

        if let Err(err) = outcome {
            println!("✗ {err}");
        }
    }
}

/// Top-level `export` command: all sales, no filter.
pub async fn export_all(db: &Database, path_arg: Option<&str>) -> Result<(), CliError> {
    export(db, &SaleFilter::default(), path_arg).await
}

async fn show(db: &Database, config: &ConsoleConfig, filter: &SaleFilter) -> Result<(), CliError> {
    let sales = db.sales().list().await?;
    let matched = reports::filter_sales(&sales, filter);

    if matched.is_empty() {
        println!("  (no sales match)");
        return Ok(());
    }
    for sale in &matched {
        println!(
            "  {}  {}  {:>10}  {:>2} item(s)  by {}",
            format_receipt_id(sale.id),
            sale.created_at.format("%Y-%m-%d %H:%M"),
            config.format_cents(sale.total_cents),
            sale.item_count(),
            sale.created_by
        );
    }
    println!("  {} of {} sale(s)", matched.len(), sales.len());
    Ok(())
}

/// Parses `filter` arguments into a fresh filter. Flags take dates as
/// YYYY-MM-DD and amounts as decimals; everything else joins into the
/// free-text query.
fn set_filter(filter: &mut SaleFilter, args: &[&str]) -> Result<(), CliError> {
    let mut next = SaleFilter::default();
    let mut text: Vec<&str> = Vec::new();

    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        match arg {
            "--from" => next.date_from = Some(parse_date(iter.next(), "--from")?),
            "--to" => next.date_to = Some(parse_date(iter.next(), "--to")?),
            "--min" => next.min_cents = Some(parse_amount(iter.next(), "--min")?),
            "--max" => next.max_cents = Some(parse_amount(iter.next(), "--max")?),
            other => text.push(other),
        }
    }
    if !text.is_empty() {
        next.query = Some(text.join(" "));
    }

    if next.is_empty() {
        println!("Filter unchanged. Give text or --from/--to/--min/--max; 'clear' resets.");
        return Ok(());
    }

    *filter = next;
    describe_filter(filter);
    Ok(())
}

fn parse_date(raw: Option<&str>, flag: &str) -> Result<NaiveDate, CliError> {
    let raw = raw.ok_or_else(|| CliError::validation(format!("{flag} needs a date")))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CliError::validation(format!("{flag}: dates use YYYY-MM-DD")))
}

fn parse_amount(raw: Option<&str>, flag: &str) -> Result<i64, CliError> {
    let raw = raw.ok_or_else(|| CliError::validation(format!("{flag} needs an amount")))?;
    let amount: Money = raw.parse()?;
    Ok(amount.cents())
}

fn describe_filter(filter: &SaleFilter) {
    let mut parts: Vec<String> = Vec::new();
    if let Some(query) = &filter.query {
        parts.push(format!("text~'{query}'"));
    }
    if let Some(date) = filter.date_from {
        parts.push(format!("from {date}"));
    }
    if let Some(date) = filter.date_to {
        parts.push(format!("to {date}"));
    }
    if let Some(cents) = filter.min_cents {
        parts.push(format!("min {}", Money::from_cents(cents)));
    }
    if let Some(cents) = filter.max_cents {
        parts.push(format!("max {}", Money::from_cents(cents)));
    }
    println!("  Filter: {}", parts.join(", "));
}

async fn view(db: &Database, config: &ConsoleConfig, raw_id: &str) -> Result<(), CliError> {
    let id: i64 = parse_number(raw_id, "Receipt id")?;
    let sale = db
        .sales()
        .get(id)
        .await?
        .ok_or_else(|| CliError::not_found(format!("Sale {id} not found")))?;
    render_receipt(&sale, config);
    Ok(())
}

fn render_receipt(sale: &Sale, config: &ConsoleConfig) {
    println!();
    println!("  Receipt {}", format_receipt_id(sale.id));
    println!(
        "  {}  by {}",
        sale.created_at.format("%Y-%m-%d %H:%M:%S"),
        sale.created_by
    );
    println!("  {}", "-".repeat(54));
    for item in &sale.items {
        let name = item
            .product_name
            .clone()
            .unwrap_or_else(|| format!("(product #{})", item.product_id));
        println!(
            "  {:<28} {:>3} x {:>8}  {:>9}",
            clip(&name, 28),
            item.quantity,
            config.format_cents(item.price_at_sale_cents),
            config.format_cents(item.line_total_cents)
        );
    }
    println!("  {}", "-".repeat(54));
    println!(
        "  {:>43}  {:>9}",
        "Subtotal",
        config.format_cents(sale.subtotal_cents)
    );
    println!("  {:>43}  {:>9}", "Tax", config.format_cents(sale.tax_cents));
    println!(
        "  {:>43}  {:>9}",
        "Total",
        config.format_cents(sale.total_cents)
    );
    println!();
}

async fn dump_json(db: &Database, filter: &SaleFilter) -> Result<(), CliError> {
    let sales = db.sales().list().await?;
    let matched = reports::filter_sales(&sales, filter);

    let json = serde_json::to_string_pretty(&matched)
        .map_err(|e| CliError::internal(format!("JSON encoding failed: {e}")))?;
    println!("{json}");
    Ok(())
}

async fn export(
    db: &Database,
    filter: &SaleFilter,
    path_arg: Option<&str>,
) -> Result<(), CliError> {
    let sales = db.sales().list().await?;
    let matched = reports::filter_sales(&sales, filter);

    let path = match path_arg {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(reports::export_filename(Utc::now().date_naive())),
    };

    let count = matched.len();
    let csv = reports::export_csv(matched);
    std::fs::write(&path, csv)?;

    println!("✓ Wrote {count} sale(s) to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::session::{Role, Session};
    use tillbook_core::{NewProduct, SaleDraft, TaxRate};
    use tillbook_db::DbConfig;

    #[test]
    fn test_set_filter_parses_all_criteria() {
        let mut filter = SaleFilter::default();
        set_filter(
            &mut filter,
            &["110.70", "--from", "2026-08-01", "--to", "2026-08-21", "--min", "10", "--max", "200.50"],
        )
        .unwrap();

        assert_eq!(filter.query.as_deref(), Some("110.70"));
        assert_eq!(
            filter.date_from,
            NaiveDate::from_ymd_opt(2026, 8, 1)
        );
        assert_eq!(filter.date_to, NaiveDate::from_ymd_opt(2026, 8, 21));
        assert_eq!(filter.min_cents, Some(1000));
        assert_eq!(filter.max_cents, Some(20050));
    }

    #[test]
    fn test_set_filter_replaces_not_merges() {
        let mut filter = SaleFilter::default();
        set_filter(&mut filter, &["--min", "10"]).unwrap();
        set_filter(&mut filter, &["--max", "50"]).unwrap();

        assert_eq!(filter.min_cents, None);
        assert_eq!(filter.max_cents, Some(5000));
    }

    #[test]
    fn test_set_filter_rejects_bad_date() {
        let mut filter = SaleFilter::default();
        let err = set_filter(&mut filter, &["--from", "21/08/2026"]).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("YYYY-MM-DD"));
        // Active filter untouched on error
        assert!(filter.is_empty());
    }

    #[test]
    fn test_set_filter_with_no_args_keeps_filter() {
        let mut filter = SaleFilter::default();
        set_filter(&mut filter, &["--min", "10"]).unwrap();
        set_filter(&mut filter, &[]).unwrap();

        assert_eq!(filter.min_cents, Some(1000));
    }

    async fn db_with_one_sale() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .create(&NewProduct {
                name: "Espresso Beans 1kg".to_string(),
                price_cents: 4500,
                category: "Coffee".to_string(),
            })
            .await
            .unwrap();

        let mut cart = tillbook_core::Cart::new(TaxRate::from_bps(800));
        cart.add_line(&product).unwrap();
        let draft = SaleDraft::new(cart.draft_lines(), cart.tax_rate()).unwrap();
        let session = Session::new("admin", Role::Admin);
        db.sales().record(&draft, &session.user_id).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_view_missing_sale() {
        let db = db_with_one_sale().await;
        let config = ConsoleConfig::default();

        let err = view(&db, &config, "999").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_export_writes_csv_file() {
        let db = db_with_one_sale().await;

        let path = std::env::temp_dir().join(format!(
            "tillbook_export_test_{}.csv",
            std::process::id()
        ));
        let path_str = path.to_string_lossy().to_string();

        export(&db, &SaleFilter::default(), Some(&path_str))
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let mut lines = written.lines();
        assert_eq!(lines.next(), Some(reports::CSV_HEADER));
        let row = lines.next().unwrap();
        // 4500 + 8% tax (360) = 4860
        assert!(row.ends_with(",48.60,1"), "unexpected row: {row}");
    }

    #[tokio::test]
    async fn test_export_respects_filter() {
        let db = db_with_one_sale().await;

        let path = std::env::temp_dir().join(format!(
            "tillbook_export_filtered_{}.csv",
            std::process::id()
        ));
        let path_str = path.to_string_lossy().to_string();

        // No sale reaches 100.00, so only the header is written
        let filter = SaleFilter {
            min_cents: Some(10_000),
            ..Default::default()
        };
        export(&db, &filter, Some(&path_str)).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(written.trim_end(), reports::CSV_HEADER);
    }
}
