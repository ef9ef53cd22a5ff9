//! # Log Book Screen
//!
//! After-the-fact entry of sales from the paper log. The form starts with
//! one empty row and always keeps at least one row on screen; rows without
//! a product (or with quantity 0) are dropped silently when saving.
//!
//! Log-book commits carry no tax: the recorded total equals the subtotal.
//! Inactive products may be referenced here, since a paper entry can
//! predate a product's retirement.

use tillbook_core::{LogBook, SaleDraft, TaxRate};
use tillbook_db::Database;

use crate::config::ConsoleConfig;
use crate::error::CliError;
use crate::session::Session;
use crate::shell::Shell;

use super::{clip, format_receipt_id, parse_number};

pub async fn run(
    shell: &mut Shell,
    db: &Database,
    config: &ConsoleConfig,
    session: &Session,
) -> Result<(), CliError> {
    let mut book = LogBook::new();

    println!();
    println!("=== Log Book (no tax) ===");
    println!("Commands: row, set <row> <product-id> <qty>, qty <row> <n>, rm <row>, show, save, cancel");

    loop {
        let Some(line) = shell.prompt("logbook> ").await? else {
            return Ok(());
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let outcome = match tokens.as_slice() {
            [] => continue,
            ["row"] => add_row(&mut book),
            ["set", row, product_id, quantity] => {
                bind_row(db, &mut book, row, product_id, quantity).await
            }
            ["qty", row, quantity] => set_quantity(&mut book, row, quantity),
            ["rm", row] => remove_row(&mut book, row),
            ["show"] => {
                render_book(&book, config);
                Ok(())
            }
            ["save"] => save(db, &mut book, config, session).await,
            ["cancel"] => return Ok(()),
            ["help"] => {
                println!("  row                          Append an empty row");
                println!("  set <row> <product-id> <qty> Bind a product and quantity to a row");
                println!("  qty <row> <n>                Change a row's quantity (0 skips it)");
                println!("  rm <row>                     Remove a row (the form keeps one)");
                println!("  show                         Show the form with totals");
                println!("  save                         Record complete rows as a sale");
                println!("  cancel                       Discard the form and leave");
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

fn add_row(book: &mut LogBook) -> Result<(), CliError> {
    let row_id = book.add_row()?;
    println!("✓ Row {row_id} added");
    Ok(())
}

/// Binds a product and quantity in one step. The quantity is applied
/// first so a rejected value leaves the row unbound.
async fn bind_row(
    db: &Database,
    book: &mut LogBook,
    raw_row: &str,
    raw_product_id: &str,
    raw_quantity: &str,
) -> Result<(), CliError> {
    let row_id: u32 = parse_number(raw_row, "Row number")?;
    let product_id: i64 = parse_number(raw_product_id, "Product id")?;
    let quantity: i64 = parse_number(raw_quantity, "Quantity")?;

    let product = db
        .products()
        .get(product_id)
        .await?
        .ok_or_else(|| CliError::not_found(format!("Product {product_id} not found")))?;

    book.set_quantity(row_id, quantity)?;
    book.set_product(row_id, &product)?;

    if !product.is_active() {
        println!("⚠ '{}' is inactive; logging it anyway", product.name);
    }
    if let Some(row) = book.rows().iter().find(|r| r.row_id == row_id) {
        println!("✓ Row {row_id}: {} x{}", product.name, row.quantity);
    }
    Ok(())
}

fn set_quantity(book: &mut LogBook, raw_row: &str, raw_quantity: &str) -> Result<(), CliError> {
    let row_id: u32 = parse_number(raw_row, "Row number")?;
    let quantity: i64 = parse_number(raw_quantity, "Quantity")?;

    book.set_quantity(row_id, quantity)?;

    if let Some(row) = book.rows().iter().find(|r| r.row_id == row_id) {
        if row.quantity == 0 {
            println!("✓ Row {row_id}: qty 0 (will be skipped on save)");
        } else {
            println!("✓ Row {row_id}: qty {}", row.quantity);
        }
    }
    Ok(())
}

fn remove_row(book: &mut LogBook, raw_row: &str) -> Result<(), CliError> {
    let row_id: u32 = parse_number(raw_row, "Row number")?;
    book.remove_row(row_id)?;
    println!("✓ Row {row_id} removed");
    Ok(())
}

/// Records the complete rows as one untaxed sale, then resets the form.
/// Incomplete rows are dropped by the draft; a form with none is refused
/// with the draft's "no valid items" error and kept on screen.
async fn save(
    db: &Database,
    book: &mut LogBook,
    config: &ConsoleConfig,
    session: &Session,
) -> Result<(), CliError> {
    let draft = SaleDraft::new(book.draft_lines(), TaxRate::ZERO)?;
    let sale = db.sales().record(&draft, &session.user_id).await?;

    println!(
        "✓ Recorded log entry {} for {}",
        format_receipt_id(sale.id),
        config.format_cents(sale.total_cents)
    );
    let dropped = book.rows().len() - sale.item_count();
    if dropped > 0 {
        println!("  ({dropped} incomplete row(s) skipped)");
    }
    book.reset();
    Ok(())
}

fn render_book(book: &LogBook, config: &ConsoleConfig) {
    println!(
        "  {:>4}  {:<32} {:>4}  {:>10}  {:>10}",
        "Row", "Product", "Qty", "Unit", "Total"
    );
    for row in book.rows() {
        let name = row.product_name.as_deref().unwrap_or("(no product)");
        let (unit, total) = if row.product_id.is_some() {
            (
                config.format_cents(row.unit_price_cents),
                config.format_cents(row.line_total_cents()),
            )
        } else {
            ("-".to_string(), "-".to_string())
        };
        println!(
            "  {:>4}  {:<32} {:>4}  {:>10}  {:>10}",
            row.row_id,
            clip(name, 32),
            row.quantity,
            unit,
            total
        );
    }
    println!(
        "  {:>55}  {:>10}",
        "Total (no tax)",
        config.format_cents(book.total().cents())
    );
}
