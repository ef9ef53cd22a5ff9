//! # Register Screen
//!
//! The cashier's basket loop. Products are added by id, quantities edited
//! by line number, and `checkout` commits the basket as a taxed sale.
//!
//! Prices and names are frozen into the cart when a product is added, so
//! the totals on screen are exactly what `checkout` records even if the
//! catalog changes mid-basket. A failed checkout leaves the cart intact
//! for retry; only a successful commit clears it.

use tillbook_core::{Cart, SaleDraft};
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
    let mut cart = Cart::new(config.tax_rate());

    println!();
    println!("=== Register (tax {}) ===", cart.tax_rate());
    println!("Commands: add <product-id>, qty <line> <n>, rm <line>, show, checkout, cancel");

    loop {
        let Some(line) = shell.prompt("register> ").await? else {
            return Ok(());
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let outcome = match tokens.as_slice() {
            [] => continue,
            ["add", id] => add_product(db, &mut cart, id).await,
            ["qty", line_id, quantity] => set_quantity(&mut cart, line_id, quantity),
            ["rm", line_id] => remove_line(&mut cart, line_id),
            ["show"] => {
                render_cart(&cart, config);
                Ok(())
            }
            ["checkout"] => checkout(db, &mut cart, config, session).await,
            ["cancel"] => {
                if !cart.is_empty() {
                    println!("Cart discarded.");
                }
                return Ok(());
            }
            ["help"] => {
                println!("  add <product-id>   Add one unit (repeats merge into the line)");
                println!("  qty <line> <n>     Set a line's quantity (minimum 1)");
                println!("  rm <line>          Remove a line");
                println!("  show               Show the cart with totals");
                println!("  checkout           Record the sale and start a fresh cart");
                println!("  cancel             Discard the cart and leave the register");
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

/// Looks up a product and adds one unit. Only active products can be
/// rung up; retired ones stay visible in history but not at the till.
async fn add_product(db: &Database, cart: &mut Cart, raw_id: &str) -> Result<(), CliError> {
    let product_id: i64 = parse_number(raw_id, "Product id")?;

    let product = db
        .products()
        .get(product_id)
        .await?
        .ok_or_else(|| CliError::not_found(format!("Product {product_id} not found")))?;

    if !product.is_active() {
        return Err(CliError::validation(format!(
            "'{}' is inactive and cannot be sold at the register",
            product.name
        )));
    }

    let line_id = cart.add_line(&product)?;
    let quantity = cart
        .lines()
        .iter()
        .find(|l| l.line_id == line_id)
        .map(|l| l.quantity)
        .unwrap_or(1);
    println!("✓ {} (line {line_id}, qty {quantity})", product.name);
    Ok(())
}

fn set_quantity(cart: &mut Cart, raw_line: &str, raw_quantity: &str) -> Result<(), CliError> {
    let line_id: u32 = parse_number(raw_line, "Line number")?;
    let quantity: i64 = parse_number(raw_quantity, "Quantity")?;

    cart.set_quantity(line_id, quantity)?;

    // Echo what actually landed; requests below 1 clamp to 1.
    if let Some(line) = cart.lines().iter().find(|l| l.line_id == line_id) {
        println!("✓ Line {line_id}: qty {}", line.quantity);
    }
    Ok(())
}

fn remove_line(cart: &mut Cart, raw_line: &str) -> Result<(), CliError> {
    let line_id: u32 = parse_number(raw_line, "Line number")?;
    cart.remove_line(line_id)?;
    println!("✓ Line {line_id} removed");
    Ok(())
}

/// Commits the basket. The draft is validated first, so an empty cart is
/// rejected before any database work; on any failure the cart survives
/// unchanged.
async fn checkout(
    db: &Database,
    cart: &mut Cart,
    config: &ConsoleConfig,
    session: &Session,
) -> Result<(), CliError> {
    let draft = SaleDraft::new(cart.draft_lines(), cart.tax_rate())?;
    let sale = db.sales().record(&draft, &session.user_id).await?;

    println!("✓ Recorded sale {}", format_receipt_id(sale.id));
    println!(
        "  Subtotal {}   Tax {}   Total {}",
        config.format_cents(sale.subtotal_cents),
        config.format_cents(sale.tax_cents),
        config.format_cents(sale.total_cents)
    );
    cart.clear();
    Ok(())
}

fn render_cart(cart: &Cart, config: &ConsoleConfig) {
    if cart.is_empty() {
        println!("  (cart is empty)");
        return;
    }

    println!(
        "  {:>4}  {:<32} {:>4}  {:>10}  {:>10}",
        "Line", "Product", "Qty", "Unit", "Total"
    );
    for line in cart.lines() {
        println!(
            "  {:>4}  {:<32} {:>4}  {:>10}  {:>10}",
            line.line_id,
            clip(&line.product_name, 32),
            line.quantity,
            config.format_cents(line.unit_price_cents),
            config.format_cents(line.line_total_cents()),
        );
    }
    println!(
        "  {:>55}  {:>10}",
        "Subtotal",
        config.format_cents(cart.subtotal().cents())
    );
    println!(
        "  {:>55}  {:>10}",
        format!("Tax ({})", cart.tax_rate()),
        config.format_cents(cart.tax().cents())
    );
    println!(
        "  {:>55}  {:>10}",
        "Total",
        config.format_cents(cart.total().cents())
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::session::Role;
    use tillbook_core::NewProduct;
    use tillbook_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, name: &str, price_cents: i64) -> i64 {
        db.products()
            .create(&NewProduct {
                name: name.to_string(),
                price_cents,
                category: "Test".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_add_active_product() {
        let db = test_db().await;
        let id = seed_product(&db, "Espresso Beans 1kg", 4500).await;

        let mut cart = Cart::new(tillbook_core::TaxRate::from_bps(800));
        add_product(&db, &mut cart, &id.to_string()).await.unwrap();
        add_product(&db, &mut cart, &id.to_string()).await.unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[tokio::test]
    async fn test_add_inactive_product_rejected() {
        let db = test_db().await;
        let id = seed_product(&db, "Retired Mug", 1500).await;
        db.products().deactivate(id).await.unwrap();

        let mut cart = Cart::new(tillbook_core::TaxRate::from_bps(800));
        let err = add_product(&db, &mut cart, &id.to_string())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_add_missing_product() {
        let db = test_db().await;
        let mut cart = Cart::new(tillbook_core::TaxRate::from_bps(800));

        let err = add_product(&db, &mut cart, "999").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_checkout_records_and_clears() {
        let db = test_db().await;
        let id = seed_product(&db, "Espresso Beans 1kg", 4500).await;

        let config = ConsoleConfig::default();
        let session = Session::new("admin", Role::Admin);
        let mut cart = Cart::new(config.tax_rate());
        add_product(&db, &mut cart, &id.to_string()).await.unwrap();

        checkout(&db, &mut cart, &config, &session).await.unwrap();

        assert!(cart.is_empty());
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_fails_before_db() {
        let db = test_db().await;
        let config = ConsoleConfig::default();
        let session = Session::new("admin", Role::Admin);
        let mut cart = Cart::new(config.tax_rate());

        let err = checkout(&db, &mut cart, &config, &session)
            .await
            .unwrap_err();

        assert!(err.message.contains("no valid items"));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }
}
