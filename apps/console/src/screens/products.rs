//! # Products Screen
//!
//! Catalog browsing for everyone; create, edit, and deactivate for admin
//! sessions only. Listing defaults to sale-eligible (active) products;
//! `--all` includes retired ones.
//!
//! Deactivation is the only removal: product rows are never deleted, so
//! every historical sale item keeps a resolvable product reference.

use tillbook_core::validation;
use tillbook_core::{Money, NewProduct, ProductPatch};
use tillbook_db::Database;

use crate::config::ConsoleConfig;
use crate::error::CliError;
use crate::session::Session;
use crate::shell::Shell;

use super::{clip, parse_number};

pub async fn run(
    shell: &mut Shell,
    db: &Database,
    config: &ConsoleConfig,
    session: &Session,
) -> Result<(), CliError> {
    println!();
    println!("=== Products ===");
    println!("Commands: list [query] [--all], add, edit <id>, deactivate <id>, back");

    loop {
        let Some(line) = shell.prompt("products> ").await? else {
            return Ok(());
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let outcome = match tokens.as_slice() {
            [] => continue,
            ["list", args @ ..] => list(db, config, args).await,
            ["add"] => add(shell, db, session).await,
            ["edit", id] => edit(shell, db, session, id).await,
            ["deactivate", id] => deactivate(db, session, id).await,
            ["back"] => return Ok(()),
            ["help"] => {
                println!("  list [query] [--all]  List products (name/category match, active by default)");
                println!("  add                   Create a product (admin)");
                println!("  edit <id>             Edit name, price, category, or status (admin)");
                println!("  deactivate <id>       Retire a product from sale (admin)");
                println!("  back                  Return to the main prompt");
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

/// Prints a denial and reports whether the command should stop.
fn deny_if_not_admin(session: &Session) -> bool {
    if session.can_manage_catalog() {
        return false;
    }
    println!(
        "✗ Admin role required (signed in as '{}', role {})",
        session.user_id, session.role
    );
    true
}

async fn list(db: &Database, config: &ConsoleConfig, args: &[&str]) -> Result<(), CliError> {
    let active_only = !args.contains(&"--all");
    let query = args
        .iter()
        .filter(|a| **a != "--all")
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let query = validation::validate_search_query(&query)?;
    let search = if query.is_empty() {
        None
    } else {
        Some(query.as_str())
    };

    let products = db.products().list(search, active_only).await?;
    if products.is_empty() {
        println!("  (no matching products)");
        return Ok(());
    }

    println!(
        "  {:>5}  {:<32} {:>10}  {:<16} {:<8}",
        "ID", "Name", "Price", "Category", "Status"
    );
    for product in &products {
        println!(
            "  {:>5}  {:<32} {:>10}  {:<16} {:<8}",
            product.id,
            clip(&product.name, 32),
            config.format_cents(product.price_cents),
            clip(&product.category, 16),
            product.status
        );
    }
    println!("  {} product(s)", products.len());
    Ok(())
}

/// Three-prompt create flow. Any invalid answer aborts with the specific
/// validation message; nothing is written until all fields pass.
async fn add(shell: &mut Shell, db: &Database, session: &Session) -> Result<(), CliError> {
    if deny_if_not_admin(session) {
        return Ok(());
    }

    let Some(name) = shell.prompt("Name: ").await? else {
        return Ok(());
    };
    let Some(price_raw) = shell.prompt("Price: ").await? else {
        return Ok(());
    };
    let Some(category) = shell.prompt("Category: ").await? else {
        return Ok(());
    };

    let price: Money = price_raw.parse()?;
    let new_product = NewProduct {
        name: name.trim().to_string(),
        price_cents: price.cents(),
        category: category.trim().to_string(),
    };
    new_product.validate()?;

    let product = db.products().create(&new_product).await?;
    println!(
        "✓ Created product #{} '{}' ({})",
        product.id, product.name, product.category
    );
    Ok(())
}

/// Prompt-per-field edit. A blank answer keeps the current value; the
/// collected patch is validated and applied in one update.
async fn edit(
    shell: &mut Shell,
    db: &Database,
    session: &Session,
    raw_id: &str,
) -> Result<(), CliError> {
    if deny_if_not_admin(session) {
        return Ok(());
    }

    let id: i64 = parse_number(raw_id, "Product id")?;
    let product = db
        .products()
        .get(id)
        .await?
        .ok_or_else(|| CliError::not_found(format!("Product {id} not found")))?;

    println!("Editing #{} (blank keeps the current value)", product.id);

    let Some(name) = shell.prompt(&format!("Name [{}]: ", product.name)).await? else {
        return Ok(());
    };
    let Some(price_raw) = shell
        .prompt(&format!("Price [{}]: ", product.price().to_decimal_string()))
        .await?
    else {
        return Ok(());
    };
    let Some(category) = shell
        .prompt(&format!("Category [{}]: ", product.category))
        .await?
    else {
        return Ok(());
    };
    let Some(status_raw) = shell
        .prompt(&format!("Status [{}]: ", product.status))
        .await?
    else {
        return Ok(());
    };

    let mut patch = ProductPatch::default();
    if !name.trim().is_empty() {
        patch.name = Some(name.trim().to_string());
    }
    if !price_raw.trim().is_empty() {
        let price: Money = price_raw.parse()?;
        patch.price_cents = Some(price.cents());
    }
    if !category.trim().is_empty() {
        patch.category = Some(category.trim().to_string());
    }
    if !status_raw.trim().is_empty() {
        patch.status = Some(status_raw.parse()?);
    }

    if patch.is_empty() {
        println!("Nothing to change.");
        return Ok(());
    }
    patch.validate()?;

    let updated = db.products().update(id, &patch).await?;
    println!("✓ Updated product #{} '{}'", updated.id, updated.name);
    Ok(())
}

async fn deactivate(db: &Database, session: &Session, raw_id: &str) -> Result<(), CliError> {
    if deny_if_not_admin(session) {
        return Ok(());
    }

    let id: i64 = parse_number(raw_id, "Product id")?;
    let product = db.products().deactivate(id).await?;
    println!("✓ '{}' is now {}", product.name, product.status);
    Ok(())
}
