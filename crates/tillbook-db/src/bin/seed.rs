//! # Seed Data Generator
//!
//! Populates the database with a demo catalog and sale history for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed the demo catalog plus 40 sales over the past two weeks
//! cargo run -p tillbook-db --bin seed
//!
//! # Custom sale count
//! cargo run -p tillbook-db --bin seed -- --sales 120
//!
//! # Specify database path
//! cargo run -p tillbook-db --bin seed -- --db ./data/tillbook.db
//! ```
//!
//! ## Generated Data
//! - A fixed coffee-bar catalog across five categories
//! - Deterministic sales spread over the past 14 days, so the dashboard
//!   trend and month totals have something to show
//! - Roughly one in three sales is a zero-tax log-book entry

use chrono::{Duration, Utc};
use std::env;
use tillbook_core::{DraftLine, NewProduct, Product, SaleDraft, TaxRate};
use tillbook_db::{Database, DbConfig};

/// Demo catalog: (name, price_cents, category)
const CATALOG: &[(&str, i64, &str)] = &[
    ("Espresso Beans 1kg", 4500, "Coffee"),
    ("House Blend 500g", 3200, "Coffee"),
    ("Single Origin Pour-Over", 2800, "Coffee"),
    ("Cold Brew Concentrate", 2400, "Coffee"),
    ("Dark Chocolate Bar", 1250, "Sweets"),
    ("Almond Biscotti", 650, "Sweets"),
    ("Hazelnut Praline Box", 2100, "Sweets"),
    ("Lavender Syrup", 1800, "Syrups"),
    ("Vanilla Bean Syrup", 1700, "Syrups"),
    ("Caramel Syrup", 1600, "Syrups"),
    ("Earl Grey Loose Leaf", 2200, "Tea"),
    ("Chamomile Sachets", 1400, "Tea"),
    ("Ceramic Pour-Over Mug", 2600, "Merch"),
    ("Tillbook Tote Bag", 1900, "Merch"),
    ("Reusable Cold Cup", 1500, "Merch"),
];

/// Register tax rate used for the non-log-book portion of demo sales.
const REGISTER_TAX_BPS: u32 = 800;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut sale_count: usize = 40;
    let mut db_path = String::from("./tillbook.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sale_count = args[i + 1].parse().unwrap_or(40);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tillbook Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --sales <N>    Number of demo sales to generate (default: 40)");
                println!("  -d, --db <PATH>    Database file path (default: ./tillbook.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Tillbook Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!("Sales:    {}", sale_count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Seed the catalog
    println!();
    println!("Seeding catalog...");

    let mut products: Vec<Product> = Vec::with_capacity(CATALOG.len());
    for (name, price_cents, category) in CATALOG {
        let product = db
            .products()
            .create(&NewProduct {
                name: name.to_string(),
                price_cents: *price_cents,
                category: category.to_string(),
            })
            .await?;
        products.push(product);
    }

    println!("✓ Seeded {} products", products.len());

    // Generate backdated sales
    println!();
    println!("Generating sales...");

    let mut generated = 0;
    for i in 0..sale_count {
        let sale = generate_sale(&products, i)?;

        // Backdated timestamps bypass SaleRepository::record (which
        // stamps now()), so insert through the pool directly.
        let days_back = (i % 14) as i64;
        let minutes = ((i * 37) % 600) as i64;
        let created_at = Utc::now() - Duration::days(days_back) - Duration::minutes(minutes);
        let created_by = if i % 2 == 0 { "admin" } else { "cashier" };

        let sale_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sales (subtotal_cents, tax_cents, total_cents, created_by, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            "#,
        )
        .bind(sale.subtotal_cents)
        .bind(sale.tax_cents)
        .bind(sale.total_cents)
        .bind(created_by)
        .bind(created_at)
        .fetch_one(db.pool())
        .await?;

        for line in &sale.lines {
            sqlx::query(
                r#"
                INSERT INTO sale_items (sale_id, product_id, quantity, price_at_sale_cents, line_total_cents)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(sale_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.price_at_sale_cents)
            .bind(line.line_total_cents)
            .execute(db.pool())
            .await?;
        }

        generated += 1;
        if generated % 25 == 0 {
            println!("  Generated {} sales...", generated);
        }
    }

    println!("✓ Generated {} sales", generated);

    // Quick sanity read-back
    println!();
    println!("Verifying...");
    let total_sales = db.sales().count().await?;
    let active = db.products().count_active().await?;
    println!("  Products (active): {}", active);
    println!("  Sales recorded:    {}", total_sales);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one deterministic demo draft.
///
/// Index arithmetic stands in for randomness so repeated seeds produce
/// identical data.
fn generate_sale(products: &[Product], seed: usize) -> Result<SaleDraft, tillbook_core::ValidationError> {
    let line_count = 1 + seed % 3;

    let lines: Vec<DraftLine> = (0..line_count)
        .map(|l| {
            let product = &products[(seed * 7 + l * 3) % products.len()];
            DraftLine {
                product_id: Some(product.id),
                quantity: (1 + (seed + l) % 3) as i64,
                unit_price_cents: product.price_cents,
            }
        })
        .collect();

    // Every third sale is an after-the-fact log-book entry (no tax)
    let tax_rate = if seed % 3 == 0 {
        TaxRate::ZERO
    } else {
        TaxRate::from_bps(REGISTER_TAX_BPS)
    };

    SaleDraft::new(lines, tax_rate)
}
