//! # Sale Repository
//!
//! Database operations for sales and sale items.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Atomic Sale Recording                                 │
//! │                                                                         │
//! │  SaleDraft (validated in tillbook-core)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN TRANSACTION                                                     │
//! │       │                                                                 │
//! │       ├── INSERT sales (subtotal, tax, total, created_by) → id         │
//! │       ├── INSERT sale_items (line 1, frozen price)                     │
//! │       ├── INSERT sale_items (line 2, frozen price)                     │
//! │       └── ...                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ── all lines land, or the whole receipt vanishes               │
//! │                                                                         │
//! │  price_at_sale_cents is written from the draft, never re-read from     │
//! │  the products table, so later price edits leave history alone.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use tillbook_core::{Sale, SaleDraft, SaleItem};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

/// Header row of a sale, before items are attached.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i64,
    subtotal_cents: i64,
    tax_cents: i64,
    total_cents: i64,
    created_by: String,
    created_at: DateTime<Utc>,
}

impl SaleRow {
    fn into_sale(self, items: Vec<SaleItem>) -> Sale {
        Sale {
            id: self.id,
            subtotal_cents: self.subtotal_cents,
            tax_cents: self.tax_cents,
            total_cents: self.total_cents,
            created_by: self.created_by,
            created_at: self.created_at,
            items,
        }
    }
}

// Item columns with the display name joined in from the catalog.
// LEFT JOIN keeps lines readable even if a product row ever went missing.
const ITEM_SELECT: &str = r#"
    SELECT si.id, si.sale_id, si.product_id, p.name AS product_name,
           si.quantity, si.price_at_sale_cents, si.line_total_cents
    FROM sale_items si
    LEFT JOIN products p ON p.id = si.product_id
"#;

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Persists a validated draft as one receipt.
    ///
    /// ## Atomicity
    /// The header and every line are written inside one transaction. Any
    /// failure (for example an unknown product_id tripping the foreign
    /// key) rolls the whole receipt back.
    ///
    /// ## Arguments
    /// * `draft` - Computed totals and lines from `SaleDraft::new`
    /// * `created_by` - The signed-in user recording the sale
    ///
    /// ## Returns
    /// The stored sale with its generated id and joined product names.
    pub async fn record(&self, draft: &SaleDraft, created_by: &str) -> DbResult<Sale> {
        debug!(
            lines = draft.lines.len(),
            total_cents = draft.total_cents,
            "Recording sale"
        );

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let sale_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sales (subtotal_cents, tax_cents, total_cents, created_by, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            "#,
        )
        .bind(draft.subtotal_cents)
        .bind(draft.tax_cents)
        .bind(draft.total_cents)
        .bind(created_by)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for line in &draft.lines {
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
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(sale_id, "Sale recorded");

        self.get(sale_id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", sale_id))
    }

    /// Gets one sale with its items.
    ///
    /// ## Returns
    /// * `Ok(Some(Sale))` - Sale found, items in insertion order
    /// * `Ok(None)` - No such receipt
    pub async fn get(&self, id: i64) -> DbResult<Option<Sale>> {
        let header = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, subtotal_cents, tax_cents, total_cents, created_by, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let header = match header {
            Some(h) => h,
            None => return Ok(None),
        };

        let sql = format!("{ITEM_SELECT} WHERE si.sale_id = ?1 ORDER BY si.id");
        let items = sqlx::query_as::<_, SaleItem>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(header.into_sale(items)))
    }

    /// Lists all sales, newest first, items eagerly attached.
    ///
    /// ## Why Eager
    /// The history screen, dashboard aggregates, and CSV export all need
    /// item counts, so two queries here beat N+1 queries there.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let headers = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, subtotal_cents, tax_cents, total_cents, created_by, created_at
            FROM sales
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let sql = format!("{ITEM_SELECT} ORDER BY si.sale_id, si.id");
        let items = sqlx::query_as::<_, SaleItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let mut by_sale: HashMap<i64, Vec<SaleItem>> = HashMap::new();
        for item in items {
            by_sale.entry(item.sale_id).or_default().push(item);
        }

        let sales = headers
            .into_iter()
            .map(|h| {
                let items = by_sale.remove(&h.id).unwrap_or_default();
                h.into_sale(items)
            })
            .collect();

        debug!("Sale list assembled");
        Ok(sales)
    }

    /// Counts all recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tillbook_core::{DraftLine, NewProduct, Product, ProductPatch, SaleDraft, TaxRate};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, name: &str, price_cents: i64) -> Product {
        db.products()
            .create(&NewProduct {
                name: name.to_string(),
                price_cents,
                category: "Coffee".to_string(),
            })
            .await
            .unwrap()
    }

    fn line(product_id: i64, quantity: i64, unit_price_cents: i64) -> DraftLine {
        DraftLine {
            product_id: Some(product_id),
            quantity,
            unit_price_cents,
        }
    }

    #[tokio::test]
    async fn test_record_persists_header_and_items() {
        let db = test_db().await;
        let beans = seed_product(&db, "Espresso Beans 1kg", 4500).await;
        let syrup = seed_product(&db, "Lavender Syrup", 1800).await;

        let draft = SaleDraft::new(
            vec![line(beans.id, 2, 4500), line(syrup.id, 1, 1800)],
            TaxRate::from_bps(800),
        )
        .unwrap();

        let sale = db.sales().record(&draft, "admin").await.unwrap();

        assert!(sale.id > 0);
        assert_eq!(sale.subtotal_cents, 10800);
        assert_eq!(sale.tax_cents, 864);
        assert_eq!(sale.total_cents, 11664);
        assert_eq!(sale.created_by, "admin");
        assert_eq!(sale.items.len(), 2);
        assert_eq!(
            sale.items[0].product_name.as_deref(),
            Some("Espresso Beans 1kg")
        );
        assert_eq!(sale.items[0].quantity, 2);
        assert_eq!(sale.items[0].line_total_cents, 9000);
    }

    #[tokio::test]
    async fn test_record_rolls_back_on_unknown_product() {
        let db = test_db().await;
        let beans = seed_product(&db, "Espresso Beans 1kg", 4500).await;

        // Second line points at a product that was never created
        let draft = SaleDraft::new(
            vec![line(beans.id, 1, 4500), line(9999, 1, 100)],
            TaxRate::ZERO,
        )
        .unwrap();

        let err = db.sales().record(&draft, "admin").await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        // The header must not survive the failed line insert
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_sale() {
        let db = test_db().await;
        assert!(db.sales().get(123).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_items() {
        let db = test_db().await;
        let beans = seed_product(&db, "Espresso Beans 1kg", 4500).await;

        let first = db
            .sales()
            .record(
                &SaleDraft::new(vec![line(beans.id, 1, 4500)], TaxRate::ZERO).unwrap(),
                "admin",
            )
            .await
            .unwrap();
        let second = db
            .sales()
            .record(
                &SaleDraft::new(vec![line(beans.id, 3, 4500)], TaxRate::ZERO).unwrap(),
                "admin",
            )
            .await
            .unwrap();

        let sales = db.sales().list().await.unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].id, second.id);
        assert_eq!(sales[1].id, first.id);
        assert_eq!(sales[0].items.len(), 1);
        assert_eq!(sales[0].items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_price_edits_do_not_touch_history() {
        let db = test_db().await;
        let beans = seed_product(&db, "Espresso Beans 1kg", 4500).await;

        let draft = SaleDraft::new(vec![line(beans.id, 1, 4500)], TaxRate::ZERO).unwrap();
        let sale = db.sales().record(&draft, "admin").await.unwrap();

        // Reprice the product after the sale
        let patch = ProductPatch {
            price_cents: Some(9900),
            ..Default::default()
        };
        db.products().update(beans.id, &patch).await.unwrap();

        let reloaded = db.sales().get(sale.id).await.unwrap().unwrap();
        assert_eq!(reloaded.items[0].price_at_sale_cents, 4500);
        assert_eq!(reloaded.total_cents, 4500);
    }

    #[tokio::test]
    async fn test_deactivated_product_keeps_name_in_history() {
        let db = test_db().await;
        let mug = seed_product(&db, "Seasonal Mug", 2200).await;

        let draft = SaleDraft::new(vec![line(mug.id, 1, 2200)], TaxRate::ZERO).unwrap();
        let sale = db.sales().record(&draft, "cashier").await.unwrap();

        db.products().deactivate(mug.id).await.unwrap();

        let reloaded = db.sales().get(sale.id).await.unwrap().unwrap();
        assert_eq!(reloaded.items[0].product_name.as_deref(), Some("Seasonal Mug"));
    }
}
