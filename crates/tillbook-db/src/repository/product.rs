//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - Combined search + status filter for list views
//! - Admin mutations: create, patch update, deactivate
//!
//! ## Search Filter
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How the Catalog Filter Works                         │
//! │                                                                         │
//! │  User types: "choc"                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Case-insensitive substring match on name OR category                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ products                                │                           │
//! │  │                                         │                           │
//! │  │ Dark Chocolate Bar   | Sweets  | active │ ← MATCH (name)            │
//! │  │ Cocoa Powder         | Chocolate| active│ ← MATCH (category)        │
//! │  │ Espresso Beans 1kg   | Coffee  | active │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │                                                                         │
//! │  The register picker adds active_only = true on top, so retired        │
//! │  products never show up as sale candidates.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use tillbook_core::{NewProduct, Product, ProductPatch};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Catalog view with a search box
/// let results = repo.list(Some("espresso"), false).await?;
///
/// // Register picker: active products only
/// let candidates = repo.list(None, true).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products, optionally filtered.
    ///
    /// ## Behavior
    /// - `search` matches name OR category, case-insensitive substring
    /// - empty/whitespace search is treated as "no filter"
    /// - `active_only` additionally hides deactivated products
    /// - results are ordered by name
    pub async fn list(&self, search: Option<&str>, active_only: bool) -> DbResult<Vec<Product>> {
        let needle = search.unwrap_or("").trim().to_string();

        debug!(search = %needle, active_only, "Listing products");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, category, status, created_at, updated_at
            FROM products
            WHERE (?1 = ''
                   OR lower(name) LIKE '%' || lower(?1) || '%'
                   OR lower(category) LIKE '%' || lower(?1) || '%')
              AND (?2 = 0 OR status = 'active')
            ORDER BY name COLLATE NOCASE, id
            "#,
        )
        .bind(&needle)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Product list returned");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, category, status, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product. The store assigns the id; the row starts
    /// out active.
    ///
    /// ## Arguments
    /// * `new` - Validated fields (callers run `NewProduct::validate` first)
    ///
    /// ## Returns
    /// The stored product, including its generated id and timestamps.
    pub async fn create(&self, new: &NewProduct) -> DbResult<Product> {
        debug!(name = %new.name, price_cents = new.price_cents, "Creating product");

        let now = Utc::now();

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price_cents, category, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, 'active', ?4, ?4)
            RETURNING id, name, price_cents, category, status, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(new.price_cents)
        .bind(&new.category)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = product.id, "Product created");
        Ok(product)
    }

    /// Applies a partial update. Absent patch fields keep their stored
    /// values; `updated_at` is refreshed.
    ///
    /// Callers screen out empty patches, so reaching here always writes.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The updated product
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: i64, patch: &ProductPatch) -> DbResult<Product> {
        debug!(id, "Updating product");

        let now = Utc::now();

        let updated = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = COALESCE(?2, name),
                price_cents = COALESCE(?3, price_cents),
                category = COALESCE(?4, category),
                status = COALESCE(?5, status),
                updated_at = ?6
            WHERE id = ?1
            RETURNING id, name, price_cents, category, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.price_cents)
        .bind(patch.category.as_deref())
        .bind(patch.status)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Retires a product from sale.
    ///
    /// ## Idempotence
    /// Deactivating an already-inactive product is a no-op that still
    /// returns the product; `updated_at` only moves on the first
    /// transition. History referencing the product is untouched.
    ///
    /// ## Why Soft Delete?
    /// Historical sale lines still reference this product, so rows are
    /// never removed, only flagged.
    pub async fn deactivate(&self, id: i64) -> DbResult<Product> {
        debug!(id, "Deactivating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET status = 'inactive', updated_at = ?2
            WHERE id = ?1 AND status = 'active'
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!(id, "Product already inactive or missing");
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Counts all products, active or not.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts products currently eligible for sale.
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE status = 'active'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
