//! # Domain Types
//!
//! Core domain types used throughout Tillbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SaleItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  name           │   │  subtotal_cents │   │  sale_id (FK)   │       │
//! │  │  price_cents    │   │  tax_cents      │   │  product_id     │       │
//! │  │  category       │   │  total_cents    │   │  quantity       │       │
//! │  │  status         │   │  created_by     │   │  price_at_sale  │       │
//! │  └─────────────────┘   │  items (owned)  │   │  line_total     │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    TaxRate      │   │  ProductStatus  │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  bps (u32)      │   │  Active         │                             │
//! │  │  800 = 8%       │   │  Inactive       │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Entities use store-generated integer ids (SQLite `INTEGER PRIMARY KEY`).
//! Ids are never computed client-side, so concurrent creators cannot race
//! on id assignment.
//!
//! ## Immutability
//! A `Sale` and its items are immutable once persisted. There is no edit or
//! void operation; corrections are new sales.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::validation;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000. 800 bps = 8%, exactly representable
/// as an integer, so tax math never touches floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// The no-tax policy used by log-book commits.
    pub const ZERO: TaxRate = TaxRate(0);

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::ZERO
    }
}

/// Displays as a percentage: `8%` or `8.25%`.
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

// =============================================================================
// Product Status
// =============================================================================

/// Lifecycle status of a catalog product.
///
/// "Deleting" a product is a transition to `Inactive`, never a row
/// removal: historical sale items keep a valid product reference forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Visible in sale-eligible listings.
    Active,
    /// Hidden from sale-eligible listings, still referenced by history.
    Inactive,
}

impl ProductStatus {
    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, ProductStatus::Active)
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductStatus::Active => write!(f, "active"),
            ProductStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl FromStr for ProductStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ProductStatus::Active),
            "inactive" => Ok(ProductStatus::Inactive),
            _ => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: "expected 'active' or 'inactive'".to_string(),
            }),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Store-generated identifier.
    pub id: i64,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Unit price in cents. Non-negative.
    pub price_cents: i64,

    /// Free-text category label (e.g. "Coffee", "Sweets").
    pub category: String,

    /// Active products are sale-eligible; inactive ones are history-only.
    pub status: ProductStatus,

    /// When the product was created (UTC).
    pub created_at: DateTime<Utc>,

    /// Refreshed on every in-place update. NOT refreshed by a repeated
    /// deactivation of an already-inactive product.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Current unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Fields for creating a product. Status always starts as `Active`;
/// timestamps are stamped by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub category: String,
}

impl NewProduct {
    /// Validates all fields, returning the first violation.
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_product_name(&self.name)?;
        validation::validate_price_cents(self.price_cents)?;
        validation::validate_category(&self.category)?;
        Ok(())
    }
}

/// Partial update for a product. `None` fields are left untouched;
/// `updated_at` refreshes whenever the patch is applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price_cents: Option<i64>,
    pub category: Option<String>,
    pub status: Option<ProductStatus>,
}

impl ProductPatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price_cents.is_none()
            && self.category.is_none()
            && self.status.is_none()
    }

    /// Validates the fields that are present.
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validation::validate_product_name(name)?;
        }
        if let Some(cents) = self.price_cents {
            validation::validate_price_cents(cents)?;
        }
        if let Some(category) = &self.category {
            validation::validate_category(category)?;
        }
        Ok(())
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable, committed sale with its owned, ordered line items.
///
/// ## Invariants (checked at draft construction, preserved by the store)
/// - `subtotal_cents == Σ items.line_total_cents`
/// - `total_cents == subtotal_cents + tax_cents`
/// - `tax_cents == 0` for log-book sales (no-tax policy)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    /// Store-generated identifier, assigned at persistence.
    pub id: i64,

    /// Sum of line totals, in cents.
    pub subtotal_cents: i64,

    /// Tax amount folded into the total. Zero under the no-tax policy.
    pub tax_cents: i64,

    /// Amount actually charged: subtotal + tax.
    pub total_cents: i64,

    /// Identity of the acting user, from the session context.
    pub created_by: String,

    /// Commit timestamp (UTC).
    pub created_at: DateTime<Utc>,

    /// Ordered line items, in entry order. Never empty for a committed
    /// sale; a zero-item sale is unobservable by construction.
    pub items: Vec<SaleItem>,
}

impl Sale {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Number of line items (not the quantity sum) - the "Items Count"
    /// column of the CSV export.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// A single line of a committed sale.
///
/// `price_at_sale_cents` is the unit price frozen at the moment of sale.
/// Later catalog price edits never touch it, and `line_total_cents` is
/// always `quantity × price_at_sale_cents` - never recomputed from the
/// live product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: i64,

    /// Owning sale. Items are cascade-deleted with their sale.
    pub sale_id: i64,

    /// Product reference (no ownership; products are never removed).
    pub product_id: i64,

    /// Denormalized display name, joined from the catalog at read time.
    pub product_name: Option<String>,

    pub quantity: i64,

    /// Unit price snapshot, in cents.
    pub price_at_sale_cents: i64,

    /// `quantity × price_at_sale_cents`, in cents.
    pub line_total_cents: i64,
}

impl SaleItem {
    #[inline]
    pub fn price_at_sale(&self) -> Money {
        Money::from_cents(self.price_at_sale_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_display() {
        assert_eq!(TaxRate::from_bps(800).to_string(), "8%");
        assert_eq!(TaxRate::from_bps(825).to_string(), "8.25%");
        assert_eq!(TaxRate::ZERO.to_string(), "0%");
    }

    #[test]
    fn test_product_status_round_trip() {
        assert_eq!(
            "active".parse::<ProductStatus>().unwrap(),
            ProductStatus::Active
        );
        assert_eq!(
            "INACTIVE".parse::<ProductStatus>().unwrap(),
            ProductStatus::Inactive
        );
        assert!("deleted".parse::<ProductStatus>().is_err());
        assert_eq!(ProductStatus::Active.to_string(), "active");
    }

    #[test]
    fn test_new_product_validation() {
        let good = NewProduct {
            name: "Espresso Beans 1kg".to_string(),
            price_cents: 4500,
            category: "Coffee".to_string(),
        };
        assert!(good.validate().is_ok());

        let bad = NewProduct {
            name: "".to_string(),
            price_cents: 4500,
            category: "Coffee".to_string(),
        };
        assert!(bad.validate().is_err());

        let negative = NewProduct {
            name: "Espresso Beans 1kg".to_string(),
            price_cents: -1,
            category: "Coffee".to_string(),
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ProductPatch::default().is_empty());

        let patch = ProductPatch {
            price_cents: Some(1500),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        assert!(patch.validate().is_ok());
    }
}
