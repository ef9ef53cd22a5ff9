//! # Cart and Log Book
//!
//! The two draft builders: the register `Cart` (interactive basket) and
//! the manual `LogBook` (multi-row entry form). Both accumulate a working
//! order in memory, both feed the same commit path in [`crate::draft`].
//!
//! ## Two Entry Paths, Two Tax Policies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Register (cashier)                 Log Book (after-the-fact entry)     │
//! │  ──────────────────                 ────────────────────────────────    │
//! │  add_line(product)  +1 or merge     rows with optional product binding  │
//! │  set_quantity  clamps to ≥ 1        set_quantity clamps to ≥ 0          │
//! │  remove_line   deletes              remove_row keeps ≥ 1 editable row   │
//! │  tax = subtotal × configured rate   tax = none, total = subtotal        │
//! │            │                                     │                      │
//! │            └────────────► draft_lines() ◄────────┘                      │
//! │                                │                                        │
//! │                                ▼                                        │
//! │                    SaleDraft::new(lines, rate)                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices are frozen at selection time: a line keeps the unit price the
//! product had when it was added, even if the catalog changes before
//! commit. The commit path snapshots that same price into the sale.

use serde::{Deserialize, Serialize};

use crate::draft::DraftLine;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, TaxRate};
use crate::{MAX_DRAFT_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Register Cart
// =============================================================================

/// A line in the register cart.
///
/// `unit_price_cents` and `product_name` are frozen copies taken when the
/// product was added, so the cart display stays consistent even if the
/// catalog row is edited mid-basket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Stable line id within this cart, used to address edits.
    pub line_id: u32,

    /// Catalog product reference.
    pub product_id: i64,

    /// Name at time of adding (frozen).
    pub product_name: String,

    /// Price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity, always >= 1.
    pub quantity: i64,
}

impl CartLine {
    /// The line total: unit price × quantity, exact in cents.
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

/// The register basket.
///
/// ## Invariants
/// - Lines are unique by `product_id`; adding the same product again
///   increments its quantity by one
/// - Every quantity is >= 1; `set_quantity` clamps attempts to go lower
/// - At most MAX_DRAFT_LINES distinct lines, MAX_LINE_QUANTITY per line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    next_line_id: u32,
    tax_rate: TaxRate,
}

impl Cart {
    /// Creates an empty cart with the register's tax policy.
    pub fn new(tax_rate: TaxRate) -> Self {
        Cart {
            lines: Vec::new(),
            next_line_id: 1,
            tax_rate,
        }
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Product already in the cart: its quantity increments by 1
    /// - Otherwise: a new line is appended at quantity 1, with the unit
    ///   price copied from the product's *current* price
    pub fn add_line(&mut self, product: &Product) -> CoreResult<u32> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            if line.quantity + 1 > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: line.quantity + 1,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity += 1;
            return Ok(line.line_id);
        }

        if self.lines.len() >= MAX_DRAFT_LINES {
            return Err(CoreError::DraftTooLarge {
                max: MAX_DRAFT_LINES,
            });
        }

        let line_id = self.next_line_id;
        self.next_line_id += 1;
        self.lines.push(CartLine {
            line_id,
            product_id: product.id,
            product_name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity: 1,
        });
        Ok(line_id)
    }

    /// Sets a line's quantity, clamping to a minimum of 1.
    ///
    /// Quantities never fall below 1 through this operation; taking a
    /// line out of the basket is `remove_line`, an explicit separate act.
    pub fn set_quantity(&mut self, line_id: u32, quantity: i64) -> CoreResult<()> {
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.line_id == line_id)
            .ok_or(CoreError::LineNotFound { line_id })?;

        line.quantity = quantity.max(1);
        Ok(())
    }

    /// Removes a line.
    pub fn remove_line(&mut self, line_id: u32) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.line_id != line_id);

        if self.lines.len() == initial_len {
            Err(CoreError::LineNotFound { line_id })
        } else {
            Ok(())
        }
    }

    /// Clears the basket (sale finished or cancelled).
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Σ(unit price × quantity) over all lines.
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.lines.iter().map(|l| l.line_total_cents()).sum())
    }

    /// Tax on the subtotal at the register rate.
    pub fn tax(&self) -> Money {
        self.subtotal().calculate_tax(self.tax_rate)
    }

    /// Grand total: subtotal + tax.
    pub fn total(&self) -> Money {
        self.subtotal() + self.tax()
    }

    /// Commit input for [`crate::draft::SaleDraft::new`].
    pub fn draft_lines(&self) -> Vec<DraftLine> {
        self.lines
            .iter()
            .map(|l| DraftLine {
                product_id: Some(l.product_id),
                quantity: l.quantity,
                unit_price_cents: l.unit_price_cents,
            })
            .collect()
    }
}

// =============================================================================
// Log Book
// =============================================================================

/// A row in the manual log book.
///
/// Unlike a cart line, a row may be incomplete: no product selected yet,
/// or quantity edited down to 0. Incomplete rows are dropped silently at
/// commit; they are a normal part of form editing, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRow {
    /// Stable row id within this book.
    pub row_id: u32,

    /// Selected product, if any.
    pub product_id: Option<i64>,

    /// Name of the selected product (frozen at selection).
    pub product_name: Option<String>,

    /// Price in cents of the selected product (frozen at selection);
    /// 0 while no product is bound.
    pub unit_price_cents: i64,

    /// Quantity, >= 0. Zero-quantity rows are dropped at commit.
    pub quantity: i64,
}

impl LogRow {
    fn empty(row_id: u32) -> Self {
        LogRow {
            row_id,
            product_id: None,
            product_name: None,
            unit_price_cents: 0,
            quantity: 1,
        }
    }

    /// A row is complete when it has a product and a positive quantity.
    pub fn is_complete(&self) -> bool {
        self.product_id.is_some() && self.quantity > 0
    }

    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

/// The manual multi-row entry form.
///
/// ## Invariant
/// The book always holds at least one row, so the form stays usable:
/// removing the last row replaces it with a fresh empty one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogBook {
    rows: Vec<LogRow>,
    next_row_id: u32,
}

impl LogBook {
    /// Creates a book with a single empty row.
    pub fn new() -> Self {
        LogBook {
            rows: vec![LogRow::empty(1)],
            next_row_id: 2,
        }
    }

    /// Appends an empty row and returns its id.
    pub fn add_row(&mut self) -> CoreResult<u32> {
        if self.rows.len() >= MAX_DRAFT_LINES {
            return Err(CoreError::DraftTooLarge {
                max: MAX_DRAFT_LINES,
            });
        }

        let row_id = self.next_row_id;
        self.next_row_id += 1;
        self.rows.push(LogRow::empty(row_id));
        Ok(row_id)
    }

    /// Binds a product to a row, freezing its current name and price.
    ///
    /// Re-binding a different product overwrites the frozen values.
    pub fn set_product(&mut self, row_id: u32, product: &Product) -> CoreResult<()> {
        let row = self.row_mut(row_id)?;
        row.product_id = Some(product.id);
        row.product_name = Some(product.name.clone());
        row.unit_price_cents = product.price_cents;
        Ok(())
    }

    /// Sets a row's quantity, clamping to a minimum of 0.
    ///
    /// Zero is allowed here (the row simply won't commit); the register
    /// cart's floor of 1 does not apply to form editing.
    pub fn set_quantity(&mut self, row_id: u32, quantity: i64) -> CoreResult<()> {
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        let row = self.row_mut(row_id)?;
        row.quantity = quantity.max(0);
        Ok(())
    }

    /// Removes a row. If it was the last one, a fresh empty row takes its
    /// place so the book never becomes rowless.
    pub fn remove_row(&mut self, row_id: u32) -> CoreResult<()> {
        let initial_len = self.rows.len();
        self.rows.retain(|r| r.row_id != row_id);

        if self.rows.len() == initial_len {
            return Err(CoreError::LineNotFound { line_id: row_id });
        }

        if self.rows.is_empty() {
            let row_id = self.next_row_id;
            self.next_row_id += 1;
            self.rows.push(LogRow::empty(row_id));
        }
        Ok(())
    }

    /// Resets to a single empty row (after a successful save).
    pub fn reset(&mut self) {
        let row_id = self.next_row_id;
        self.next_row_id += 1;
        self.rows = vec![LogRow::empty(row_id)];
    }

    pub fn rows(&self) -> &[LogRow] {
        &self.rows
    }

    /// Count of rows that would actually commit.
    pub fn complete_row_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_complete()).count()
    }

    /// Σ(unit price × quantity); incomplete rows contribute zero.
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.rows.iter().map(|r| r.line_total_cents()).sum())
    }

    /// Log-book entries carry no tax: the total is the subtotal.
    pub fn total(&self) -> Money {
        self.subtotal()
    }

    /// Commit input for [`crate::draft::SaleDraft::new`]. Incomplete rows
    /// are passed through; the draft constructor drops them.
    pub fn draft_lines(&self) -> Vec<DraftLine> {
        self.rows
            .iter()
            .map(|r| DraftLine {
                product_id: r.product_id,
                quantity: r.quantity,
                unit_price_cents: r.unit_price_cents,
            })
            .collect()
    }

    fn row_mut(&mut self, row_id: u32) -> CoreResult<&mut LogRow> {
        self.rows
            .iter_mut()
            .find(|r| r.row_id == row_id)
            .ok_or(CoreError::LineNotFound { line_id: row_id })
    }
}

impl Default for LogBook {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductStatus;
    use chrono::Utc;

    fn test_product(id: i64, price_cents: i64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            price_cents,
            category: "Test".to_string(),
            status: ProductStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_line_new_product() {
        let mut cart = Cart::new(TaxRate::from_bps(800));
        cart.add_line(&test_product(1, 4500)).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
        assert_eq!(cart.subtotal().cents(), 4500);
    }

    #[test]
    fn test_add_same_product_increments_by_one() {
        let mut cart = Cart::new(TaxRate::from_bps(800));
        let product = test_product(1, 4500);

        cart.add_line(&product).unwrap();
        cart.add_line(&product).unwrap();

        assert_eq!(cart.line_count(), 1); // merged, not appended
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_register_scenario_totals() {
        // Product A $45.00 × 2 plus Product B $12.50 × 1 at 8%:
        // subtotal $102.50, tax $8.20, total $110.70
        let mut cart = Cart::new(TaxRate::from_bps(800));
        let a = test_product(1, 4500);
        let b = test_product(2, 1250);

        cart.add_line(&a).unwrap();
        cart.add_line(&a).unwrap();
        cart.add_line(&b).unwrap();

        assert_eq!(cart.subtotal().cents(), 10250);
        assert_eq!(cart.tax().cents(), 820);
        assert_eq!(cart.total().cents(), 11070);
    }

    #[test]
    fn test_set_quantity_clamps_to_one() {
        let mut cart = Cart::new(TaxRate::from_bps(800));
        let line_id = cart.add_line(&test_product(1, 4500)).unwrap();

        cart.set_quantity(line_id, 0).unwrap();
        assert_eq!(cart.lines()[0].quantity, 1);

        cart.set_quantity(line_id, -5).unwrap();
        assert_eq!(cart.lines()[0].quantity, 1);

        cart.set_quantity(line_id, 7).unwrap();
        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn test_set_quantity_rejects_over_max() {
        let mut cart = Cart::new(TaxRate::from_bps(800));
        let line_id = cart.add_line(&test_product(1, 4500)).unwrap();

        let err = cart.set_quantity(line_id, MAX_LINE_QUANTITY + 1);
        assert!(matches!(err, Err(CoreError::QuantityTooLarge { .. })));
        // Draft state preserved on error
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_remove_line() {
        let mut cart = Cart::new(TaxRate::from_bps(800));
        let line_id = cart.add_line(&test_product(1, 4500)).unwrap();

        cart.remove_line(line_id).unwrap();
        assert!(cart.is_empty());

        assert!(matches!(
            cart.remove_line(line_id),
            Err(CoreError::LineNotFound { .. })
        ));
    }

    #[test]
    fn test_price_frozen_at_add_time() {
        let mut cart = Cart::new(TaxRate::from_bps(800));
        let mut product = test_product(1, 1000);

        cart.add_line(&product).unwrap();
        product.price_cents = 1500; // catalog edit after adding

        assert_eq!(cart.lines()[0].unit_price_cents, 1000);
        assert_eq!(cart.subtotal().cents(), 1000);
    }

    #[test]
    fn test_logbook_starts_with_one_empty_row() {
        let book = LogBook::new();
        assert_eq!(book.rows().len(), 1);
        assert!(!book.rows()[0].is_complete());
        assert_eq!(book.subtotal().cents(), 0);
    }

    #[test]
    fn test_logbook_no_tax_policy() {
        let mut book = LogBook::new();
        let row_id = book.rows()[0].row_id;
        book.set_product(row_id, &test_product(1, 4500)).unwrap();
        book.set_quantity(row_id, 2).unwrap();

        assert_eq!(book.subtotal().cents(), 9000);
        assert_eq!(book.total().cents(), 9000); // no tax added
    }

    #[test]
    fn test_logbook_remove_last_row_keeps_form_usable() {
        let mut book = LogBook::new();
        let first = book.rows()[0].row_id;

        book.remove_row(first).unwrap();

        // Still one (fresh, empty) row
        assert_eq!(book.rows().len(), 1);
        assert_ne!(book.rows()[0].row_id, first);
        assert!(!book.rows()[0].is_complete());
    }

    #[test]
    fn test_logbook_remove_one_of_many() {
        let mut book = LogBook::new();
        let first = book.rows()[0].row_id;
        let second = book.add_row().unwrap();

        book.remove_row(first).unwrap();
        assert_eq!(book.rows().len(), 1);
        assert_eq!(book.rows()[0].row_id, second);
    }

    #[test]
    fn test_logbook_quantity_clamps_to_zero() {
        let mut book = LogBook::new();
        let row_id = book.rows()[0].row_id;

        book.set_quantity(row_id, -3).unwrap();
        assert_eq!(book.rows()[0].quantity, 0);
    }

    #[test]
    fn test_logbook_incomplete_rows_contribute_nothing() {
        let mut book = LogBook::new();
        let first = book.rows()[0].row_id;
        book.set_product(first, &test_product(1, 1250)).unwrap();
        book.set_quantity(first, 1).unwrap();

        let second = book.add_row().unwrap(); // never bound to a product
        book.set_quantity(second, 5).unwrap();

        assert_eq!(book.complete_row_count(), 1);
        assert_eq!(book.subtotal().cents(), 1250);
    }

    #[test]
    fn test_logbook_reset() {
        let mut book = LogBook::new();
        let row_id = book.rows()[0].row_id;
        book.set_product(row_id, &test_product(1, 1250)).unwrap();
        book.add_row().unwrap();

        book.reset();
        assert_eq!(book.rows().len(), 1);
        assert!(!book.rows()[0].is_complete());
    }
}
