//! # Sale Draft
//!
//! The pure half of the sale recorder: turns builder output into a
//! validated, fully computed draft that the store persists verbatim.
//!
//! ## Commit Pipeline
//! ```text
//! Cart / LogBook
//!       │ draft_lines()
//!       ▼
//! Vec<DraftLine>              lines may be incomplete (no product, qty 0)
//!       │
//!       ▼
//! SaleDraft::new(lines, tax_rate)
//!       │  1. drop incomplete lines silently
//!       │  2. all dropped? → ValidationError ("no valid items")
//!       │  3. snapshot price_at_sale = unit_price  (never re-fetched)
//!       │  4. line_total = price_at_sale × quantity
//!       │  5. subtotal = Σ line_total, tax = subtotal × rate,
//!       │     total = subtotal + tax
//!       ▼
//! SaleDraft ──► SaleRepository::record() ──► committed Sale
//! ```
//!
//! The price snapshot rule is the heart of the system: the committed
//! price is the one the caller saw at selection time. Catalog edits made
//! after a product landed in a draft never leak into that draft's sale.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::TaxRate;

/// Raw commit input from a builder. `product_id` is `None` for log-book
/// rows that never got a product selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftLine {
    pub product_id: Option<i64>,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl DraftLine {
    /// Valid lines have a resolved product and a positive quantity.
    /// Everything else is silently dropped at draft construction.
    pub fn is_valid(&self) -> bool {
        self.product_id.is_some() && self.quantity > 0
    }
}

/// A validated, computed line ready for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: i64,
    pub quantity: i64,
    /// Unit price frozen at selection time.
    pub price_at_sale_cents: i64,
    /// quantity × price_at_sale_cents.
    pub line_total_cents: i64,
}

/// A finalized draft: what the sale recorder persists, minus the
/// store-generated id and timestamp.
///
/// ## Invariants (hold by construction)
/// - `lines` is non-empty
/// - `subtotal_cents == Σ lines.line_total_cents`
/// - `tax_cents == subtotal × tax_rate` (half-up cent rounding)
/// - `total_cents == subtotal_cents + tax_cents`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDraft {
    pub lines: Vec<SaleLine>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    /// The policy that produced `tax_cents`: the register's configured
    /// rate, or [`TaxRate::ZERO`] for log-book entries.
    pub tax_rate: TaxRate,
}

impl SaleDraft {
    /// Builds a draft from raw lines under one explicit tax policy.
    ///
    /// Incomplete lines are dropped, not errored - a half-filled log-book
    /// row is normal form state. Only a draft with *no* usable lines at
    /// all is rejected.
    pub fn new(lines: Vec<DraftLine>, tax_rate: TaxRate) -> ValidationResult<Self> {
        let valid: Vec<SaleLine> = lines
            .into_iter()
            .filter(DraftLine::is_valid)
            .map(|l| {
                let product_id = l.product_id.unwrap_or_default();
                SaleLine {
                    product_id,
                    quantity: l.quantity,
                    price_at_sale_cents: l.unit_price_cents,
                    line_total_cents: l.unit_price_cents * l.quantity,
                }
            })
            .collect();

        if valid.is_empty() {
            return Err(ValidationError::EmptyDraft);
        }

        let subtotal_cents: i64 = valid.iter().map(|l| l.line_total_cents).sum();
        let tax_cents = Money::from_cents(subtotal_cents)
            .calculate_tax(tax_rate)
            .cents();

        Ok(SaleDraft {
            total_cents: subtotal_cents + tax_cents,
            lines: valid,
            subtotal_cents,
            tax_cents,
            tax_rate,
        })
    }

    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i64, quantity: i64, unit_price_cents: i64) -> DraftLine {
        DraftLine {
            product_id: Some(product_id),
            quantity,
            unit_price_cents,
        }
    }

    #[test]
    fn test_register_policy_folds_tax_into_total() {
        // $45.00 × 2 + $12.50 × 1 at 8% → 102.50 / 8.20 / 110.70
        let draft = SaleDraft::new(
            vec![line(1, 2, 4500), line(2, 1, 1250)],
            TaxRate::from_bps(800),
        )
        .unwrap();

        assert_eq!(draft.subtotal_cents, 10250);
        assert_eq!(draft.tax_cents, 820);
        assert_eq!(draft.total_cents, 11070);
    }

    #[test]
    fn test_logbook_policy_applies_no_tax() {
        let draft = SaleDraft::new(vec![line(1, 3, 1000)], TaxRate::ZERO).unwrap();

        assert_eq!(draft.subtotal_cents, 3000);
        assert_eq!(draft.tax_cents, 0);
        assert_eq!(draft.total_cents, 3000);
    }

    #[test]
    fn test_line_totals_are_exact_products() {
        let draft = SaleDraft::new(
            vec![line(1, 7, 333), line(2, 2, 4999)],
            TaxRate::from_bps(800),
        )
        .unwrap();

        for l in &draft.lines {
            assert_eq!(l.line_total_cents, l.quantity * l.price_at_sale_cents);
        }
        assert_eq!(
            draft.subtotal_cents,
            draft.lines.iter().map(|l| l.line_total_cents).sum::<i64>()
        );
        assert_eq!(draft.total_cents, draft.subtotal_cents + draft.tax_cents);
    }

    #[test]
    fn test_empty_draft_is_rejected() {
        let err = SaleDraft::new(vec![], TaxRate::ZERO).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyDraft));
        assert_eq!(err.to_string(), "no valid items");
    }

    #[test]
    fn test_all_incomplete_lines_rejected() {
        let lines = vec![
            DraftLine {
                product_id: None,
                quantity: 3,
                unit_price_cents: 1000,
            },
            DraftLine {
                product_id: Some(2),
                quantity: 0,
                unit_price_cents: 500,
            },
        ];
        assert!(matches!(
            SaleDraft::new(lines, TaxRate::ZERO),
            Err(ValidationError::EmptyDraft)
        ));
    }

    #[test]
    fn test_incomplete_lines_dropped_silently() {
        let lines = vec![
            DraftLine {
                product_id: None, // no product selected → dropped
                quantity: 5,
                unit_price_cents: 9999,
            },
            line(1, 2, 1250),
            DraftLine {
                product_id: Some(3),
                quantity: 0, // zero quantity → dropped
                unit_price_cents: 800,
            },
        ];

        let draft = SaleDraft::new(lines, TaxRate::ZERO).unwrap();
        assert_eq!(draft.lines.len(), 1);
        assert_eq!(draft.lines[0].product_id, 1);
        assert_eq!(draft.subtotal_cents, 2500);
    }

    #[test]
    fn test_snapshot_is_caller_price_not_catalog() {
        // The draft never sees the catalog: whatever unit price the
        // builder captured is what gets committed.
        let draft = SaleDraft::new(vec![line(1, 1, 1000)], TaxRate::ZERO).unwrap();
        assert_eq!(draft.lines[0].price_at_sale_cents, 1000);
    }
}
