//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A receipt that is off by a cent is a till that doesn't balance.        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    $45.00 is 4500. $102.50 is 10250. Addition is exact, line totals     │
//! │    are exact, and the single rounding point (tax) is explicit.          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tillbook_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(4500); // $45.00
//!
//! // Arithmetic operations
//! let two = price * 2;                         // $90.00
//! let total = two + Money::from_cents(1250);   // $102.50
//! assert_eq!(total.cents(), 10250);
//!
//! // NEVER construct from floats - no such method exists
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: room for aggregate sums far beyond any single till
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for report payloads
///
/// ## Where Money Flows
/// ```text
/// Product.price_cents ──► CartLine.unit_price ──► SaleLine.price_at_sale
///                                    │
///                                    ▼
///      subtotal ──► tax (basis points) ──► total ──► Sale.total_cents
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use tillbook_core::money::Money;
    ///
    /// let price = Money::from_cents(1250); // $12.50
    /// assert_eq!(price.cents(), 1250);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax at the given rate, rounding half up on cents.
    ///
    /// ## Implementation
    /// Integer math only: `(cents × bps + 5000) / 10000`. The +5000 term
    /// rounds the half-cent boundary up. i128 intermediate prevents
    /// overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use tillbook_core::money::Money;
    /// use tillbook_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(10250); // $102.50
    /// let rate = TaxRate::from_bps(800);       // 8%
    ///
    /// // $102.50 × 8% = $8.20 exactly
    /// assert_eq!(subtotal.calculate_tax(rate).cents(), 820);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// This is the line-total rule: `line_total = unit_price × quantity`,
    /// exact in integer cents.
    ///
    /// ## Example
    /// ```rust
    /// use tillbook_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(4500); // $45.00
    /// assert_eq!(unit_price.multiply_quantity(2).cents(), 9000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Formats the amount as a plain decimal string with exactly two
    /// fractional digits and no currency symbol: `10250` → `"102.50"`.
    ///
    /// This is the canonical form used by the CSV export and by the
    /// free-text history filter.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

/// Parses a decimal amount string into Money.
///
/// Accepts `"45"`, `"45.0"`, `"45.00"`, and an optional leading `$`.
/// More than two fractional digits is an error - there is no silent
/// sub-cent truncation.
///
/// ## Example
/// ```rust
/// use tillbook_core::money::Money;
///
/// let m: Money = "45.00".parse().unwrap();
/// assert_eq!(m.cents(), 4500);
/// assert!("12.5".parse::<Money>().unwrap().cents() == 1250);
/// assert!("1.999".parse::<Money>().is_err());
/// ```
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: "expected a decimal like 12.50".to_string(),
        };

        let raw = s.trim().trim_start_matches('$');
        if raw.is_empty() {
            return Err(invalid());
        }

        let (negative, raw) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let (whole, frac) = match raw.split_once('.') {
            Some((w, f)) => (w, f),
            None => (raw, ""),
        };

        if whole.is_empty() || whole.chars().any(|c| !c.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac.len() > 2 || frac.chars().any(|c| !c.is_ascii_digit()) {
            return Err(invalid());
        }

        let dollars: i64 = whole.parse().map_err(|_| invalid())?;
        let cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        // Checked: an 18-digit "price" must error, not wrap.
        let total = dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .ok_or_else(invalid)?;
        Ok(Money(if negative { -total } else { total }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money in a human-readable `$102.50` format.
///
/// The console prepends its configured currency symbol instead when one is
/// set; this form is for logs and tests.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=), used when accumulating subtotals.
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Multiplication by i64 (quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(10250)), "$102.50");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(11070).to_decimal_string(), "110.70");
        assert_eq!(Money::from_cents(7).to_decimal_string(), "0.07");
        assert_eq!(Money::from_cents(-1250).to_decimal_string(), "-12.50");
    }

    #[test]
    fn test_parse() {
        assert_eq!("45".parse::<Money>().unwrap().cents(), 4500);
        assert_eq!("45.0".parse::<Money>().unwrap().cents(), 4500);
        assert_eq!("45.00".parse::<Money>().unwrap().cents(), 4500);
        assert_eq!("$12.50".parse::<Money>().unwrap().cents(), 1250);
        assert_eq!("-5.50".parse::<Money>().unwrap().cents(), -550);
        assert_eq!("0.07".parse::<Money>().unwrap().cents(), 7);

        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.999".parse::<Money>().is_err());
        assert!("1..5".parse::<Money>().is_err());
        assert!(".50".parse::<Money>().is_err());
        // Out of i64-cents range
        assert!("92233720368547759.00".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);

        let mut acc = Money::zero();
        acc += a;
        acc += b;
        assert_eq!(acc.cents(), 1500);
    }

    #[test]
    fn test_tax_register_rate() {
        // The register scenario: $102.50 at 8% = $8.20 exactly
        let subtotal = Money::from_cents(10250);
        let tax = subtotal.calculate_tax(TaxRate::from_bps(800));
        assert_eq!(tax.cents(), 820);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // $10.00 at 8.25% = $0.825 → rounds up to $0.83
        let amount = Money::from_cents(1000);
        let tax = amount.calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.cents(), 83);

        // $1.00 at 0.4% = 0.4 cents → rounds down to 0
        let tiny = Money::from_cents(100).calculate_tax(TaxRate::from_bps(40));
        assert_eq!(tiny.cents(), 0);
    }

    #[test]
    fn test_zero_tax_rate() {
        let amount = Money::from_cents(98765);
        assert_eq!(amount.calculate_tax(TaxRate::ZERO).cents(), 0);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(4500);
        assert_eq!(unit_price.multiply_quantity(2).cents(), 9000);
        assert_eq!(unit_price.multiply_quantity(0).cents(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(!negative.is_zero());
        assert!(negative.is_negative());
    }
}
