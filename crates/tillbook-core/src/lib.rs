//! # tillbook-core: Pure Business Logic for Tillbook
//!
//! This crate is the **heart** of Tillbook. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Tillbook Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Console Shell (apps/console)                 │   │
//! │  │   Register ─► Log Book ─► Products ─► Dashboard ─► History     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ tillbook-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │  │  types  │ │  money  │ │  cart   │ │  draft  │ │ reports │  │   │
//! │  │  │ Product │ │  Money  │ │  Cart   │ │SaleDraft│ │  stats  │  │   │
//! │  │  │  Sale   │ │ TaxRate │ │ LogBook │ │ commit  │ │ filters │  │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  tillbook-db (Database Layer)                    │   │
//! │  │            SQLite queries, migrations, repositories              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, SaleItem, TaxRate)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The register cart and the manual log book builders
//! - [`draft`] - Commit-time validation that turns a draft into sale lines
//! - [`reports`] - Dashboard aggregates, history filters, CSV export
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use tillbook_core::money::Money;
//! use tillbook_core::types::TaxRate;
//!
//! // Create money from cents (never from floats!)
//! let subtotal = Money::from_cents(10250); // $102.50
//!
//! // Calculate tax with half-up rounding
//! let tax_rate = TaxRate::from_bps(800); // 8%
//! let tax = subtotal.calculate_tax(tax_rate);
//!
//! // Tax on $102.50 at 8% = $8.20
//! assert_eq!(tax.cents(), 820);
//! assert_eq!((subtotal + tax).cents(), 11070);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod draft;
pub mod error;
pub mod money;
pub mod reports;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tillbook_core::Money` instead of
// `use tillbook_core::money::Money`

pub use cart::{Cart, CartLine, LogBook, LogRow};
pub use draft::{DraftLine, SaleDraft, SaleLine};
pub use error::{CoreError, CoreResult, ValidationError, ValidationResult};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single draft (register cart or log book)
///
/// ## Business Reason
/// Prevents runaway drafts and ensures reasonable transaction sizes.
pub const MAX_DRAFT_LINES: usize = 100;

/// Maximum quantity of a single line in a draft
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum unit price in cents ($1,000,000.00)
///
/// With MAX_LINE_QUANTITY and MAX_DRAFT_LINES this bounds every subtotal
/// below 10^13 cents, so i64 money arithmetic cannot overflow.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;
