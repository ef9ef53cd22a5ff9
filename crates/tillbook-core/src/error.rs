//! # Error Types
//!
//! Domain-specific error types for tillbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tillbook-core errors (this file)                                       │
//! │  ├── CoreError        - Draft/cart rule violations                      │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  tillbook-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  Console errors (in app)                                                │
//! │  └── CliError         - What the operator sees                          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → CliError → operator      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (line id, limits)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations in cart and log-book
/// manipulation. They are caller-correctable and never clear draft state.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A cart line or log-book row id does not exist.
    ///
    /// ## When This Occurs
    /// - `set_quantity` / `remove_line` addressed a line that was already
    ///   removed
    /// - Operator typo on a line number in the console
    #[error("Line {line_id} not found in draft")]
    LineNotFound { line_id: u32 },

    /// Draft has exceeded the maximum number of distinct lines.
    #[error("Draft cannot have more than {max} lines")]
    DraftTooLarge { max: usize },

    /// Line quantity exceeds the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements. They are always
/// recoverable in place: the message is specific and the draft state is
/// preserved unchanged.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparseable amount or date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A commit was attempted with no usable lines: every row was missing
    /// a product or had a non-positive quantity.
    #[error("no valid items")]
    EmptyDraft,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
