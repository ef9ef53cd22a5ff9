//! # Console Error Presentation
//!
//! Every failure that reaches the prompt is flattened into a [`CliError`]:
//! a coarse [`ErrorCode`] plus one human-readable line. Validation and
//! not-found messages pass through verbatim since the operator can act on
//! them. Database internals (file paths, SQL fragments) are logged via
//! `tracing` and replaced with a generic message before display.
//!
//! ```text
//!   ValidationError ──┐
//!   CoreError ────────┼──▶ CliError ──▶ "✗ [Code] message" at the prompt
//!   DbError ──────────┘         │
//!                               └──▶ tracing::error! (raw detail, stderr)
//! ```

use tillbook_core::{CoreError, ValidationError};
use tillbook_db::DbError;

/// Coarse classification of a console-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The referenced record does not exist.
    NotFound,
    /// Input was rejected before touching the database.
    ValidationError,
    /// The database reported a failure; detail is in the logs.
    DatabaseError,
    /// The in-progress draft rejected an edit.
    DraftError,
    /// Unexpected internal failure.
    Internal,
}

/// One displayable failure: code plus operator-facing message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("[{code:?}] {message}")]
pub struct CliError {
    pub code: ErrorCode,
    pub message: String,
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LineNotFound { .. } => CliError::not_found(err.to_string()),
            CoreError::DraftTooLarge { .. } => CliError::new(ErrorCode::DraftError, err.to_string()),
            CoreError::QuantityTooLarge { .. } => CliError::validation(err.to_string()),
            CoreError::Validation(e) => CliError::validation(e.to_string()),
        }
    }
}

impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                CliError::not_found(format!("{entity} {id} not found"))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!(detail = %message, "Foreign key violation");
                CliError::validation("Sale references a product that does not exist")
            }
            DbError::CheckViolation { message } => {
                tracing::error!(detail = %message, "Check constraint violation");
                CliError::validation("Sale values were rejected by the database")
            }
            other => {
                tracing::error!(error = %other, "Database operation failed");
                CliError::new(
                    ErrorCode::DatabaseError,
                    "A database error occurred. See logs for details.",
                )
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::internal(format!("I/O error: {err}"))
    }
}
