//! # Interactive Screens
//!
//! Each screen owns a sub-prompt loop and returns to the caller when the
//! operator types its exit command (or stdin closes). Screens share one
//! convention: per-command failures are printed as `✗ ...` and the loop
//! continues with all draft state preserved; only I/O failures on the
//! prompt itself propagate out as `CliError`.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  tillbook>                (main.rs dispatcher)                   │
//! │     ├── register          cart sales at the till                 │
//! │     ├── logbook           after-the-fact paper log entry         │
//! │     ├── products          catalog browse + admin mutations       │
//! │     ├── dashboard         one-shot stats render                  │
//! │     └── history           recorded sales: filter / view / export │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

pub mod dashboard;
pub mod history;
pub mod logbook;
pub mod products;
pub mod register;

use crate::error::CliError;

/// Receipt ids render zero-padded to six digits everywhere they appear.
pub(crate) fn format_receipt_id(id: i64) -> String {
    format!("#{id:06}")
}

/// Parses a numeric command argument, naming the field on failure.
pub(crate) fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, CliError> {
    raw.trim()
        .parse()
        .map_err(|_| CliError::validation(format!("{what} must be a number")))
}

/// Truncates a display string to `width` so table columns stay aligned.
pub(crate) fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let head: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
