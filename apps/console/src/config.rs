//! # Console Configuration
//!
//! Store-level settings loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TILLBOOK_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use tillbook_core::types::TaxRate;
use tillbook_core::validation::validate_tax_rate_bps;
use tracing::warn;

/// Console configuration.
///
/// ## Fields
/// All fields have development defaults; deployments override via
/// environment.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Store name shown in the banner.
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Register tax rate in basis points
    /// e.g., 800 = 8.00%
    pub tax_rate_bps: u32,
}

impl Default for ConsoleConfig {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Store: "Tillbook Store"
    /// - Currency: $
    /// - Tax: 8.00% on register sales (log book entries are untaxed)
    fn default() -> Self {
        ConsoleConfig {
            store_name: "Tillbook Store".to_string(),
            currency_symbol: "$".to_string(),
            tax_rate_bps: 800,
        }
    }
}

impl ConsoleConfig {
    /// Creates a ConsoleConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `TILLBOOK_STORE_NAME`: Override store name
    /// - `TILLBOOK_CURRENCY`: Override currency symbol
    /// - `TILLBOOK_TAX_RATE_BPS`: Override register tax rate (e.g., "825")
    pub fn from_env() -> Self {
        let mut config = ConsoleConfig::default();

        if let Ok(store_name) = std::env::var("TILLBOOK_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Ok(symbol) = std::env::var("TILLBOOK_CURRENCY") {
            config.currency_symbol = symbol;
        }

        if let Ok(raw) = std::env::var("TILLBOOK_TAX_RATE_BPS") {
            match raw.parse::<u32>() {
                Ok(bps) if validate_tax_rate_bps(bps).is_ok() => {
                    config.tax_rate_bps = bps;
                }
                _ => warn!(
                    raw = %raw,
                    default = config.tax_rate_bps,
                    "Ignoring invalid TILLBOOK_TAX_RATE_BPS"
                ),
            }
        }

        config
    }

    /// The register's tax policy as a typed rate.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConsoleConfig::default();
    /// assert_eq!(config.format_cents(1234), "$12.34");
    /// ```
    pub fn format_cents(&self, cents: i64) -> String {
        let whole = (cents / 100).abs();
        let frac = (cents % 100).abs();

        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            whole,
            frac
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.store_name, "Tillbook Store");
        assert_eq!(config.tax_rate_bps, 800);
        assert_eq!(config.tax_rate(), TaxRate::from_bps(800));
    }

    #[test]
    fn test_format_cents_positive() {
        let config = ConsoleConfig::default();
        assert_eq!(config.format_cents(1234), "$12.34");
        assert_eq!(config.format_cents(100), "$1.00");
        assert_eq!(config.format_cents(1), "$0.01");
        assert_eq!(config.format_cents(0), "$0.00");
    }

    #[test]
    fn test_format_cents_negative() {
        let config = ConsoleConfig::default();
        assert_eq!(config.format_cents(-1234), "-$12.34");
    }

    #[test]
    fn test_format_cents_large() {
        let config = ConsoleConfig::default();
        assert_eq!(config.format_cents(123456789), "$1234567.89");
    }
}
