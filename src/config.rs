//! Runtime configuration.
//!
//! Defaults suit a single-currency USD ledger. `from_env` lets the
//! environment override them; command-line flags override both.

use crate::core::currency::CurrencyCode;
use std::env;

/// Environment variable naming the currency used when a group sets none.
pub const CURRENCY_VAR: &str = "DIVY_CURRENCY";
/// Environment variable toggling the simplified settlement plan in reports.
pub const SIMPLIFY_VAR: &str = "DIVY_SIMPLIFY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Currency for groups that do not name one.
    pub default_currency: CurrencyCode,
    /// Whether balance reports include the simplified transfer list.
    pub include_settlement_plan: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_currency: CurrencyCode::default(),
            include_settlement_plan: true,
        }
    }
}

impl LedgerConfig {
    /// Defaults, overridden by `DIVY_CURRENCY` and `DIVY_SIMPLIFY` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(code) = lookup(CURRENCY_VAR).filter(|c| !c.trim().is_empty()) {
            config.default_currency = CurrencyCode::new(code.trim());
        }
        if let Some(flag) = lookup(SIMPLIFY_VAR) {
            match parse_flag(&flag) {
                Some(value) => config.include_settlement_plan = value,
                None => log::warn!("ignoring {}={:?}: expected true/false", SIMPLIFY_VAR, flag),
            }
        }
        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
