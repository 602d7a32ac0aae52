use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217-style currency code a group keeps its ledger in.
///
/// The code decides the minor unit every share and balance is rounded to:
/// two decimal places unless the currency is known to use zero or three.
///
/// # Examples
///
/// ```
/// use divy_ledger::core::currency::CurrencyCode;
/// use rust_decimal_macros::dec;
///
/// let usd = CurrencyCode::new("USD");
/// assert_eq!(usd.minor_unit(), dec!(0.01));
/// assert_eq!(CurrencyCode::new("JPY").minor_unit(), dec!(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "ISK", "JPY", "KMF", "KRW", "PYG", "RWF", "UGX", "VND", "VUV",
    "XAF", "XOF", "XPF",
];

const THREE_DECIMAL_CURRENCIES: &[&str] = &["BHD", "IQD", "JOD", "KWD", "LYD", "OMR", "TND"];

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of decimal places in the currency's minor unit.
    pub fn minor_digits(&self) -> u32 {
        let code = self.0.as_str();
        if ZERO_DECIMAL_CURRENCIES.contains(&code) {
            0
        } else if THREE_DECIMAL_CURRENCIES.contains(&code) {
            3
        } else {
            2
        }
    }

    /// The smallest representable amount, e.g. `0.01` for USD.
    pub fn minor_unit(&self) -> Decimal {
        Decimal::new(1, self.minor_digits())
    }

    /// Whether `amount` carries no precision below the minor unit.
    pub fn is_representable(&self, amount: Decimal) -> bool {
        amount.round_dp(self.minor_digits()) == amount
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
