//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are carried in the currency's standard unit (pesos, dollars) as
//! [`Decimal`]. Payment providers want integer minor units (centavos,
//! cents); [`Price::minor_units`] does that conversion with half-up
//! rounding.

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors converting a price for a payment provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    /// Negative amounts cannot be charged.
    #[error("amount cannot be negative: {0}")]
    Negative(Decimal),
    /// Amount does not fit in the provider's integer range.
    #[error("amount out of range: {0}")]
    OutOfRange(Decimal),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., pesos, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Amount in minor units, rounded half away from zero.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for negative amounts and
    /// [`PriceError::OutOfRange`] if the result does not fit in an `i64`.
    pub fn minor_units(&self) -> Result<i64, PriceError> {
        to_minor_units(self.amount)
    }

    /// Format for display (e.g., "₱12.50").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Convert a standard-unit amount into integer minor units.
///
/// # Errors
///
/// See [`Price::minor_units`].
pub fn to_minor_units(amount: Decimal) -> Result<i64, PriceError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PriceError::Negative(amount));
    }

    let scaled = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(PriceError::OutOfRange(amount))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    scaled.to_i64().ok_or(PriceError::OutOfRange(amount))
}

/// ISO 4217 currency codes accepted by the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyCode {
    #[default]
    PHP,
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::PHP => "₱",
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Lowercase code, the form payment providers expect.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::PHP => "php",
            Self::USD => "usd",
            Self::EUR => "eur",
            Self::GBP => "gbp",
            Self::CAD => "cad",
            Self::AUD => "aud",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "php" => Ok(Self::PHP),
            "usd" => Ok(Self::USD),
            "eur" => Ok(Self::EUR),
            "gbp" => Ok(Self::GBP),
            "cad" => Ok(Self::CAD),
            "aud" => Ok(Self::AUD),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_minor_units_whole_and_fractional() {
        assert_eq!(to_minor_units(dec("12")).unwrap(), 1200);
        assert_eq!(to_minor_units(dec("4.99")).unwrap(), 499);
        assert_eq!(to_minor_units(Decimal::ZERO).unwrap(), 0);
    }

    #[test]
    fn test_minor_units_rounds_half_up() {
        assert_eq!(to_minor_units(dec("1.005")).unwrap(), 101);
        assert_eq!(to_minor_units(dec("1.004")).unwrap(), 100);
        assert_eq!(to_minor_units(dec("2.3992")).unwrap(), 240);
    }

    #[test]
    fn test_minor_units_rejects_negative() {
        assert_eq!(
            to_minor_units(dec("-1")),
            Err(PriceError::Negative(dec("-1")))
        );
    }

    #[test]
    fn test_display() {
        let price = Price::new(dec("12.5"), CurrencyCode::PHP);
        assert_eq!(price.display(), "₱12.50");
        let price = Price::new(dec("3.999"), CurrencyCode::USD);
        assert_eq!(price.to_string(), "$4.00");
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!(CurrencyCode::from_str("PHP").unwrap(), CurrencyCode::PHP);
        assert_eq!(CurrencyCode::from_str(" usd ").unwrap(), CurrencyCode::USD);
        assert!(CurrencyCode::from_str("btc").is_err());
    }
}
