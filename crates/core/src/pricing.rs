//! Subtotal, shipping and tax computation.
//!
//! Every [`Totals`] value satisfies `total == subtotal + shipping + tax`;
//! the fields are private and the only constructors compute `total`.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;

/// Errors computing totals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// A price, fee or rate was negative.
    #[error("{field} cannot be negative (got {value})")]
    Negative {
        /// Name of the offending input.
        field: &'static str,
        /// The value supplied.
        value: Decimal,
    },
    /// Arithmetic overflowed `Decimal`.
    #[error("amount overflow while computing {0}")]
    Overflow(&'static str),
}

/// Store pricing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    /// Orders with a subtotal strictly above this ship free.
    pub free_shipping_threshold: Decimal,
    /// Flat shipping fee charged otherwise.
    pub shipping_fee: Decimal,
    /// Tax rate applied to the subtotal (0.08 = 8%).
    pub tax_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::from(25),
            shipping_fee: Decimal::new(499, 2),
            tax_rate: Decimal::new(8, 2),
        }
    }
}

impl PricingPolicy {
    /// Create a policy, rejecting negative inputs.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Negative`] if any value is negative.
    pub fn new(
        free_shipping_threshold: Decimal,
        shipping_fee: Decimal,
        tax_rate: Decimal,
    ) -> Result<Self, PricingError> {
        non_negative("free_shipping_threshold", free_shipping_threshold)?;
        non_negative("shipping_fee", shipping_fee)?;
        non_negative("tax_rate", tax_rate)?;
        Ok(Self {
            free_shipping_threshold,
            shipping_fee,
            tax_rate,
        })
    }

    /// Sum of price times quantity over all lines.
    ///
    /// # Errors
    ///
    /// Returns an error if a product price is negative or the sum overflows.
    pub fn subtotal(cart: &Cart) -> Result<Decimal, PricingError> {
        cart.iter().try_fold(Decimal::ZERO, |acc, line| {
            non_negative("price", line.product.price)?;
            let line_total = line
                .line_total()
                .ok_or(PricingError::Overflow("line total"))?;
            acc.checked_add(line_total)
                .ok_or(PricingError::Overflow("subtotal"))
        })
    }

    /// Shipping charged for a subtotal.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.shipping_fee
        }
    }

    /// Tax for a subtotal, rounded to two places half away from zero.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the product overflows.
    pub fn tax_for(&self, subtotal: Decimal) -> Result<Decimal, PricingError> {
        subtotal
            .checked_mul(self.tax_rate)
            .map(|tax| tax.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
            .ok_or(PricingError::Overflow("tax"))
    }

    /// Compute all totals for a cart.
    ///
    /// # Errors
    ///
    /// Returns an error for negative prices or overflow.
    pub fn quote(&self, cart: &Cart) -> Result<Totals, PricingError> {
        let subtotal = Self::subtotal(cart)?;
        let shipping = self.shipping_for(subtotal);
        let tax = self.tax_for(subtotal)?;
        Totals::from_parts(subtotal, shipping, tax)
    }
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), PricingError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PricingError::Negative { field, value });
    }
    Ok(())
}

/// Computed order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    subtotal: Decimal,
    shipping: Decimal,
    tax: Decimal,
    total: Decimal,
}

impl Totals {
    /// Build totals from their parts; `total` is always their sum.
    ///
    /// # Errors
    ///
    /// Returns an error if any part is negative or the sum overflows.
    pub fn from_parts(
        subtotal: Decimal,
        shipping: Decimal,
        tax: Decimal,
    ) -> Result<Self, PricingError> {
        non_negative("subtotal", subtotal)?;
        non_negative("shipping", shipping)?;
        non_negative("tax", tax)?;

        let total = subtotal
            .checked_add(shipping)
            .and_then(|sum| sum.checked_add(tax))
            .ok_or(PricingError::Overflow("total"))?;

        Ok(Self {
            subtotal,
            shipping,
            tax,
            total,
        })
    }

    #[must_use]
    pub const fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    #[must_use]
    pub const fn shipping(&self) -> Decimal {
        self.shipping
    }

    #[must_use]
    pub const fn tax(&self) -> Decimal {
        self.tax
    }

    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }
}

impl FromStr for PricingPolicy {
    type Err = String;

    /// Parse `threshold,fee,rate`, e.g. `25,4.99,0.08`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<Decimal> = s
            .split(',')
            .map(|part| Decimal::from_str(part.trim()).map_err(|e| e.to_string()))
            .collect::<Result<_, _>>()?;

        match parts.as_slice() {
            [threshold, fee, rate] => {
                Self::new(*threshold, *fee, *rate).map_err(|e| e.to_string())
            }
            _ => Err(format!(
                "expected threshold,fee,rate but got {} values",
                parts.len()
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::tests::product;
    use crate::cart::{Cart, CartLine};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn cart(lines: &[(&str, &str, u32)]) -> Cart {
        Cart::new(
            lines
                .iter()
                .map(|(name, price, qty)| CartLine::new(product(name, price), *qty, None))
                .collect(),
        )
    }

    #[test]
    fn test_small_order_pays_shipping() {
        let totals = PricingPolicy::default()
            .quote(&cart(&[("Choco Chip", "5.00", 2)]))
            .unwrap();

        assert_eq!(totals.subtotal(), dec("10.00"));
        assert_eq!(totals.shipping(), dec("4.99"));
        assert_eq!(totals.tax(), dec("0.80"));
        assert_eq!(totals.total(), dec("15.79"));
    }

    #[test]
    fn test_large_order_ships_free() {
        let totals = PricingPolicy::default()
            .quote(&cart(&[("Choco Chip", "5.00", 4), ("Oatmeal", "6.50", 1)]))
            .unwrap();

        assert_eq!(totals.subtotal(), dec("26.50"));
        assert_eq!(totals.shipping(), Decimal::ZERO);
        assert_eq!(totals.tax(), dec("2.12"));
        assert_eq!(totals.total(), dec("28.62"));
    }

    #[test]
    fn test_threshold_is_strict() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.shipping_for(dec("25")), dec("4.99"));
        assert_eq!(policy.shipping_for(dec("25.01")), Decimal::ZERO);
    }

    #[test]
    fn test_tax_rounds_half_away_from_zero() {
        let policy = PricingPolicy::default();
        // 0.3125 * 0.08 = 0.025
        assert_eq!(policy.tax_for(dec("0.3125")).unwrap(), dec("0.03"));
        // 3.33 * 0.08 = 0.2664
        assert_eq!(policy.tax_for(dec("3.33")).unwrap(), dec("0.27"));
    }

    #[test]
    fn test_total_is_sum_of_parts() {
        let samples = ["0", "0.01", "1.99", "24.99", "25", "100", "1234.56"];
        let policy = PricingPolicy::default();
        for subtotal in samples {
            for shipping in ["0", "4.99", "150"] {
                let subtotal = dec(subtotal);
                let shipping = dec(shipping);
                let tax = policy.tax_for(subtotal).unwrap();
                let totals = Totals::from_parts(subtotal, shipping, tax).unwrap();
                assert_eq!(
                    totals.total(),
                    totals.subtotal() + totals.shipping() + totals.tax()
                );
            }
        }
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = PricingPolicy::default()
            .quote(&cart(&[("Broken", "-1", 1)]))
            .unwrap_err();
        assert!(matches!(err, PricingError::Negative { field: "price", .. }));
    }

    #[test]
    fn test_negative_parts_rejected() {
        assert!(Totals::from_parts(dec("1"), dec("-0.01"), Decimal::ZERO).is_err());
    }

    #[test]
    fn test_empty_cart_quotes_flat_fee() {
        let totals = PricingPolicy::default().quote(&Cart::default()).unwrap();
        assert_eq!(totals.subtotal(), Decimal::ZERO);
        assert_eq!(totals.shipping(), dec("4.99"));
        assert_eq!(totals.total(), dec("4.99"));
    }

    #[test]
    fn test_policy_from_str() {
        let policy: PricingPolicy = "30, 5, 0.12".parse().unwrap();
        assert_eq!(policy.free_shipping_threshold, dec("30"));
        assert_eq!(policy.shipping_fee, dec("5"));
        assert_eq!(policy.tax_rate, dec("0.12"));

        assert!("30,5".parse::<PricingPolicy>().is_err());
        assert!("30,-5,0.1".parse::<PricingPolicy>().is_err());
    }
}
