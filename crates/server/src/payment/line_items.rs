//! Cart to provider line-item mapping and redirect resolution.

use cookie_haven_core::{Cart, CurrencyCode, to_minor_units};
use rust_decimal::Decimal;

use super::{LineItem, PaymentError};

/// Template variable the provider replaces with the created session's ID.
pub const CHECKOUT_SESSION_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Origin sent by the wrapped mobile app on some platforms.
const NATIVE_LOCALHOST_ORIGIN: &str = "http://localhost";

/// Convert a cart plus precomputed shipping and tax into line items.
///
/// Each cart line becomes one item named after its box size. Shipping and
/// tax are appended as single-quantity items only when positive.
///
/// # Errors
///
/// Returns [`PaymentError::EmptyCart`] for a cart with no lines, or
/// [`PaymentError::Amount`] if a price is negative or too large.
pub fn line_items(
    cart: &Cart,
    shipping: Decimal,
    tax: Decimal,
    currency: CurrencyCode,
) -> Result<Vec<LineItem>, PaymentError> {
    if cart.is_empty() {
        return Err(PaymentError::EmptyCart);
    }

    let mut items = cart
        .iter()
        .map(|line| {
            Ok(LineItem {
                currency,
                name: line.display_name(),
                description: Some(line.variant_description()),
                unit_amount: to_minor_units(line.product.price)?,
                quantity: line.quantity,
            })
        })
        .collect::<Result<Vec<_>, PaymentError>>()?;

    for (name, amount) in [("Shipping", shipping), ("Tax", tax)] {
        if amount > Decimal::ZERO {
            items.push(LineItem {
                currency,
                name: name.to_string(),
                description: None,
                unit_amount: to_minor_units(amount)?,
                quantity: 1,
            });
        }
    }

    Ok(items)
}

/// Pick the base URL the provider redirects back to.
///
/// Browsers send their own origin, which is used as-is. The native app
/// shells cannot receive web redirects, so they are sent to the public web
/// app instead. Without an `Origin` header the default origin applies.
#[must_use]
pub fn redirect_base(origin: Option<&str>, default_origin: &str, app_url: &str) -> String {
    let origin = origin.filter(|o| !o.is_empty()).unwrap_or(default_origin);
    let base = if origin.contains("capacitor") || origin == NATIVE_LOCALHOST_ORIGIN {
        app_url
    } else {
        origin
    };
    base.trim_end_matches('/').to_string()
}
