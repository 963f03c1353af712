//! Order records assembled from a validated checkout.
//!
//! [`OrderRequest::into_order`] is the whole order-form pipeline minus I/O:
//! gate on an empty cart, validate the form, price the cart, and build the
//! record. The caller supplies the clock and the per-line ID suffixes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::checkout::{
    CheckoutEntry, PaymentInfo, ShippingInfo, ValidationErrors, checkout_entry, validate,
};
use crate::pricing::{PricingError, PricingPolicy, Totals};
use crate::types::{
    Email, OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductId, UserId,
};

/// Why an order could not be assembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The cart has no lines; the shopper belongs on the cart page.
    #[error("cart is empty")]
    EmptyCart,
    /// One or more form fields failed validation.
    #[error("invalid checkout form: {0}")]
    Invalid(#[from] ValidationErrors),
    /// Prices could not be totalled.
    #[error("pricing failed: {0}")]
    Pricing(#[from] PricingError),
}

/// A checkout submission from the order form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(default)]
    pub cart: Cart,
    #[serde(default)]
    pub shipping_info: ShippingInfo,
    #[serde(default)]
    pub payment_info: PaymentInfo,
    /// Signed-in shopper, if any.
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl OrderRequest {
    /// Validate, price and assemble the order.
    ///
    /// `next_suffix` is called once per cart line to make each item ID
    /// unique within the same millisecond.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] for an empty cart,
    /// [`OrderError::Invalid`] when the form fails validation, or
    /// [`OrderError::Pricing`] when the cart cannot be totalled.
    pub fn into_order(
        self,
        policy: &PricingPolicy,
        placed_at: DateTime<Utc>,
        mut next_suffix: impl FnMut() -> String,
    ) -> Result<Order, OrderError> {
        if checkout_entry(&self.cart) == CheckoutEntry::RedirectToCart {
            return Err(OrderError::EmptyCart);
        }

        validate(&self.shipping_info, &self.payment_info)?;
        let totals = policy.quote(&self.cart)?;

        // validate() already accepted the address, so this only fails if the
        // two checks disagree.
        let email = Email::parse(&self.shipping_info.email).map_err(|_| {
            let mut errors = ValidationErrors::default();
            errors.add("email", "Email is invalid");
            OrderError::Invalid(errors)
        })?;

        let millis = placed_at.timestamp_millis();
        let id = OrderId::from_millis(millis);
        let method = self.payment_info.payment_method;

        let items = self
            .cart
            .iter()
            .map(|line| OrderItem {
                id: OrderItemId::from_parts(millis, &next_suffix()),
                order_id: id.clone(),
                product_id: line.product.id.clone(),
                name: line.product.name.clone(),
                price: line.product.price,
                quantity: line.quantity,
                image: line.product.image.clone(),
            })
            .collect();

        Ok(Order {
            id,
            user_id: self.user_id.unwrap_or_default(),
            date: placed_at,
            status: OrderStatus::initial_for(method),
            shipping_address: self.shipping_info.formatted_address(),
            payment_method: method,
            subtotal: totals.subtotal(),
            tax: totals.tax(),
            shipping: totals.shipping(),
            total: totals.total(),
            items,
            contact_info: ContactInfo {
                email,
                phone: self.shipping_info.phone.trim().to_owned(),
                name: self.shipping_info.full_name(),
            },
        })
    }
}

/// A placed order as recorded in order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// When the order was placed.
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub items: Vec<OrderItem>,
    pub contact_info: ContactInfo,
}

impl Order {
    /// Totals recomputed from the stored parts.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored part is negative.
    pub fn totals(&self) -> Result<Totals, PricingError> {
        Totals::from_parts(self.subtotal, self.shipping, self.tax)
    }

    /// Total units across all items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// One purchased line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image: String,
}

/// Contact details copied onto the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Email,
    pub phone: String,
    pub name: String,
}
