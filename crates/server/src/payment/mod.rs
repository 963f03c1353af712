//! Hosted payment checkout sessions.
//!
//! The service never sees card details for hosted checkout: it converts the
//! cart into provider line items, asks the provider for a session, and hands
//! the session URL back to the client.
//!
//! [`PaymentGateway`] is the seam between the HTTP layer and the provider.
//! [`StripeClient`] talks to Stripe; tests substitute their own gateway.

mod line_items;
mod stripe;

use async_trait::async_trait;
use cookie_haven_core::{CheckoutSessionId, CurrencyCode, PriceError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use line_items::{CHECKOUT_SESSION_PLACEHOLDER, line_items, redirect_base};
pub use stripe::StripeClient;

/// Errors that can occur when creating a checkout session.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Failed to parse the provider response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An amount could not be converted to minor units.
    #[error("Invalid amount: {0}")]
    Amount(#[from] PriceError),

    /// There is nothing to charge for.
    #[error("Cart is empty")]
    EmptyCart,
}

/// Provider-agnostic hosted checkout.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session and return its reference.
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}

/// One priced entry on the hosted checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub currency: CurrencyCode,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in minor units (centavos for PHP).
    pub unit_amount: i64,
    pub quantity: u32,
}

/// Customer details attached to the session for the merchant dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
}

/// Everything the provider needs to open a hosted checkout page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub line_items: Vec<LineItem>,
    pub success_url: String,
    pub cancel_url: String,
    pub customer_email: String,
    pub metadata: SessionMetadata,
}

impl CheckoutSessionRequest {
    /// Build a request that redirects back to `base` when the shopper
    /// finishes or abandons payment.
    #[must_use]
    pub fn new(
        line_items: Vec<LineItem>,
        base: &str,
        customer_email: impl Into<String>,
        metadata: SessionMetadata,
    ) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            line_items,
            success_url: format!(
                "{base}/order-confirmation?session_id={CHECKOUT_SESSION_PLACEHOLDER}"
            ),
            cancel_url: format!("{base}/checkout"),
            customer_email: customer_email.into(),
            metadata,
        }
    }
}

/// A created hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    pub id: CheckoutSessionId,
    pub url: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_urls() {
        let request = CheckoutSessionRequest::new(
            Vec::new(),
            "https://shop.example.com/",
            "juan@example.com",
            SessionMetadata::default(),
        );

        assert_eq!(
            request.success_url,
            "https://shop.example.com/order-confirmation?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(request.cancel_url, "https://shop.example.com/checkout");
        assert_eq!(request.customer_email, "juan@example.com");
    }

    #[test]
    fn test_api_error_displays_provider_message() {
        let err = PaymentError::Api {
            status: 400,
            message: "Invalid email address".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid email address");
    }
}
