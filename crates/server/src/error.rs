//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//! Every error body is JSON with at least an `error` key.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cookie_haven_core::{CheckoutEntry, OrderError, PricingError, ValidationErrors};
use serde_json::json;
use thiserror::Error;

use crate::payment::PaymentError;
use crate::store::StoreError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Hosted checkout session could not be created.
    ///
    /// Covers malformed payloads too: the checkout client only understands
    /// a 500 with the underlying message.
    #[error("{0}")]
    Checkout(String),

    /// Order history could not be read or written.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Checkout was attempted with an empty cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// Checkout form failed validation.
    #[error("Please correct the highlighted fields")]
    Validation(ValidationErrors),

    /// Cart could not be priced.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        Self::Checkout(err.to_string())
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyCart => Self::EmptyCart,
            OrderError::Invalid(fields) => Self::Validation(fields),
            OrderError::Pricing(e) => Self::Pricing(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Checkout(_) | Self::Store(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Checkout(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::EmptyCart | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) | Self::Pricing(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = match &self {
            // Don't expose filesystem details to clients
            Self::Store(_) => json!({ "error": "Internal server error" }),
            Self::EmptyCart => json!({
                "error": self.to_string(),
                "redirect": CheckoutEntry::CART_PATH,
            }),
            Self::Validation(fields) => json!({
                "error": self.to_string(),
                "fields": fields,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for a checkout step.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of steps
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}
