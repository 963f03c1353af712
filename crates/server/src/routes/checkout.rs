//! Hosted checkout session handler.
//!
//! Stateless: the client sends its cart plus the shipping and tax it already
//! computed, and gets back the URL of a provider-hosted payment page.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, header::ORIGIN},
};
use cookie_haven_core::{Cart, CheckoutContact};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::payment::{CheckoutSessionRequest, SessionMetadata, line_items, redirect_base};
use crate::state::AppState;

/// Body of `POST /create-checkout-session`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionPayload {
    pub cart: Cart,
    pub shipping_info: CheckoutContact,
    #[serde(default)]
    pub shipping: Decimal,
    #[serde(default)]
    pub tax: Decimal,
}

/// Response carrying the hosted checkout URL.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub url: String,
}

/// Create a hosted checkout session for the submitted cart.
///
/// Every failure, including a malformed body, is reported as a 500 with
/// the underlying message.
#[instrument(skip_all)]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<CreateSessionPayload>, JsonRejection>,
) -> Result<Json<CreateSessionResponse>> {
    let Json(payload) = payload.map_err(|e| AppError::Checkout(e.body_text()))?;
    let config = state.config();

    tracing::info!(
        items = payload.cart.len(),
        customer = %payload.shipping_info.email,
        shipping = %payload.shipping,
        tax = %payload.tax,
        "Received checkout request"
    );

    let items = line_items(
        &payload.cart,
        payload.shipping,
        payload.tax,
        config.currency,
    )?;

    let origin = headers.get(ORIGIN).and_then(|v| v.to_str().ok());
    let base = redirect_base(origin, &config.default_origin, config.app_url.as_str());

    let contact = payload.shipping_info;
    let request = CheckoutSessionRequest::new(
        items,
        &base,
        contact.email,
        SessionMetadata {
            customer_name: contact.full_name,
            phone: contact.phone,
            address: contact.address,
        },
    );

    tracing::info!(
        line_items = request.line_items.len(),
        redirect_base = %base,
        "Creating checkout session"
    );

    let session = state.gateway().create_checkout_session(&request).await?;

    tracing::info!(session_id = %session.id, "Checkout session created");
    add_breadcrumb("checkout", "Checkout session created", &[("session_id", session.id.as_str())]);

    Ok(Json(CreateSessionResponse { url: session.url }))
}
