//! In-app order placement and order history.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use cookie_haven_core::{
    CheckoutEntry, Order, OrderId, OrderRequest, checkout_entry, validate,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Place an order from the checkout form.
///
/// Card and GCash details are validated but never stored. Payment is
/// simulated with the configured delay before the order is recorded.
#[instrument(skip_all)]
pub async fn place(
    State(state): State<AppState>,
    payload: std::result::Result<Json<OrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>)> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let config = state.config();

    if checkout_entry(&request.cart) == CheckoutEntry::RedirectToCart {
        tracing::info!("Checkout attempted with empty cart");
        return Err(AppError::EmptyCart);
    }
    if let Err(fields) = validate(&request.shipping_info, &request.payment_info) {
        tracing::info!(invalid_fields = fields.len(), "Checkout form rejected");
        return Err(AppError::Validation(fields));
    }

    let method = request.payment_info.payment_method;
    tracing::info!(
        items = request.cart.len(),
        payment_method = %method,
        "Processing payment"
    );
    tokio::time::sleep(config.payment_delay).await;

    let order = request.into_order(&config.pricing, Utc::now(), || {
        Uuid::new_v4().simple().to_string()
    })?;

    state.orders().append(&order).await?;

    tracing::info!(
        order_id = %order.id,
        status = %order.status,
        total = %order.total,
        "Order placed"
    );
    add_breadcrumb("order", "Order placed", &[("order_id", order.id.as_str())]);

    Ok((StatusCode::CREATED, Json(order)))
}

/// Full order history, oldest first.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.orders().list().await?))
}

/// The order to show on the confirmation page.
#[instrument(skip(state))]
pub async fn last(State(state): State<AppState>) -> Result<Json<Order>> {
    state
        .orders()
        .last()
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("no orders yet".to_string()))
}

/// A single order by ID.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let id = OrderId::new(id);
    state
        .orders()
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}
