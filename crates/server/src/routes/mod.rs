//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Health payload with timestamp
//! GET  /health                   - Liveness check
//!
//! # Hosted checkout
//! POST /create-checkout-session  - Create a provider checkout session
//!
//! # Orders
//! POST /orders                   - Place an order from the checkout form
//! GET  /orders                   - Order history
//! GET  /orders/last              - Order for the confirmation page
//! GET  /orders/{id}              - Single order
//! ```

pub mod checkout;
pub mod health;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::place))
        .route("/last", get(orders::last))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::status))
        .route("/health", get(health::liveness))
        .route(
            "/create-checkout-session",
            post(checkout::create_checkout_session),
        )
        .nest("/orders", order_routes())
}
