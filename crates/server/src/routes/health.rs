//! Health check handlers.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Message reported by the root health check.
pub const HEALTH_MESSAGE: &str = "Cookie Haven Stripe Server is running!";

/// Root health payload.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Root health check with a timestamp, polled by the web client.
pub async fn status() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        message: HEALTH_MESSAGE,
        timestamp: Utc::now(),
    })
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn liveness() -> &'static str {
    "ok"
}
