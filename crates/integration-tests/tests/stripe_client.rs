//! Integration tests for the Stripe client against a local stand-in API.
//!
//! A throwaway axum server plays the part of `api.stripe.com` so the real
//! form encoding, auth header, and error parsing are exercised end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Form, Json, Router};
use cookie_haven_core::CurrencyCode;
use cookie_haven_server::config::StripeConfig;
use cookie_haven_server::payment::{
    CheckoutSessionRequest, LineItem, PaymentError, PaymentGateway, SessionMetadata, StripeClient,
};
use secrecy::SecretString;
use serde_json::json;
use url::Url;

const SECRET: &str = "sk_test_51Hq8xZ2eZvKYlo2C9aB3xY9mK2nL5pQ7rT0uW4zC6";

#[derive(Clone, Default)]
struct Captured {
    form: Arc<Mutex<HashMap<String, String>>>,
    auth: Arc<Mutex<Option<String>>>,
}

async fn create_session(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    *captured.auth.lock().expect("lock") = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let currency = form
        .get("line_items[0][price_data][currency]")
        .cloned()
        .unwrap_or_default();
    *captured.form.lock().expect("lock") = form;

    if currency == "php" {
        (
            StatusCode::OK,
            Json(json!({
                "id": "cs_test_a1",
                "object": "checkout.session",
                "url": "https://checkout.stripe.com/c/pay/cs_test_a1"
            })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": {
                    "type": "invalid_request_error",
                    "message": format!("Invalid currency: {currency}")
                }
            })),
        )
    }
}

/// Start the stand-in API and return its base URL.
async fn spawn_stripe(captured: Captured) -> Url {
    let app = Router::new()
        .route("/v1/checkout/sessions", post(create_session))
        .with_state(captured);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    Url::parse(&format!("http://{addr}/")).expect("url")
}

fn session_request(currency: CurrencyCode) -> CheckoutSessionRequest {
    CheckoutSessionRequest::new(
        vec![LineItem {
            currency,
            name: "Choco Chip - Large Box".to_string(),
            description: Some("Large box".to_string()),
            unit_amount: 1250,
            quantity: 2,
        }],
        "https://shop.example.com",
        "juan@example.com",
        SessionMetadata {
            customer_name: "Juan Dela Cruz".to_string(),
            phone: "09171234567".to_string(),
            address: "123 Main Street, Manila".to_string(),
        },
    )
}

fn client(api_base: Url) -> StripeClient {
    StripeClient::new(&StripeConfig {
        secret_key: SecretString::from(SECRET),
        api_base,
    })
    .expect("client")
}

#[tokio::test]
async fn test_creates_session_with_form_body() {
    let captured = Captured::default();
    let base = spawn_stripe(captured.clone()).await;

    let session = client(base)
        .create_checkout_session(&session_request(CurrencyCode::PHP))
        .await
        .expect("session");

    assert_eq!(session.id.as_str(), "cs_test_a1");
    assert_eq!(session.url, "https://checkout.stripe.com/c/pay/cs_test_a1");

    let auth = captured.auth.lock().expect("lock").clone();
    assert_eq!(auth.as_deref(), Some(format!("Bearer {SECRET}").as_str()));

    let form = captured.form.lock().expect("lock").clone();
    assert_eq!(form["mode"], "payment");
    assert_eq!(form["payment_method_types[0]"], "card");
    assert_eq!(form["customer_email"], "juan@example.com");
    assert_eq!(form["metadata[customerName]"], "Juan Dela Cruz");
    assert_eq!(
        form["success_url"],
        "https://shop.example.com/order-confirmation?session_id={CHECKOUT_SESSION_ID}"
    );
    assert_eq!(
        form["line_items[0][price_data][product_data][name]"],
        "Choco Chip - Large Box"
    );
    assert_eq!(form["line_items[0][price_data][unit_amount]"], "1250");
    assert_eq!(form["line_items[0][quantity]"], "2");
}

#[tokio::test]
async fn test_api_error_message_is_surfaced() {
    let base = spawn_stripe(Captured::default()).await;

    let err = client(base)
        .create_checkout_session(&session_request(CurrencyCode::USD))
        .await
        .expect_err("should fail");

    match err {
        PaymentError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid currency: usd");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_api_is_http_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let base = Url::parse(&format!("http://{addr}/")).expect("url");
    let err = client(base)
        .create_checkout_session(&session_request(CurrencyCode::PHP))
        .await
        .expect_err("should fail");

    assert!(matches!(err, PaymentError::Http(_)));
}
