//! Integration tests for Cookie Haven.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cookie-haven-integration-tests
//! ```
//!
//! Tests drive the real router in-process with `tower::ServiceExt::oneshot`.
//! The payment gateway is replaced by [`FakeGateway`] and order history
//! lives in a temporary directory, so no network or credentials are needed.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use cookie_haven_core::{CheckoutSessionId, CurrencyCode, PricingPolicy};
use cookie_haven_server::config::{ServerConfig, StripeConfig};
use cookie_haven_server::payment::{
    CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentGateway,
};
use cookie_haven_server::state::AppState;
use cookie_haven_server::store::OrderStore;
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use url::Url;

/// Public web app URL used in test configuration.
pub const APP_URL: &str = "https://cookie-haven-app.netlify.app";

/// Server configuration for tests: zero payment delay, default pricing.
///
/// # Panics
///
/// Panics if a hard-coded URL fails to parse.
#[must_use]
pub fn test_config(data_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        app_url: Url::parse(APP_URL).expect("valid app url"),
        default_origin: ServerConfig::DEFAULT_ORIGIN.to_string(),
        data_dir: data_dir.to_path_buf(),
        currency: CurrencyCode::PHP,
        pricing: PricingPolicy::default(),
        payment_delay: Duration::ZERO,
        stripe: StripeConfig {
            secret_key: SecretString::from("sk_test_51Hq8xZ2eZvKYlo2C9aB3xY9mK2nL5pQ7rT0uW4zC6"),
            api_base: Url::parse(StripeConfig::DEFAULT_API_BASE).expect("valid api base"),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Records session requests and answers with a canned session or error.
#[derive(Default)]
pub struct FakeGateway {
    requests: Mutex<Vec<CheckoutSessionRequest>>,
    failure: Option<String>,
}

impl FakeGateway {
    /// A gateway whose every call fails with `message`.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            requests: Mutex::default(),
            failure: Some(message.to_string()),
        }
    }

    /// Requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<CheckoutSessionRequest> {
        self.requests.lock().expect("gateway lock").clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let count = {
            let mut requests = self.requests.lock().expect("gateway lock");
            requests.push(request.clone());
            requests.len()
        };

        if let Some(message) = &self.failure {
            return Err(PaymentError::Api {
                status: 400,
                message: message.clone(),
            });
        }

        Ok(CheckoutSession {
            id: CheckoutSessionId::new(format!("cs_test_{count}")),
            url: format!("https://checkout.stripe.com/c/pay/cs_test_{count}"),
        })
    }
}

/// A router wired to a fake gateway and a temporary order store.
pub struct TestApp {
    pub router: Router,
    pub gateway: Arc<FakeGateway>,
    pub dir: TempDir,
}

/// A decoded response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// Build an app with a succeeding gateway.
    pub async fn new() -> Self {
        Self::with_gateway(FakeGateway::default()).await
    }

    /// Build an app around `gateway`.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or store cannot be created.
    pub async fn with_gateway(gateway: FakeGateway) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = test_config(dir.path());
        let orders = OrderStore::open(dir.path()).await.expect("order store");
        let gateway = Arc::new(gateway);
        let state = AppState::with_parts(config, gateway.clone(), orders);

        Self {
            router: cookie_haven_server::app(state),
            gateway,
            dir,
        }
    }

    /// Send a request through the router and decode the body.
    ///
    /// Non-JSON bodies are returned as a JSON string.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body cannot be read.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("response body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// `GET path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::get(path).body(Body::empty()).expect("request");
        self.send(request).await
    }

    /// `POST path` with a JSON body and optional `Origin` header.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn post_json(&self, path: &str, body: &Value, origin: Option<&str>) -> TestResponse {
        self.post_raw(path, body.to_string(), origin).await
    }

    /// `POST path` with a raw body labelled as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn post_raw(&self, path: &str, body: String, origin: Option<&str>) -> TestResponse {
        let mut builder = Request::post(path).header(header::CONTENT_TYPE, "application/json");
        if let Some(origin) = origin {
            builder = builder.header(header::ORIGIN, origin);
        }
        self.send(builder.body(Body::from(body)).expect("request"))
            .await
    }
}

/// Two cart lines: 2 × Choco Chip (large, 5.00) and 1 × Oatmeal (3.50).
#[must_use]
pub fn sample_cart() -> Value {
    json!([
        {
            "product": { "id": 1, "name": "Choco Chip", "price": 5.0, "image": "/img/choco.png" },
            "quantity": 2,
            "boxSize": "large"
        },
        {
            "product": { "id": "2", "name": "Oatmeal", "price": "3.50" },
            "quantity": 1
        }
    ])
}

/// A complete, valid shipping section.
#[must_use]
pub fn sample_shipping() -> Value {
    json!({
        "firstName": "Juan",
        "lastName": "Dela Cruz",
        "email": "juan@example.com",
        "phone": "09171234567",
        "address": "123 Main Street",
        "city": "Manila",
        "state": "Metro Manila",
        "zipCode": "1000",
        "country": "Philippines"
    })
}

/// A complete, valid card payment section.
#[must_use]
pub fn sample_card_payment() -> Value {
    json!({
        "paymentMethod": "card",
        "cardNumber": "4242 4242 4242 4242",
        "cardName": "Juan Dela Cruz",
        "expiryDate": "12/29",
        "cvv": "123"
    })
}
