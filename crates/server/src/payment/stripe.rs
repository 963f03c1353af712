//! Stripe Checkout Sessions API client.
//!
//! Stripe takes form-encoded bodies with bracketed keys
//! (`line_items[0][price_data][currency]=php`), so requests are flattened
//! into key/value pairs rather than sent as JSON.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use url::Url;

use super::{CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentGateway};
use crate::config::StripeConfig;

/// Path of the session-creation endpoint, relative to the API base.
const SESSIONS_PATH: &str = "v1/checkout/sessions";

/// Stripe error envelope: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Stripe API client for hosted checkout.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    sessions_url: Url,
}

impl StripeClient {
    /// Create a new Stripe API client.
    ///
    /// # Errors
    ///
    /// Returns error if the API base is not a valid base URL or the HTTP
    /// client fails to build.
    pub fn new(config: &StripeConfig) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        let mut auth = HeaderValue::from_str(&auth_value)
            .map_err(|e| PaymentError::Parse(format!("Invalid API key format: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let sessions_url = config
            .api_base
            .join(SESSIONS_PATH)
            .map_err(|e| PaymentError::Parse(format!("Invalid API base: {e}")))?;

        Ok(Self {
            client,
            sessions_url,
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let response = self
            .client
            .post(self.sessions_url.clone())
            .form(&form_fields(request))
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<CheckoutSession>()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))
    }
}

/// Flatten a session request into Stripe's bracketed form fields.
fn form_fields(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut fields = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
        ("customer_email".to_string(), request.customer_email.clone()),
        (
            "metadata[customerName]".to_string(),
            request.metadata.customer_name.clone(),
        ),
        ("metadata[phone]".to_string(), request.metadata.phone.clone()),
        (
            "metadata[address]".to_string(),
            request.metadata.address.clone(),
        ),
    ];

    for (i, item) in request.line_items.iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        fields.push((
            format!("{prefix}[price_data][currency]"),
            item.currency.code().to_string(),
        ));
        fields.push((
            format!("{prefix}[price_data][product_data][name]"),
            item.name.clone(),
        ));
        if let Some(description) = &item.description {
            fields.push((
                format!("{prefix}[price_data][product_data][description]"),
                description.clone(),
            ));
        }
        fields.push((
            format!("{prefix}[price_data][unit_amount]"),
            item.unit_amount.to_string(),
        ));
        fields.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
    }

    fields
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cookie_haven_core::CurrencyCode;
    use secrecy::SecretString;

    use super::*;
    use crate::payment::{LineItem, SessionMetadata};

    fn field<'a>(fields: &'a [(String, String)], key: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn request() -> CheckoutSessionRequest {
        CheckoutSessionRequest::new(
            vec![
                LineItem {
                    currency: CurrencyCode::PHP,
                    name: "Choco Chip - Large Box".to_string(),
                    description: Some("Large box".to_string()),
                    unit_amount: 1250,
                    quantity: 2,
                },
                LineItem {
                    currency: CurrencyCode::PHP,
                    name: "Shipping".to_string(),
                    description: None,
                    unit_amount: 499,
                    quantity: 1,
                },
            ],
            "http://localhost:5173",
            "juan@example.com",
            SessionMetadata {
                customer_name: "Juan Dela Cruz".to_string(),
                phone: "09171234567".to_string(),
                address: "123 Main Street, Manila".to_string(),
            },
        )
    }

    #[test]
    fn test_form_fields_session_settings() {
        let fields = form_fields(&request());

        assert_eq!(field(&fields, "mode"), Some("payment"));
        assert_eq!(field(&fields, "payment_method_types[0]"), Some("card"));
        assert_eq!(field(&fields, "customer_email"), Some("juan@example.com"));
        assert_eq!(
            field(&fields, "metadata[customerName]"),
            Some("Juan Dela Cruz")
        );
        assert_eq!(
            field(&fields, "cancel_url"),
            Some("http://localhost:5173/checkout")
        );
    }

    #[test]
    fn test_form_fields_line_items() {
        let fields = form_fields(&request());

        assert_eq!(
            field(&fields, "line_items[0][price_data][currency]"),
            Some("php")
        );
        assert_eq!(
            field(&fields, "line_items[0][price_data][product_data][name]"),
            Some("Choco Chip - Large Box")
        );
        assert_eq!(
            field(&fields, "line_items[0][price_data][unit_amount]"),
            Some("1250")
        );
        assert_eq!(field(&fields, "line_items[0][quantity]"), Some("2"));
        assert_eq!(
            field(&fields, "line_items[1][price_data][product_data][description]"),
            None
        );
    }

    #[test]
    fn test_sessions_url_joins_api_base() {
        let client = StripeClient::new(&StripeConfig {
            secret_key: SecretString::from("sk_test_51Hq8xZ2eZvKYlo2C9aB3xY9mK2nL5pQ7rT0uW4zC6"),
            api_base: Url::parse("http://127.0.0.1:12111/").unwrap(),
        })
        .unwrap();

        assert_eq!(
            client.sessions_url.as_str(),
            "http://127.0.0.1:12111/v1/checkout/sessions"
        );
    }
}
