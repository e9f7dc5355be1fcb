/// Payments — Stripe Checkout for the one-time report purchase.
///
/// The service never handles card data. It creates a hosted Checkout session
/// carrying the analysis id in its metadata and learns about the payment from
/// the signed `checkout.session.completed` webhook.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

pub mod handlers;
pub mod webhook;

const STRIPE_CHECKOUT_URL: &str = "https://api.stripe.com/v1/checkout/sessions";

pub const PRODUCT_NAME: &str = "Career Strategy Report";
pub const PRODUCT_DESCRIPTION: &str =
    "Comprehensive Australia vs Korea career analysis with 90-day action plan";
/// Price in the smallest currency unit ($29.00).
pub const PRICE_CENTS: u64 = 2900;
pub const CURRENCY: &str = "usd";

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Stripe API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Stripe returned a session without a checkout URL")]
    MissingUrl,
}

/// Everything needed to open a hosted checkout page for one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub analysis_id: Uuid,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutRequest {
    /// Builds the redirect URLs back to the results page of `analysis_id`.
    pub fn for_analysis(base_url: &str, analysis_id: Uuid) -> Self {
        let results = format!("{}/results/{analysis_id}", base_url.trim_end_matches('/'));
        CheckoutRequest {
            analysis_id,
            success_url: format!("{results}?success=true"),
            cancel_url: format!("{results}?canceled=true"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub session_id: String,
    pub url: String,
}

/// A payment processor able to open checkout sessions.
/// Implement this to swap processors (or fake one in tests) without touching handlers.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Stripe REST client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    secret_key: String,
}

impl StripeClient {
    pub fn new(secret_key: String, timeout: Duration) -> Result<Self, PaymentError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            secret_key,
        })
    }
}

/// Form fields of a one-item Checkout session, in Stripe's bracket notation.
fn checkout_form(request: &CheckoutRequest) -> Vec<(&'static str, String)> {
    vec![
        ("mode", "payment".to_string()),
        ("payment_method_types[0]", "card".to_string()),
        ("line_items[0][quantity]", "1".to_string()),
        ("line_items[0][price_data][currency]", CURRENCY.to_string()),
        (
            "line_items[0][price_data][unit_amount]",
            PRICE_CENTS.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]",
            PRODUCT_NAME.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][description]",
            PRODUCT_DESCRIPTION.to_string(),
        ),
        ("success_url", request.success_url.clone()),
        ("cancel_url", request.cancel_url.clone()),
        ("metadata[analysisId]", request.analysis_id.to_string()),
    ]
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let response = self
            .client
            .post(STRIPE_CHECKOUT_URL)
            .bearer_auth(&self.secret_key)
            .form(&checkout_form(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StripeError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let session: StripeSession = response.json().await?;
        debug!("Stripe session created: {}", session.id);

        Ok(CheckoutSession {
            url: session.url.ok_or(PaymentError::MissingUrl)?,
            session_id: session.id,
        })
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records every request and answers with a deterministic session.
    #[derive(Default)]
    pub struct FakePayments {
        requests: Mutex<Vec<CheckoutRequest>>,
    }

    impl FakePayments {
        pub fn requests(&self) -> Vec<CheckoutRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentProvider for FakePayments {
        async fn create_checkout_session(
            &self,
            request: &CheckoutRequest,
        ) -> Result<CheckoutSession, PaymentError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(CheckoutSession {
                session_id: format!("cs_test_{}", request.analysis_id),
                url: format!("https://checkout.stripe.test/pay/{}", request.analysis_id),
            })
        }
    }

    /// Fails every call like a rejected API key.
    pub struct RejectingPayments;

    #[async_trait]
    impl PaymentProvider for RejectingPayments {
        async fn create_checkout_session(
            &self,
            _request: &CheckoutRequest,
        ) -> Result<CheckoutSession, PaymentError> {
            Err(PaymentError::Api {
                status: 401,
                message: "Invalid API Key provided".to_string(),
            })
        }
    }
}
