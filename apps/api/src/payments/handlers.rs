use axum::{
    extract::State,
    http::{header::HOST, HeaderMap},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::lifecycle::{complete_paid_analysis, PaidOutcome};
use crate::errors::AppError;
use crate::payments::webhook::{
    verify_signature, WebhookEvent, CHECKOUT_COMPLETED, SIGNATURE_HEADER,
    SIGNATURE_TOLERANCE_SECS,
};
use crate::payments::{CheckoutRequest, CheckoutSession};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    #[serde(default)]
    pub analysis_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// POST /checkout
pub async fn handle_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CheckoutBody>,
) -> Result<Json<CheckoutSession>, AppError> {
    let analysis_id = body
        .analysis_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("Analysis ID is required".to_string()))?;
    // Redirect URLs are built from the parsed id, never the raw input.
    let analysis_id = Uuid::parse_str(analysis_id)
        .map_err(|_| AppError::Validation("Analysis ID must be a valid UUID".to_string()))?;

    let base_url = base_url(state.config.public_base_url.as_deref(), &headers)?;
    info!("Creating checkout session for analysis {analysis_id} (base: {base_url})");

    let request = CheckoutRequest::for_analysis(&base_url, analysis_id);
    let session = state
        .payments
        .create_checkout_session(&request)
        .await
        .map_err(|e| AppError::Payment(e.to_string()))?;

    info!("Checkout session {} created", session.session_id);
    Ok(Json(session))
}

/// Configured public URL, else `{scheme}://{Host}` (plain http for localhost).
fn base_url(configured: Option<&str>, headers: &HeaderMap) -> Result<String, AppError> {
    if let Some(url) = configured {
        return Ok(url.trim_end_matches('/').to_string());
    }

    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| {
            AppError::Validation("Host header is required to build redirect URLs".to_string())
        })?;
    let scheme = if host.contains("localhost") {
        "http"
    } else {
        "https"
    };
    Ok(format!("{scheme}://{host}"))
}

/// POST /webhook
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Validation("No signature".to_string()))?;

    verify_signature(
        &body,
        signature,
        &state.config.stripe_webhook_secret,
        Utc::now().timestamp(),
        SIGNATURE_TOLERANCE_SECS,
    )
    .map_err(|e| AppError::Payment(format!("Webhook signature verification failed: {e}")))?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::Payment(format!("Invalid webhook payload: {e}")))?;

    if event.event_type != CHECKOUT_COMPLETED {
        info!("Ignoring webhook event {}", event.event_type);
        return Ok(Json(WebhookAck { received: true }));
    }

    let Some(analysis_id) = event.analysis_id() else {
        warn!(
            "Checkout session {:?} completed without an analysisId",
            event.data.object.id
        );
        return Err(AppError::Validation("No analysisId".to_string()));
    };

    let id = Uuid::parse_str(analysis_id)
        .map_err(|_| AppError::NotFound("Analysis not found".to_string()))?;

    match complete_paid_analysis(state.store.as_ref(), &state.llm, id).await? {
        PaidOutcome::Completed => info!("Analysis {id} unlocked"),
        PaidOutcome::AlreadyComplete => info!("Analysis {id} was already unlocked"),
    }

    Ok(Json(WebhookAck { received: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn host(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_base_url_prefers_configured() {
        let url = base_url(Some("https://careermap.example/"), &host("localhost:3000")).unwrap();
        assert_eq!(url, "https://careermap.example");
    }

    #[test]
    fn test_base_url_localhost_is_http() {
        let url = base_url(None, &host("localhost:3000")).unwrap();
        assert_eq!(url, "http://localhost:3000");
    }

    #[test]
    fn test_base_url_other_hosts_are_https() {
        let url = base_url(None, &host("careermap.example")).unwrap();
        assert_eq!(url, "https://careermap.example");
    }

    #[test]
    fn test_base_url_without_host_is_rejected() {
        let result = base_url(None, &HeaderMap::new());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
