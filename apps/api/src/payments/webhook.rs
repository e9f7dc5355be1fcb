//! Stripe webhook verification and event decoding.
//!
//! Header format: `Stripe-Signature: t=<unix seconds>,v1=<hex>[,v1=<hex>...]`.
//! Each `v1` is HMAC-SHA256 over `"{t}.{raw body}"` keyed by the endpoint secret.
//! Any matching `v1` passes; the timestamp must be within the tolerance of now.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "stripe-signature";
/// Maximum age (and clock skew) accepted for a signed payload.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature header is malformed")]
    Malformed,

    #[error("signature header has no v1 signature")]
    NoSignatures,

    #[error("timestamp is outside the tolerance window")]
    Expired,

    #[error("no signature matches the payload")]
    Mismatch,

    #[error("webhook secret is unusable")]
    InvalidSecret,
}

/// Verifies `header` against `payload` at time `now` (unix seconds).
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
    tolerance_secs: i64,
) -> Result<(), SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse::<i64>().ok(),
            "v1" => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if signatures.is_empty() {
        return Err(SignatureError::NoSignatures);
    }
    if now.abs_diff(timestamp) > tolerance_secs.unsigned_abs() {
        return Err(SignatureError::Expired);
    }

    let matched = signatures.iter().any(|candidate| {
        let Ok(expected) = hex::decode(candidate) else {
            return false;
        };
        signed_mac(secret, timestamp, payload)
            .map(|mac| mac.verify_slice(&expected).is_ok())
            .unwrap_or(false)
    });

    if matched {
        Ok(())
    } else {
        // Surface a bad key separately from a bad signature.
        signed_mac(secret, timestamp, payload)?;
        Err(SignatureError::Mismatch)
    }
}

fn signed_mac(secret: &str, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::InvalidSecret)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Produces a header value for `payload`, as Stripe would send it.
#[cfg(test)]
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mac = signed_mac(secret, timestamp, payload).unwrap();
    format!(
        "t={timestamp},v1={}",
        hex::encode(mac.finalize().into_bytes())
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Event payload
// ────────────────────────────────────────────────────────────────────────────

/// The subset of a Stripe event this service reads.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Deserialize)]
pub struct EventData {
    pub object: EventObject,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventObject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl WebhookEvent {
    /// The `analysisId` carried in the session metadata, if present and non-blank.
    pub fn analysis_id(&self) -> Option<&str> {
        self.data
            .object
            .metadata
            .as_ref()?
            .get("analysisId")?
            .as_str()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
