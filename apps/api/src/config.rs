use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent or placeholder keys select the offline (template) model provider.
    pub openai_api_key: Option<String>,
    /// Absent means analyses live in process memory only.
    pub database_url: Option<String>,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    /// Base for checkout redirect URLs. Falls back to the request's Host header.
    pub public_base_url: Option<String>,
    pub request_timeout_secs: u64,
    /// Deadline for a single model call. /analyze makes two in a row, so twice
    /// this must stay under the request timeout for the fallback to be served.
    pub llm_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;
        let llm_timeout_secs = optional_env("LLM_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            database_url: optional_env("DATABASE_URL"),
            stripe_secret_key: require_env("STRIPE_SECRET_KEY")?,
            stripe_webhook_secret: require_env("STRIPE_WEBHOOK_SECRET")?,
            public_base_url: optional_env("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            request_timeout_secs,
            llm_timeout: resolve_llm_timeout(request_timeout_secs, llm_timeout_secs)?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Defaults to two fifths of the request timeout.
fn resolve_llm_timeout(request_timeout_secs: u64, configured: Option<u64>) -> Result<Duration> {
    if request_timeout_secs == 0 {
        bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
    }
    match configured {
        None => Ok(Duration::from_secs(request_timeout_secs) * 2 / 5),
        Some(0) => bail!("LLM_TIMEOUT_SECS must be greater than zero"),
        Some(secs) if secs.saturating_mul(2) >= request_timeout_secs => bail!(
            "LLM_TIMEOUT_SECS ({secs}) must be less than half of REQUEST_TIMEOUT_SECS ({request_timeout_secs})"
        ),
        Some(secs) => Ok(Duration::from_secs(secs)),
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
