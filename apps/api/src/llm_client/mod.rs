/// LLM Client — the single point of entry for all model calls in the service.
///
/// ARCHITECTURAL RULE: No other module may call the model API directly.
/// Components receive a `ModelProvider` resolved once at startup and use
/// `request_json` to turn a prompt into a typed value.
///
/// Model: gpt-4o (hardcoded — do not make configurable to prevent drift)
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for all LLM calls.
pub const MODEL: &str = "gpt-4o";

/// Substrings that mark a key copied from `.env.example` rather than a real credential.
const PLACEHOLDER_MARKERS: &[&str] = &["your_openai_api_key", "placeholder"];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("No model credential configured")]
    Unconfigured,

    #[error("LLM call exceeded its {0:?} deadline")]
    Timeout(Duration),
}

/// One prompt-and-parse exchange. The backend must answer with a single JSON object.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
}

/// A model backend able to answer a `CompletionRequest` with raw JSON text.
/// Implement this to swap providers without touching the parser, scorer or generator.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// OpenAI Chat Completions backend in JSON-object response mode.
/// One HTTP request per call; there is no retry loop.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
        })
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt,
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;
        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

/// Bounds every call of the wrapped backend by a fixed deadline.
/// The deadline must be shorter than the request timeout for fallbacks to be served.
pub struct TimedBackend<B> {
    inner: B,
    deadline: Duration,
}

impl<B> TimedBackend<B> {
    pub fn new(inner: B, deadline: Duration) -> Self {
        Self { inner, deadline }
    }
}

#[async_trait]
impl<B: CompletionBackend> CompletionBackend for TimedBackend<B> {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        tokio::time::timeout(self.deadline, self.inner.complete(request))
            .await
            .map_err(|_| LlmError::Timeout(self.deadline))?
    }
}

/// The model strategy chosen once at process startup.
///
/// `Offline` means no usable credential: every request fails fast with
/// `LlmError::Unconfigured` and callers take their deterministic fallback paths.
#[derive(Clone)]
pub enum ModelProvider {
    Remote(Arc<dyn CompletionBackend>),
    Offline,
}

impl ModelProvider {
    /// Resolves the provider from the configured API key.
    /// `call_timeout` bounds each model call, not the whole request.
    pub fn from_api_key(api_key: Option<&str>, call_timeout: Duration) -> Result<Self, LlmError> {
        match api_key {
            Some(key) if is_real_credential(key) => {
                let client = LlmClient::new(key.to_string(), call_timeout)?;
                Ok(ModelProvider::Remote(Arc::new(TimedBackend::new(
                    client,
                    call_timeout,
                ))))
            }
            _ => Ok(ModelProvider::Offline),
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, ModelProvider::Offline)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelProvider::Remote(_) => "remote",
            ModelProvider::Offline => "offline",
        }
    }

    /// Sends the request and deserializes the answer strictly as `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<T, LlmError> {
        let backend = match self {
            ModelProvider::Remote(backend) => backend,
            ModelProvider::Offline => return Err(LlmError::Unconfigured),
        };

        let text = backend.complete(request).await?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

fn is_real_credential(key: &str) -> bool {
    let key = key.trim();
    if key.is_empty() {
        return false;
    }
    let lower = key.to_lowercase();
    !PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m))
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{DownBackend, SlowBackend, StaticBackend};
    use super::*;

    const REQUEST: CompletionRequest<'static> = CompletionRequest {
        system: "system",
        prompt: "prompt",
        temperature: 0.3,
    };

    #[derive(Debug, Deserialize)]
    struct Reply {
        key: String,
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_placeholder_keys_select_offline() {
        let timeout = Duration::from_secs(5);
        for key in [None, Some(""), Some("   "), Some("your_openai_api_key_here"), Some("PLACEHOLDER")] {
            let provider = ModelProvider::from_api_key(key, timeout).unwrap();
            assert!(provider.is_offline(), "{key:?} should be offline");
        }
    }

    #[test]
    fn test_real_key_selects_remote() {
        let provider =
            ModelProvider::from_api_key(Some("sk-proj-abc123"), Duration::from_secs(5)).unwrap();
        assert_eq!(provider.label(), "remote");
    }

    #[tokio::test]
    async fn test_offline_request_is_unconfigured() {
        let result = ModelProvider::Offline.request_json::<Reply>(&REQUEST).await;
        assert!(matches!(result, Err(LlmError::Unconfigured)));
    }

    #[tokio::test]
    async fn test_request_json_parses_fenced_reply() {
        let (provider, backend) = StaticBackend::provider("```json\n{\"key\": \"v\"}\n```");
        let reply: Reply = provider.request_json(&REQUEST).await.unwrap();
        assert_eq!(reply.key, "v");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_request_json_rejects_malformed_reply() {
        let (provider, _) = StaticBackend::provider("not json at all");
        let result = provider.request_json::<Reply>(&REQUEST).await;
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_slow_backend_hits_call_deadline() {
        let backend = TimedBackend::new(
            SlowBackend(Duration::from_secs(30)),
            Duration::from_millis(20),
        );
        let provider = ModelProvider::Remote(Arc::new(backend));
        let result = provider.request_json::<serde_json::Value>(&REQUEST).await;
        assert!(matches!(result, Err(LlmError::Timeout(d)) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn test_fast_backend_passes_through_deadline() {
        let provider = ModelProvider::Remote(Arc::new(TimedBackend::new(
            SlowBackend(Duration::ZERO),
            Duration::from_secs(5),
        )));
        let value: serde_json::Value = provider.request_json(&REQUEST).await.unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let provider = ModelProvider::Remote(Arc::new(DownBackend));
        let result = provider.request_json::<Reply>(&REQUEST).await;
        assert!(matches!(result, Err(LlmError::Api { status: 503, .. })));
    }
}
