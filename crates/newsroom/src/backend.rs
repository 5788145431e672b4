//! Headline backends.
//!
//! [`HeadlineGenerator`] is the seam the desk talks through. The concrete
//! HTTP backends are dispatched through the [`LlmBackend`] enum; tests and
//! hosts can plug in their own generator instead.

use std::future::Future;

use crate::config::{BackendKind, NewsroomConfig};
use crate::error::NewsroomError;

/// Something that turns a prompt into raw headline text.
pub trait HeadlineGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, NewsroomError>> + Send;
}

/// A configured headline backend.
pub enum LlmBackend {
    /// Google Gemini `generateContent`.
    Gemini(GeminiBackend),
    /// OpenAI-compatible chat completions.
    OpenAi(OpenAiBackend),
    /// No network access; every request fails with [`NewsroomError::Offline`].
    Offline,
}

impl LlmBackend {
    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::Gemini(_) => "gemini",
            Self::OpenAi(_) => "openai-compatible",
            Self::Offline => "offline",
        }
    }
}

impl HeadlineGenerator for LlmBackend {
    async fn generate(&self, prompt: &str) -> Result<String, NewsroomError> {
        match self {
            Self::Gemini(backend) => backend.complete(prompt).await,
            Self::OpenAi(backend) => backend.complete(prompt).await,
            Self::Offline => Err(NewsroomError::Offline),
        }
    }
}

/// Posts `body` as JSON and returns the parsed response, mapping transport
/// and status failures.
async fn post_json(
    request: reqwest::RequestBuilder,
    body: &serde_json::Value,
) -> Result<serde_json::Value, NewsroomError> {
    let response = request
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await
        .map_err(|e| NewsroomError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error body".to_owned());
        return Err(NewsroomError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| NewsroomError::Parse(e.to_string()))
}

/// Backend for the Gemini `generateContent` REST API.
///
/// Sends requests to `{api_url}/models/{model}:generateContent` with the key
/// in the `x-goog-api-key` header.
pub struct GeminiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(config: &NewsroomConfig, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key,
            model: config.model.clone(),
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, NewsroomError> {
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);
        let body = serde_json::json!({
            "contents": [
                {"parts": [{"text": prompt}]}
            ]
        });

        let request = self.client.post(&url).header("x-goog-api-key", &self.api_key);
        let json = post_json(request, &body).await?;
        extract_gemini_content(&json)
    }
}

/// Extract the text from a Gemini `generateContent` response.
fn extract_gemini_content(json: &serde_json::Value) -> Result<String, NewsroomError> {
    json.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            NewsroomError::Parse(
                "Gemini response missing candidates[0].content.parts[0].text".to_owned(),
            )
        })
}

/// Backend for OpenAI-compatible chat completions APIs.
///
/// Sends requests to `{api_url}/chat/completions`.
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    pub fn new(config: &NewsroomConfig, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key,
            model: config.model.clone(),
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, NewsroomError> {
        let url = format!("{}/chat/completions", self.api_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "temperature": 0.9,
            "max_tokens": 128
        });

        let request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key));
        let json = post_json(request, &body).await?;
        extract_openai_content(&json)
    }
}

/// Extract the text from an OpenAI chat completions response.
fn extract_openai_content(json: &serde_json::Value) -> Result<String, NewsroomError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            NewsroomError::Parse("OpenAI response missing choices[0].message.content".to_owned())
        })
}

/// Create a headline backend from configuration.
///
/// Networked backends need an API key; without one the backend is offline.
pub fn create_backend(config: &NewsroomConfig, api_key: Option<String>) -> LlmBackend {
    let backend = match (config.effective_backend(api_key.as_deref()), api_key) {
        (BackendKind::Gemini, Some(key)) => LlmBackend::Gemini(GeminiBackend::new(config, key)),
        (BackendKind::OpenAi, Some(key)) => LlmBackend::OpenAi(OpenAiBackend::new(config, key)),
        _ => LlmBackend::Offline,
    };
    tracing::info!(backend = backend.name(), model = %config.model, "headline backend ready");
    backend
}
