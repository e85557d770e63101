/// LLM Client: the single point of entry for all generative-text API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Everything goes through a `TextGenerator`, which `AppState` carries as
/// `Arc<dyn TextGenerator>` so tests can substitute a recording double.
///
/// Calls are never retried: the first failure propagates to the caller.
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Credential rejected: {0}")]
    Authentication(String),

    #[error("Service unavailable (status {status}): {message}")]
    Unavailable { status: u16, message: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A generative-text backend. `context` items are submitted together as the
/// context of a single completion, in order.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, context: &[&str]) -> Result<String, LlmError>;

    /// Model identifier, for logs and responses.
    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

/// Gemini `generateContent` client. Built once at startup and shared immutably.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, api_base: &str) -> Result<Self, LlmError> {
        let client = Client::builder()
            .user_agent(concat!("resumeats-api/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let endpoint = format!("{api_base}/models/{model}:generateContent");

        Ok(Self {
            client,
            api_key,
            model,
            endpoint,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        Self::new(
            config.google_api_key.clone(),
            config.gemini_model.clone(),
            &config.gemini_api_base,
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, context: &[&str]) -> Result<String, LlmError> {
        let request_body = build_request(context);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {}", status);
            return Err(classify_failure(status, &body));
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        match parsed.text() {
            Some(text) => Ok(text),
            None => {
                let reason = parsed
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.as_deref())
                    .unwrap_or("no candidates");
                warn!("Gemini returned no text (finish reason: {reason})");
                Err(LlmError::EmptyContent)
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn build_request<'a>(context: &[&'a str]) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: context.iter().map(|&text| Part { text }).collect(),
        }],
    }
}

/// Maps a non-success response onto the error taxonomy. Gemini reports a bad key
/// as 400 with reason `API_KEY_INVALID`, so the body is inspected as well as the
/// status.
fn classify_failure(status: StatusCode, body: &str) -> LlmError {
    let parsed = serde_json::from_str::<GeminiError>(body).ok();
    let message = parsed
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    let names_api_key = parsed.as_ref().is_some_and(|e| {
        e.error
            .details
            .iter()
            .any(|d| d.get("reason").and_then(|r| r.as_str()) == Some("API_KEY_INVALID"))
    }) || message.to_lowercase().contains("api key");

    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || (status == StatusCode::BAD_REQUEST && names_api_key)
    {
        return LlmError::Authentication(message);
    }

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        return LlmError::Unavailable {
            status: status.as_u16(),
            message,
        };
    }

    LlmError::Api {
        status: status.as_u16(),
        message,
    }
}
