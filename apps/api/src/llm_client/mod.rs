//! LLM client: the single point of entry for all Gemini API calls in ATS Radar.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! Handlers depend on the `AiGateway` trait, carried in `AppState` as
//! `Arc<dyn AiGateway>`, so the model can be swapped out in tests.
//!
//! Calls are single round trips: no retries, no streaming.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

pub mod prompts;
pub mod types;

use types::{Content, GeminiError, GenerateContentRequest, GenerateContentResponse, InlineData, Part};

/// The model used for all completions.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.5-flash";
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A binary attachment sent alongside the prompt in the same call.
#[derive(Debug, Clone)]
pub struct Document {
    pub mime_type: String,
    pub bytes: Bytes,
}

impl Document {
    pub fn pdf(bytes: Bytes) -> Self {
        Self {
            mime_type: "application/pdf".to_string(),
            bytes,
        }
    }
}

/// A black-box text completion oracle.
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Sends `prompt` (and `document`, if any) and returns the model's raw text.
    async fn complete(&self, prompt: &str, document: Option<&Document>)
        -> Result<String, LlmError>;
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(api_key: String, api_base: &str) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key,
            endpoint: generate_content_url(api_base, MODEL),
        })
    }
}

fn generate_content_url(api_base: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{model}:generateContent",
        api_base.trim_end_matches('/')
    )
}

/// Builds the request body. The document, when present, precedes the prompt.
fn build_request(prompt: &str, document: Option<&Document>) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(2);
    if let Some(doc) = document {
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: doc.mime_type.clone(),
                data: STANDARD.encode(&doc.bytes),
            },
        });
    }
    parts.push(Part::Text {
        text: prompt.to_string(),
    });

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
    }
}

#[async_trait]
impl AiGateway for GeminiClient {
    async fn complete(
        &self,
        prompt: &str,
        document: Option<&Document>,
    ) -> Result<String, LlmError> {
        let request_body = build_request(prompt, document);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Try to parse error message
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        let text = parsed.text().ok_or(LlmError::EmptyContent)?;

        debug!(
            "LLM call succeeded: prompt_chars={}, reply_chars={}, attachment={}",
            prompt.len(),
            text.len(),
            document.is_some()
        );

        Ok(text)
    }
}
