//! OpenAI-compatible chat completions provider
//!
//! Works with any endpoint that speaks `/chat/completions` (OpenAI, Gemini's
//! OpenAI-compatible endpoint, LiteLLM, vLLM). Images are sent as
//! `image_url` content parts and PDFs as `file` content parts, both carrying
//! the document's data URI.

use crate::{status_error, LlmError};
use async_trait::async_trait;
use billbook_domain::traits::LlmProvider as LlmProviderTrait;
use billbook_domain::{DataBlob, DocumentKind};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default timeout for LLM requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// OpenAI-compatible provider
pub struct OpenAiProvider {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider for `base_url` (e.g. `https://api.openai.com/v1`)
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// Create a provider reading the API key from environment variable `key_var`
    pub fn from_env(
        base_url: impl Into<String>,
        model: impl Into<String>,
        key_var: &str,
    ) -> Result<Self, LlmError> {
        let api_key = std::env::var(key_var).map_err(|_| {
            LlmError::Configuration(format!("{} env var required for this backend", key_var))
        })?;
        Ok(Self::new(base_url, model, api_key))
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Model in use
    pub fn model(&self) -> &str {
        &self.model
    }

    fn content_parts(prompt: &str, media: Option<&DataBlob>) -> Vec<serde_json::Value> {
        let mut parts = vec![json!({ "type": "text", "text": prompt })];
        if let Some(blob) = media {
            let uri = blob.to_data_uri();
            match DocumentKind::from_mime(&blob.mime_type) {
                Some(DocumentKind::Pdf) => parts.push(json!({
                    "type": "file",
                    "file": { "filename": "invoice.pdf", "file_data": uri }
                })),
                _ => parts.push(json!({
                    "type": "image_url",
                    "image_url": { "url": uri }
                })),
            }
        }
        parts
    }

    async fn send(
        &self,
        prompt: &str,
        media: Option<&DataBlob>,
        response_format: Option<serde_json::Value>,
    ) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: Self::content_parts(prompt, media),
            }],
            temperature: 0.0,
            response_format,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, url = %url, "Chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body, &self.model));
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Empty response from LLM".to_string()))
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[async_trait]
impl LlmProviderTrait for OpenAiProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str, media: Option<&DataBlob>) -> Result<String, Self::Error> {
        self.send(prompt, media, None).await
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &str,
        media: Option<&DataBlob>,
    ) -> Result<String, Self::Error> {
        let format = match serde_json::from_str::<serde_json::Value>(schema) {
            Ok(schema) => json!({
                "type": "json_schema",
                "json_schema": { "name": "extraction", "schema": schema }
            }),
            Err(_) => json!({ "type": "json_object" }),
        };
        self.send(prompt, media, Some(format)).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
