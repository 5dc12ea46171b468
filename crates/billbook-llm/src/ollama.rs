//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API, for running a
//! vision-capable model (e.g. `llava`, `llama3.2-vision`) without sending
//! bills to a hosted service.
//!
//! # Features
//!
//! - Async HTTP communication with Ollama API
//! - Image attachments via the `images` field
//! - JSON-schema constrained output via the `format` field
//! - Timeout handling
//!
//! Ollama cannot read PDFs directly; PDF documents are refused with
//! [`LlmError::UnsupportedMedia`].
//!
//! # Examples
//!
//! ```no_run
//! use billbook_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.2-vision");
//! ```

use crate::{status_error, LlmError};
use async_trait::async_trait;
use billbook_domain::traits::LlmProvider as LlmProviderTrait;
use billbook_domain::{DataBlob, DocumentKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for LLM requests (120 seconds; vision models are slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Ollama API provider for local LLM inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<serde_json::Value>,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llava", "llama3.2-vision")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// Create a new Ollama provider against `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
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

    /// Endpoint in use
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one generate request
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the attached document is a PDF
    /// - Ollama is not running or the network fails
    /// - the model is not available
    /// - the response body is not the expected shape
    async fn send(
        &self,
        prompt: &str,
        media: Option<&DataBlob>,
        format: Option<serde_json::Value>,
    ) -> Result<String, LlmError> {
        let images = match media {
            Some(blob) => {
                if !DocumentKind::from_mime(&blob.mime_type).is_some_and(|k| k.is_image()) {
                    return Err(LlmError::UnsupportedMedia(format!(
                        "Ollama accepts images only, got {}",
                        blob.mime_type
                    )));
                }
                vec![blob.base64_payload.as_str()]
            }
            None => Vec::new(),
        };

        let url = format!("{}/api/generate", self.endpoint);
        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            images,
            format,
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Ollama generate");

        let response = self.client.post(&url).json(&request_body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(status, body, &self.model));
        }

        let ollama_response: OllamaGenerateResponse = response.json().await?;
        Ok(ollama_response.response)
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[async_trait]
impl LlmProviderTrait for OllamaProvider {
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
        // Ollama takes either a full JSON schema or the plain "json" mode
        let format = serde_json::from_str::<serde_json::Value>(schema)
            .unwrap_or_else(|_| serde_json::Value::String("json".to_string()));
        self.send(prompt, media, Some(format)).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
