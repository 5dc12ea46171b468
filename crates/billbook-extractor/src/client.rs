//! Extraction client backed by an LLM provider

use crate::error::ExtractorError;
use crate::parser::{parse_fields, parse_privacy};
use crate::prompt::{ExtractionTask, PromptBuilder};
use async_trait::async_trait;
use billbook_domain::traits::{ExtractionClient, LlmProvider};
use billbook_domain::{DataBlob, DocumentKind, ExtractedInvoice, PrivacyAssessment};
use tracing::debug;

/// Runs both extraction operations as structured LLM calls
///
/// The document is attached as media; the prompt carries only the
/// instructions and the response schema.
pub struct LlmExtractionClient<L: LlmProvider> {
    llm_provider: L,
}

impl<L: LlmProvider> LlmExtractionClient<L> {
    /// Wrap an LLM provider
    pub fn new(llm_provider: L) -> Self {
        Self { llm_provider }
    }

    /// The wrapped provider
    pub fn provider(&self) -> &L {
        &self.llm_provider
    }

    async fn call_llm(&self, task: ExtractionTask, blob: &DataBlob) -> Result<String, ExtractorError> {
        let kind = DocumentKind::from_mime(&blob.mime_type).ok_or_else(|| {
            ExtractorError::InvalidFormat(format!("Unsupported document type: {}", blob.mime_type))
        })?;
        let prompt = PromptBuilder::new(task, kind).build();

        debug!(
            model = self.llm_provider.model_name(),
            ?task,
            prompt_len = prompt.len(),
            "Calling LLM"
        );

        let response = self
            .llm_provider
            .generate_structured(&prompt, task.schema(), Some(blob))
            .await
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!(?task, response_len = response.len(), "LLM responded");
        Ok(response)
    }
}

#[async_trait]
impl<L: LlmProvider> ExtractionClient for LlmExtractionClient<L> {
    type Error = ExtractorError;

    async fn extract_fields(&self, blob: &DataBlob) -> Result<ExtractedInvoice, Self::Error> {
        let response = self.call_llm(ExtractionTask::Fields, blob).await?;
        parse_fields(&response)
    }

    async fn assess_privacy(&self, blob: &DataBlob) -> Result<PrivacyAssessment, Self::Error> {
        let response = self.call_llm(ExtractionTask::Privacy, blob).await?;
        parse_privacy(&response)
    }
}
