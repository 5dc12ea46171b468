//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::document::DataBlob;
use crate::invoice::{ExtractedInvoice, PrivacyAssessment};
use async_trait::async_trait;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (billbook-llm). `media` carries
/// the document the prompt refers to, if any.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::fmt::Display + Send;

    /// Generate text completion
    async fn generate(&self, prompt: &str, media: Option<&DataBlob>) -> Result<String, Self::Error>;

    /// Generate output constrained to a JSON schema (if supported)
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &str,
        media: Option<&DataBlob>,
    ) -> Result<String, Self::Error>;

    /// Model identifier, for logging
    fn model_name(&self) -> &str {
        "llm"
    }
}

/// The external extraction service
///
/// Implemented by the application layer (billbook-extractor). Both
/// operations are independent and may run concurrently for one document.
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    /// Error type for extraction operations
    type Error: std::fmt::Display + Send;

    /// Extract invoice fields and provider contact details
    async fn extract_fields(&self, blob: &DataBlob) -> Result<ExtractedInvoice, Self::Error>;

    /// Decide whether the document carries personal information
    async fn assess_privacy(&self, blob: &DataBlob) -> Result<PrivacyAssessment, Self::Error>;
}
