//! Billbook Domain Layer
//!
//! Value types and trait interfaces shared by every other Billbook crate.
//! Nothing here performs I/O.
//!
//! ## Key Concepts
//!
//! - **Invoice**: one ingested bill, keyed by an [`InvoiceId`] minted at ingestion
//! - **Provider**: a bill issuer, deduplicated by a case-insensitive [`ProviderKey`]
//! - **SourceDocument**: the uploaded PDF/PNG/JPEG, checked at intake
//! - **DataBlob**: the document encoded as `data:<mime>;base64,<payload>`
//! - **ExtractionClient**: the external service that turns a blob into fields
//!   and a privacy assessment

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod document;
pub mod error;
pub mod ids;
pub mod invoice;
pub mod provider;
pub mod traits;

// Re-exports for convenience
pub use batch::{BatchOutcome, FileExtraction, FileFailure, RejectedFile};
pub use document::{DataBlob, DocumentKind, SourceDocument, MAX_FILE_BYTES};
pub use error::{DataUriError, IntakeError, ValidationError};
pub use ids::{InvoiceId, ProviderId};
pub use invoice::{ExtractedInvoice, ExtractionReport, Invoice, InvoiceEdit, PrivacyAssessment};
pub use provider::{Provider, ProviderDraft, ProviderKey};
