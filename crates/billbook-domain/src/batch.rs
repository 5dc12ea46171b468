//! Per-file and per-batch ingestion results

use crate::document::SourceDocument;
use crate::error::IntakeError;
use crate::ids::{InvoiceId, ProviderId};
use crate::invoice::ExtractionReport;

/// Outcome of running both extraction operations on one document
///
/// Produced by the fan-out step, consumed by the single-writer merge.
#[derive(Debug, Clone)]
pub struct FileExtraction {
    /// The document that was submitted
    pub document: SourceDocument,
    /// Both results, or the error text of whichever call failed first
    pub result: Result<ExtractionReport, String>,
}

impl FileExtraction {
    /// Successful extraction
    pub fn succeeded(document: SourceDocument, report: ExtractionReport) -> Self {
        Self {
            document,
            result: Ok(report),
        }
    }

    /// Failed extraction
    pub fn failed(document: SourceDocument, error: impl Into<String>) -> Self {
        Self {
            document,
            result: Err(error.into()),
        }
    }
}

/// A file whose extraction failed; it contributed nothing to the stores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// Name of the file as selected
    pub file_name: String,
    /// What went wrong
    pub error: String,
}

/// A file refused at selection time; it never reached extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFile {
    /// Name of the file as selected
    pub file_name: String,
    /// Why it was refused
    pub reason: IntakeError,
}

/// Summary of one ingestion batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Ids of invoices created, in input order
    pub invoices_created: Vec<InvoiceId>,
    /// Ids of providers created, in input order of first sighting
    pub providers_created: Vec<ProviderId>,
    /// Files whose extraction failed, in input order
    pub failures: Vec<FileFailure>,
}

impl BatchOutcome {
    /// Number of files that produced an invoice
    pub fn succeeded(&self) -> usize {
        self.invoices_created.len()
    }

    /// Number of files that failed
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when every submitted file succeeded
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}
