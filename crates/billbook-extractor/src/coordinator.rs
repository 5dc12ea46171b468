//! Batch ingestion: intake, concurrent extraction, single-writer merge

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use billbook_domain::traits::ExtractionClient;
use billbook_domain::{
    BatchOutcome, ExtractionReport, FileExtraction, RejectedFile, SourceDocument,
};
use billbook_store::{BillBook, BookError};
use futures::future::join_all;
use tokio::time::timeout;
use tracing::{info, warn};

/// A file as selected by the user, before intake checks
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Name shown to the user
    pub file_name: String,
    /// Raw file content
    pub bytes: Vec<u8>,
    /// MIME type reported by the picker, if any
    pub declared_mime: Option<String>,
}

impl FileUpload {
    /// Upload with the type guessed from the file name
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            declared_mime: None,
        }
    }
}

/// Turns a selection of files into one merged batch
///
/// Every file is extracted concurrently (both calls per file also run
/// concurrently); the stores are only touched once, after every file has
/// settled, by [`BillBook::commit_batch`].
pub struct Coordinator<C: ExtractionClient> {
    client: C,
    config: ExtractorConfig,
}

impl<C: ExtractionClient> Coordinator<C> {
    /// Create a new Coordinator
    pub fn new(client: C, config: ExtractorConfig) -> Self {
        Self { client, config }
    }

    /// The extraction client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Check a selection, splitting it into documents and rejected files
    ///
    /// A rejected file never blocks its siblings. Both lists keep the
    /// selection order.
    pub fn intake(&self, files: Vec<FileUpload>) -> (Vec<SourceDocument>, Vec<RejectedFile>) {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for file in files {
            match SourceDocument::accept(
                file.file_name.clone(),
                file.bytes,
                file.declared_mime.as_deref(),
                self.config.max_file_bytes,
            ) {
                Ok(doc) => accepted.push(doc),
                Err(reason) => {
                    warn!(file = %file.file_name, %reason, "File rejected");
                    rejected.push(RejectedFile {
                        file_name: file.file_name,
                        reason,
                    });
                }
            }
        }

        (accepted, rejected)
    }

    /// Run both extraction operations on every document
    ///
    /// Results come back in input order regardless of completion order.
    pub async fn extract_batch(&self, documents: Vec<SourceDocument>) -> Vec<FileExtraction> {
        info!(files = documents.len(), "Starting extraction batch");
        join_all(documents.into_iter().map(|doc| self.extract_one(doc))).await
    }

    /// Extract a batch and merge it into `book`
    ///
    /// # Errors
    ///
    /// [`BookError::Busy`] when another batch is in flight; nothing is
    /// extracted in that case. Per-file failures are reported in the
    /// returned [`BatchOutcome`], not as an error.
    pub async fn ingest(
        &self,
        book: &mut BillBook,
        documents: Vec<SourceDocument>,
    ) -> Result<BatchOutcome, BookError> {
        let ticket = book.begin_batch()?;
        let results = self.extract_batch(documents).await;
        book.commit_batch(ticket, results)
    }

    async fn extract_one(&self, document: SourceDocument) -> FileExtraction {
        let blob = document.to_data_blob();
        let limit = self.config.extraction_timeout();

        let calls = async {
            let (fields, privacy) = tokio::join!(
                self.client.extract_fields(&blob),
                self.client.assess_privacy(&blob)
            );
            let fields = fields.map_err(|e| ExtractorError::Service(e.to_string()))?;
            let privacy = privacy.map_err(|e| ExtractorError::Service(e.to_string()))?;
            Ok::<_, ExtractorError>(ExtractionReport { fields, privacy })
        };

        let result = match timeout(limit, calls).await {
            Ok(result) => result,
            Err(_) => Err(ExtractorError::Timeout(self.config.extraction_timeout_secs)),
        };

        match result {
            Ok(report) => {
                info!(file = %document.file_name(), provider = %report.fields.provider, "File extracted");
                FileExtraction::succeeded(document, report)
            }
            Err(e) => FileExtraction::failed(document, e.to_string()),
        }
    }
}
