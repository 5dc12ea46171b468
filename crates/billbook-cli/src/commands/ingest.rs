//! Ingest command implementation.

use crate::error::Result;
use crate::output::Formatter;
use billbook_domain::traits::ExtractionClient;
use billbook_domain::{BatchOutcome, IntakeError, RejectedFile};
use billbook_extractor::{Coordinator, FileUpload};
use billbook_store::BillBook;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What one ingest run did.
#[derive(Debug, Default)]
pub struct IngestSummary {
    /// Extraction results of the files that reached the batch
    pub outcome: BatchOutcome,
    /// Files that never reached the batch
    pub rejected: Vec<RejectedFile>,
}

/// Read each path into an upload named after its file name.
///
/// A path that cannot be read is rejected on its own; the other files are
/// still read.
pub fn read_uploads(paths: &[PathBuf]) -> (Vec<FileUpload>, Vec<RejectedFile>) {
    let mut uploads = Vec::new();
    let mut rejected = Vec::new();

    for path in paths {
        match fs::read(path) {
            Ok(bytes) => uploads.push(FileUpload::new(display_name(path), bytes)),
            Err(e) => rejected.push(RejectedFile {
                file_name: display_name(path),
                reason: IntakeError::Unreadable(e.to_string()),
            }),
        }
    }

    (uploads, rejected)
}

/// Number of paths with a `.pdf` extension.
pub fn count_pdfs(paths: &[PathBuf]) -> usize {
    paths
        .iter()
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .count()
}

/// Read, check and extract a batch of files into `book`.
///
/// Files that cannot be read or are refused at intake are reported and
/// skipped; the rest form one batch. Per-file extraction failures are part
/// of the returned outcome.
pub async fn execute_ingest<C: ExtractionClient>(
    paths: &[PathBuf],
    coordinator: &Coordinator<C>,
    book: &mut BillBook,
    formatter: &Formatter,
) -> Result<IngestSummary> {
    let (uploads, mut rejected) = read_uploads(paths);
    let (documents, refused) = coordinator.intake(uploads);
    rejected.extend(refused);

    for file in &rejected {
        warn!(file = %file.file_name, reason = %file.reason, "File rejected at intake");
    }
    if !rejected.is_empty() {
        eprintln!("{}", formatter.format_rejected(&rejected));
    }

    if documents.is_empty() {
        println!("{}", formatter.info("No files to extract"));
        return Ok(IngestSummary {
            outcome: BatchOutcome::default(),
            rejected,
        });
    }

    info!(files = documents.len(), "Extracting invoices");
    let outcome = coordinator.ingest(book, documents).await?;
    println!("{}", formatter.format_outcome(&outcome)?);
    Ok(IngestSummary { outcome, rejected })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
