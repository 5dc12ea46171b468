//! Save an invoice's source document back to disk.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use billbook_domain::InvoiceId;
use billbook_store::BillBook;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write the original bytes of invoice `id` to `path`.
///
/// Without a path the file keeps its original name in the current directory.
pub fn save_source(
    book: &BillBook,
    id: InvoiceId,
    path: Option<&Path>,
    formatter: &Formatter,
) -> Result<PathBuf> {
    let invoice = book.invoices().get(id).ok_or_else(|| CliError::UnknownId {
        kind: "invoice",
        id: id.to_string(),
    })?;
    let source = &invoice.source;
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(source.file_name()));

    fs::write(&path, source.bytes())?;
    info!(invoice = %id, path = %path.display(), bytes = source.len(), "Saved source document");

    println!(
        "{}",
        formatter.success(&format!("Saved {} to {}", source.file_name(), path.display()))
    );
    Ok(path)
}
