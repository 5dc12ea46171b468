//! Export command implementation.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use billbook_store::{BillBook, CsvHeader, ExportColumn, ExportOptions, DEFAULT_EXPORT_FILE};
use std::path::{Path, PathBuf};
use tracing::info;

/// Build export options from column names; no names means every column.
pub fn export_options<S: AsRef<str>>(columns: &[S], field_names: bool) -> Result<ExportOptions> {
    let options = if columns.is_empty() {
        ExportOptions::default()
    } else {
        let parsed = columns
            .iter()
            .map(|name| {
                let name = name.as_ref();
                ExportColumn::parse(name)
                    .ok_or_else(|| CliError::InvalidInput(format!("Unknown column: {}", name)))
            })
            .collect::<Result<Vec<_>>>()?;
        ExportOptions::with_columns(&parsed)
    };

    Ok(if field_names {
        options.header(CsvHeader::Fields)
    } else {
        options
    })
}

/// Write the book's invoices to `path` (default `invoices.csv`).
pub fn execute_export(
    book: &BillBook,
    path: Option<&Path>,
    options: &ExportOptions,
    formatter: &Formatter,
) -> Result<PathBuf> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));

    book.export_csv_file(&path, options)?;
    info!(path = %path.display(), invoices = book.invoices().len(), "Exported invoices");

    println!(
        "{}",
        formatter.success(&format!(
            "Exported {} invoice(s) to {}",
            book.invoices().len(),
            path.display()
        ))
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_export_options_default_columns() {
        let options = export_options::<&str>(&[], false).unwrap();
        assert_eq!(options, ExportOptions::default());
    }

    #[test]
    fn test_export_options_subset_with_field_names() {
        let options = export_options(&["amount", "Invoice Number"], true).unwrap();
        assert_eq!(
            options.columns(),
            &[ExportColumn::InvoiceNumber, ExportColumn::Amount]
        );
        assert_eq!(options.header, CsvHeader::Fields);
    }

    #[test]
    fn test_export_options_unknown_column() {
        assert!(matches!(
            export_options(&["total"], false),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_execute_export_writes_header_for_empty_book() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let written = execute_export(
            &BillBook::new(),
            Some(&path),
            &ExportOptions::default(),
            &formatter,
        )
        .unwrap();

        assert_eq!(written, path);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Invoice Number,Invoice Date,Provider,Amount\n"
        );
    }
}
