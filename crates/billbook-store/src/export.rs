//! CSV export of invoices
//!
//! Columns always appear in the order invoice number, date, provider,
//! amount; selecting a subset drops columns but never reorders them.
//! Source documents and privacy findings are never exported.

use crate::StoreError;
use billbook_domain::Invoice;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Default export file name
pub const DEFAULT_EXPORT_FILE: &str = "invoices.csv";

/// An exportable invoice field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExportColumn {
    /// Invoice number
    InvoiceNumber,
    /// Invoice date
    InvoiceDate,
    /// Provider name
    Provider,
    /// Total amount
    Amount,
}

impl ExportColumn {
    /// Every column, in export order
    pub const ALL: [ExportColumn; 4] = [
        ExportColumn::InvoiceNumber,
        ExportColumn::InvoiceDate,
        ExportColumn::Provider,
        ExportColumn::Amount,
    ];

    /// Record field name
    pub fn field_name(&self) -> &'static str {
        match self {
            ExportColumn::InvoiceNumber => "invoiceNumber",
            ExportColumn::InvoiceDate => "invoiceDate",
            ExportColumn::Provider => "provider",
            ExportColumn::Amount => "amount",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            ExportColumn::InvoiceNumber => "Invoice Number",
            ExportColumn::InvoiceDate => "Invoice Date",
            ExportColumn::Provider => "Provider",
            ExportColumn::Amount => "Amount",
        }
    }

    /// Parse a field name or label, ignoring case, spaces and underscores
    pub fn parse(s: &str) -> Option<Self> {
        let norm: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();
        match norm.as_str() {
            "invoicenumber" | "number" => Some(ExportColumn::InvoiceNumber),
            "invoicedate" | "date" => Some(ExportColumn::InvoiceDate),
            "provider" => Some(ExportColumn::Provider),
            "amount" => Some(ExportColumn::Amount),
            _ => None,
        }
    }

    fn value<'a>(&self, invoice: &'a Invoice) -> &'a str {
        match self {
            ExportColumn::InvoiceNumber => &invoice.invoice_number,
            ExportColumn::InvoiceDate => &invoice.invoice_date,
            ExportColumn::Provider => &invoice.provider,
            ExportColumn::Amount => &invoice.amount,
        }
    }
}

/// Header row style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvHeader {
    /// Human-readable labels (`Invoice Number,...`)
    #[default]
    Labels,
    /// Record field names (`invoiceNumber,...`)
    Fields,
}

/// What to export and how to label it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    columns: Vec<ExportColumn>,
    /// Header row style
    pub header: CsvHeader,
}

impl ExportOptions {
    /// Export a subset of columns; order and duplicates in `columns` are ignored
    pub fn with_columns(columns: &[ExportColumn]) -> Self {
        let mut columns = columns.to_vec();
        columns.sort();
        columns.dedup();
        Self {
            columns,
            header: CsvHeader::default(),
        }
    }

    /// Use the given header style
    pub fn header(mut self, header: CsvHeader) -> Self {
        self.header = header;
        self
    }

    /// Selected columns in export order
    pub fn columns(&self) -> &[ExportColumn] {
        &self.columns
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::with_columns(&ExportColumn::ALL)
    }
}

/// Write `invoices` as CSV to `writer`
///
/// Fields containing commas, quotes or newlines are quoted with embedded
/// quotes doubled.
pub fn write_csv<'a, W, I>(invoices: I, writer: W, options: &ExportOptions) -> Result<(), StoreError>
where
    W: Write,
    I: IntoIterator<Item = &'a Invoice>,
{
    let mut wtr = csv::Writer::from_writer(writer);

    let header: Vec<&str> = options
        .columns
        .iter()
        .map(|c| match options.header {
            CsvHeader::Labels => c.label(),
            CsvHeader::Fields => c.field_name(),
        })
        .collect();
    wtr.write_record(&header)?;

    let mut rows = 0usize;
    for invoice in invoices {
        let record: Vec<&str> = options.columns.iter().map(|c| c.value(invoice)).collect();
        wtr.write_record(&record)?;
        rows += 1;
    }

    wtr.flush()?;
    info!(rows, columns = options.columns.len(), "CSV export written");
    Ok(())
}

/// Write `invoices` as CSV to a file at `path`, replacing it
pub fn write_csv_file<'a, I>(invoices: I, path: &Path, options: &ExportOptions) -> Result<(), StoreError>
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let file = File::create(path)?;
    write_csv(invoices, file, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use billbook_domain::{ExtractedInvoice, ExtractionReport, PrivacyAssessment, SourceDocument};

    fn invoice(number: &str, provider: &str, amount: &str) -> Invoice {
        let doc = SourceDocument::accept("x.png", vec![1], None, 1024).unwrap();
        let report = ExtractionReport {
            fields: ExtractedInvoice {
                invoice_number: number.to_string(),
                invoice_date: "2024-01-10".to_string(),
                provider: provider.to_string(),
                amount: amount.to_string(),
                ..Default::default()
            },
            privacy: PrivacyAssessment::flagged("secret"),
        };
        Invoice::from_extraction(doc, &report)
    }

    fn render(invoices: &[Invoice], options: &ExportOptions) -> String {
        let mut buf = Vec::new();
        write_csv(invoices, &mut buf, options).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_default_export() {
        let out = render(
            &[invoice("INV-001", "Acme Corp", "$120.00")],
            &ExportOptions::default(),
        );
        assert_eq!(
            out,
            "Invoice Number,Invoice Date,Provider,Amount\nINV-001,2024-01-10,Acme Corp,$120.00\n"
        );
    }

    #[test]
    fn test_field_name_header() {
        let out = render(&[], &ExportOptions::default().header(CsvHeader::Fields));
        assert_eq!(out, "invoiceNumber,invoiceDate,provider,amount\n");
    }

    #[test]
    fn test_escaping() {
        let out = render(
            &[invoice("A\"1", "Smith, Jones & Co", "1,200.00\nEUR")],
            &ExportOptions::default(),
        );
        assert!(out.contains("\"A\"\"1\""));
        assert!(out.contains("\"Smith, Jones & Co\""));
        assert!(out.contains("\"1,200.00\nEUR\""));
    }

    #[test]
    fn test_subset_keeps_fixed_order() {
        let options = ExportOptions::with_columns(&[ExportColumn::Amount, ExportColumn::InvoiceNumber]);
        let out = render(&[invoice("N1", "P", "5")], &options);
        assert_eq!(out, "Invoice Number,Amount\nN1,5\n");
    }

    #[test]
    fn test_private_fields_not_exported() {
        let out = render(&[invoice("N1", "P", "5")], &ExportOptions::default());
        assert!(!out.contains("secret"));
        assert!(!out.contains("x.png"));
    }

    #[test]
    fn test_column_parse() {
        assert_eq!(ExportColumn::parse("invoiceNumber"), Some(ExportColumn::InvoiceNumber));
        assert_eq!(ExportColumn::parse("Invoice Date"), Some(ExportColumn::InvoiceDate));
        assert_eq!(ExportColumn::parse("AMOUNT"), Some(ExportColumn::Amount));
        assert_eq!(ExportColumn::parse("vat"), None);
    }

    #[test]
    fn test_write_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE);
        write_csv_file(&[invoice("N1", "P", "5")], &path, &ExportOptions::default()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Invoice Number"));
    }
}
