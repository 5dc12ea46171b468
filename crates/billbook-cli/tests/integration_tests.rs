//! End-to-end tests for the analyze command over a scripted extraction service

use async_trait::async_trait;
use billbook_cli::cli::AnalyzeArgs;
use billbook_cli::commands::{execute_analyze, execute_ingest};
use billbook_cli::config::OutputFormat;
use billbook_cli::{CliError, Formatter};
use billbook_domain::traits::ExtractionClient;
use billbook_domain::{DataBlob, ExtractedInvoice, IntakeError, PrivacyAssessment};
use billbook_extractor::{Coordinator, ExtractorConfig};
use billbook_store::{BillBook, BookError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Reads the provider name straight out of the document bytes
struct EchoClient;

#[async_trait]
impl ExtractionClient for EchoClient {
    type Error = String;

    async fn extract_fields(&self, blob: &DataBlob) -> Result<ExtractedInvoice, String> {
        let text = String::from_utf8(blob.decode().map_err(|e| e.to_string())?)
            .map_err(|e| e.to_string())?;
        if text == "garbage" {
            return Err("model returned no JSON".to_string());
        }
        let (number, provider) = text.split_once('|').unwrap_or(("?", text.as_str()));
        Ok(ExtractedInvoice {
            invoice_number: number.to_string(),
            invoice_date: "2024-03-01".to_string(),
            provider: provider.to_string(),
            amount: "10.00".to_string(),
            ..Default::default()
        })
    }

    async fn assess_privacy(&self, _blob: &DataBlob) -> Result<PrivacyAssessment, String> {
        Ok(PrivacyAssessment::clear())
    }
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn coordinator() -> Coordinator<EchoClient> {
    Coordinator::new(EchoClient, ExtractorConfig::default())
}

fn formatter() -> Formatter {
    Formatter::new(OutputFormat::Quiet, false)
}

#[tokio::test]
async fn test_analyze_exports_csv() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("out.csv");
    let args = AnalyzeArgs {
        files: vec![
            write(dir.path(), "a.pdf", "A-1|Acme, Inc."),
            write(dir.path(), "b.png", "B-2|ACME, INC."),
            write(dir.path(), "notes.txt", "ignored"),
            write(dir.path(), "c.jpg", "garbage"),
        ],
        export: Some(csv.clone()),
        columns: vec!["number".to_string(), "provider".to_string()],
        field_names: false,
    };

    let book = execute_analyze(args, &coordinator(), &formatter()).await.unwrap();

    assert_eq!(book.invoices().len(), 2);
    assert_eq!(book.providers().count(), 1);
    assert_eq!(
        fs::read_to_string(&csv).unwrap(),
        "Invoice Number,Provider\nA-1,\"Acme, Inc.\"\nB-2,\"ACME, INC.\"\n"
    );
}

#[tokio::test]
async fn test_analyze_rejects_unknown_column_before_extracting() {
    let dir = tempdir().unwrap();
    let args = AnalyzeArgs {
        files: vec![write(dir.path(), "a.pdf", "A-1|Acme")],
        export: None,
        columns: vec!["total".to_string()],
        field_names: false,
    };

    let result = execute_analyze(args, &coordinator(), &formatter()).await;
    assert!(matches!(result, Err(CliError::InvalidInput(_))));
}

#[tokio::test]
async fn test_ingest_into_busy_book_fails() {
    let dir = tempdir().unwrap();
    let mut book = BillBook::new();
    let _ticket = book.begin_batch().unwrap();

    let result = execute_ingest(
        &[write(dir.path(), "a.pdf", "A-1|Acme")],
        &coordinator(),
        &mut book,
        &formatter(),
    )
    .await;

    assert!(matches!(result, Err(CliError::Book(BookError::Busy))));
}

#[tokio::test]
async fn test_ingest_only_rejected_files_is_empty_outcome() {
    let dir = tempdir().unwrap();
    let mut book = BillBook::new();

    let summary = execute_ingest(
        &[write(dir.path(), "empty.pdf", "")],
        &coordinator(),
        &mut book,
        &formatter(),
    )
    .await
    .unwrap();

    assert_eq!(summary.outcome.succeeded(), 0);
    assert!(summary.outcome.failures.is_empty());
    assert_eq!(summary.rejected.len(), 1);
    assert_eq!(summary.rejected[0].reason, IntakeError::Empty);
    assert!(book.invoices().is_empty());
}

#[tokio::test]
async fn test_missing_path_does_not_block_siblings() {
    let dir = tempdir().unwrap();
    let mut book = BillBook::new();

    let summary = execute_ingest(
        &[
            write(dir.path(), "a.pdf", "A-1|Acme"),
            dir.path().join("missing.pdf"),
            write(dir.path(), "b.pdf", "B-2|Globex"),
        ],
        &coordinator(),
        &mut book,
        &formatter(),
    )
    .await
    .unwrap();

    assert_eq!(summary.outcome.succeeded(), 2);
    assert_eq!(summary.rejected.len(), 1);
    assert_eq!(summary.rejected[0].file_name, "missing.pdf");
    assert!(matches!(summary.rejected[0].reason, IntakeError::Unreadable(_)));

    let numbers: Vec<&str> = book
        .invoices()
        .iter()
        .map(|i| i.invoice_number.as_str())
        .collect();
    assert_eq!(numbers, vec!["A-1", "B-2"]);
}
