//! Billbook Extractor
//!
//! Turns uploaded invoice files into merged invoice and provider records.
//!
//! # Overview
//!
//! Each accepted file goes through two independent operations on the
//! extraction service: field extraction (invoice number, date, provider,
//! amount, provider contact details) and privacy assessment. Files are
//! processed concurrently; the results are merged into a [`BillBook`] in
//! one step once every file has settled.
//!
//! # Architecture
//!
//! ```text
//! Files → intake → Coordinator ─┬─ file 1: extract_fields ∥ assess_privacy ─┐
//!                               ├─ file 2: extract_fields ∥ assess_privacy ─┼→ BillBook::commit_batch
//!                               └─ file N: ...                            ─┘
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use billbook_extractor::{Coordinator, ExtractorConfig, FileUpload, LlmExtractionClient};
//! use billbook_llm::OllamaProvider;
//! use billbook_store::BillBook;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = OllamaProvider::new("http://localhost:11434", "llava");
//! let coordinator = Coordinator::new(LlmExtractionClient::new(llm), ExtractorConfig::default());
//! let mut book = BillBook::new();
//!
//! let (documents, rejected) = coordinator.intake(vec![
//!     FileUpload::new("acme.pdf", std::fs::read("acme.pdf")?),
//! ]);
//! let outcome = coordinator.ingest(&mut book, documents).await?;
//!
//! println!("Created: {} invoices", outcome.invoices_created.len());
//! println!("Rejected: {} files", rejected.len());
//! println!("Failures: {} files", outcome.failures.len());
//! # Ok(())
//! # }
//! ```
//!
//! [`BillBook`]: billbook_store::BillBook

#![warn(missing_docs)]

mod client;
mod config;
mod coordinator;
mod error;
mod parser;
mod prompt;


pub use client::LlmExtractionClient;
pub use config::ExtractorConfig;
pub use coordinator::{Coordinator, FileUpload};
pub use error::ExtractorError;
pub use parser::{parse_fields, parse_privacy};
pub use prompt::{ExtractionTask, PromptBuilder, FIELD_SCHEMA, PRIVACY_SCHEMA};
