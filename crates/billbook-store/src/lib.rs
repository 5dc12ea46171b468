//! Billbook Storage Layer
//!
//! In-memory invoice and provider collections for one session, plus CSV export.
//!
//! # Architecture
//!
//! - [`InvoiceStore`]: ordered invoices, newest batch first
//! - [`ProviderRegistry`]: providers deduplicated by case-insensitive name
//! - [`ProviderSelection`]: which provider the detail view shows
//! - [`BillBook`]: owns both collections and the busy flag; the only writer
//!   that merges extraction batches
//!
//! Nothing is persisted; dropping the [`BillBook`] discards everything.
//!
//! # Examples
//!
//! ```
//! use billbook_store::{BillBook, ExportOptions};
//!
//! let book = BillBook::new();
//! let mut out = Vec::new();
//! book.export_csv(&mut out, &ExportOptions::default()).unwrap();
//! assert_eq!(out, b"Invoice Number,Invoice Date,Provider,Amount\n");
//! ```

#![warn(missing_docs)]

use thiserror::Error;

pub mod book;
pub mod export;
pub mod invoice_store;
pub mod provider_registry;
pub mod selection;

pub use book::{BatchTicket, BillBook, BookError, BusyFlag};
pub use export::{write_csv, write_csv_file, CsvHeader, ExportColumn, ExportOptions, DEFAULT_EXPORT_FILE};
pub use invoice_store::InvoiceStore;
pub use provider_registry::ProviderRegistry;
pub use selection::ProviderSelection;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Replacement record carries a different id than the one addressed
    #[error("Record id mismatch: expected {expected}, found {found}")]
    IdMismatch {
        /// Id that was addressed
        expected: String,
        /// Id carried by the replacement
        found: String,
    },

    /// Another provider already uses this name
    #[error("A provider named '{0}' already exists")]
    DuplicateName(String),

    /// CSV encoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while writing an export
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
