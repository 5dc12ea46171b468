//! Command implementations.

pub mod analyze;
pub mod edit;
pub mod export;
pub mod ingest;
pub mod lookup;
pub mod source;

pub use self::analyze::execute_analyze;
pub use self::edit::{invoice_edit, parse_assignments, provider_draft};
pub use self::export::{execute_export, export_options};
pub use self::ingest::{count_pdfs, execute_ingest, read_uploads, IngestSummary};
pub use self::lookup::{resolve_invoice, resolve_provider};
pub use self::source::save_source;
