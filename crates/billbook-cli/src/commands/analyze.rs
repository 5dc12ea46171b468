//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::commands::{execute_export, execute_ingest, export_options};
use crate::error::Result;
use crate::output::Formatter;
use billbook_domain::traits::ExtractionClient;
use billbook_extractor::Coordinator;
use billbook_store::BillBook;

/// Execute the analyze command.
///
/// Runs one batch over a fresh book, prints both tables and optionally
/// writes the CSV export. Returns the book for callers that want more.
pub async fn execute_analyze<C: ExtractionClient>(
    args: AnalyzeArgs,
    coordinator: &Coordinator<C>,
    formatter: &Formatter,
) -> Result<BillBook> {
    // Fail on bad column names before spending time on extraction
    let options = export_options(&args.columns, args.field_names)?;

    let mut book = BillBook::new();
    execute_ingest(&args.files, coordinator, &mut book, formatter).await?;

    let invoices: Vec<_> = book.invoices().iter().collect();
    println!("{}", formatter.format_invoices(&invoices)?);

    let providers: Vec<_> = book.providers().iter().collect();
    println!("{}", formatter.format_providers(&providers, None)?);

    if let Some(path) = &args.export {
        execute_export(&book, Some(path), &options, formatter)?;
    }

    Ok(book)
}
