//! `field=value` edits for invoices and providers.
//!
//! Edits start from the record's current values, so only the named fields
//! change. The store still replaces the whole record.

use crate::error::{CliError, Result};
use billbook_domain::{Invoice, InvoiceEdit, Provider, ProviderDraft};
use billbook_store::ExportColumn;

/// Split `field=value` arguments into pairs.
pub fn parse_assignments<S: AsRef<str>>(args: &[S]) -> Result<Vec<(String, String)>> {
    if args.is_empty() {
        return Err(CliError::InvalidInput(
            "Expected at least one field=value".to_string(),
        ));
    }

    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            match arg.split_once('=') {
                Some((field, value)) if !field.trim().is_empty() => {
                    Ok((field.trim().to_string(), value.trim().to_string()))
                }
                _ => Err(CliError::InvalidInput(format!(
                    "Expected field=value, got '{}'",
                    arg
                ))),
            }
        })
        .collect()
}

/// Apply assignments to an invoice's current fields.
///
/// Field names follow the export columns (`invoiceNumber`, `date`, ...).
pub fn invoice_edit(invoice: &Invoice, assignments: &[(String, String)]) -> Result<InvoiceEdit> {
    let mut edit = invoice.edit();
    for (field, value) in assignments {
        let column = ExportColumn::parse(field)
            .ok_or_else(|| CliError::InvalidInput(format!("Unknown invoice field: {}", field)))?;
        let slot = match column {
            ExportColumn::InvoiceNumber => &mut edit.invoice_number,
            ExportColumn::InvoiceDate => &mut edit.invoice_date,
            ExportColumn::Provider => &mut edit.provider,
            ExportColumn::Amount => &mut edit.amount,
        };
        *slot = value.clone();
    }
    Ok(edit)
}

/// Apply assignments to a provider's current fields.
pub fn provider_draft(provider: &Provider, assignments: &[(String, String)]) -> Result<ProviderDraft> {
    let mut draft = provider.draft();
    for (field, value) in assignments {
        let slot = match normalize(field).as_str() {
            "name" => &mut draft.name,
            "address" => &mut draft.address,
            "phone" => &mut draft.phone,
            "email" => &mut draft.email,
            "website" | "url" => &mut draft.website,
            "vat" | "vatid" | "taxid" => &mut draft.vat_id,
            _ => {
                return Err(CliError::InvalidInput(format!(
                    "Unknown provider field: {}",
                    field
                )))
            }
        };
        *slot = value.clone();
    }
    Ok(draft)
}

fn normalize(field: &str) -> String {
    field
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .to_lowercase()
}
