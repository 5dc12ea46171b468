//! Resolve ids typed by the user.
//!
//! Accepts either a full UUID or the trailing hex digits shown in tables.

use crate::error::{CliError, Result};
use billbook_domain::{InvoiceId, ProviderId};
use billbook_store::BillBook;

/// Find the invoice `token` refers to.
pub fn resolve_invoice(book: &BillBook, token: &str) -> Result<InvoiceId> {
    if let Ok(id) = InvoiceId::from_string(token) {
        if book.invoices().get(id).is_some() {
            return Ok(id);
        }
    }
    let ids: Vec<InvoiceId> = book.invoices().iter().map(|i| i.id).collect();
    unique_match(ids, |id| id.has_suffix(token), "invoice", token)
}

/// Find the provider `token` refers to.
pub fn resolve_provider(book: &BillBook, token: &str) -> Result<ProviderId> {
    if let Ok(id) = ProviderId::from_string(token) {
        if book.providers().get(id).is_some() {
            return Ok(id);
        }
    }
    let ids: Vec<ProviderId> = book.providers().iter().map(|p| p.id()).collect();
    unique_match(ids, |id| id.has_suffix(token), "provider", token)
}

fn unique_match<T: Copy>(
    ids: Vec<T>,
    matches: impl Fn(&T) -> bool,
    kind: &'static str,
    token: &str,
) -> Result<T> {
    let found: Vec<T> = ids.into_iter().filter(|id| matches(id)).collect();
    match found.as_slice() {
        [id] => Ok(*id),
        [] => Err(CliError::UnknownId {
            kind,
            id: token.to_string(),
        }),
        _ => Err(CliError::InvalidInput(format!(
            "'{}' matches {} {}s; type more digits",
            token,
            found.len(),
            kind
        ))),
    }
}
