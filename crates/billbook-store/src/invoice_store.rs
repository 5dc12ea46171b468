//! Ordered in-memory collection of invoices

use crate::export::{write_csv, ExportOptions};
use crate::StoreError;
use billbook_domain::{Invoice, InvoiceId};
use std::io::Write;

/// Invoices in display order, most recent batch first
#[derive(Debug, Clone, Default)]
pub struct InvoiceStore {
    records: Vec<Invoice>,
}

impl InvoiceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a batch in front of the existing records
    ///
    /// The batch keeps its own order: `[b0, b1, ..., existing...]`.
    pub fn append_batch(&mut self, batch: Vec<Invoice>) {
        self.records.splice(0..0, batch);
    }

    /// Replace the record with `id`
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] when no record has `id`
    /// - [`StoreError::IdMismatch`] when `record.id` differs from `id`
    pub fn update(&mut self, id: InvoiceId, record: Invoice) -> Result<(), StoreError> {
        if record.id != id {
            return Err(StoreError::IdMismatch {
                expected: id.to_string(),
                found: record.id.to_string(),
            });
        }
        let slot = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        *slot = record;
        Ok(())
    }

    /// Remove the record with `id`; returns whether anything was removed
    pub fn delete(&mut self, id: InvoiceId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    /// Remove every record
    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// Look up a record
    pub fn get(&self, id: InvoiceId) -> Option<&Invoice> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records in current order
    pub fn iter(&self) -> impl Iterator<Item = &Invoice> {
        self.records.iter()
    }

    /// Records as a slice, in current order
    pub fn as_slice(&self) -> &[Invoice] {
        &self.records
    }

    /// Number of records
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the store holds nothing
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the store as CSV in current order
    pub fn export_csv<W: Write>(&self, writer: W, options: &ExportOptions) -> Result<(), StoreError> {
        write_csv(self.records.iter(), writer, options)
    }
}
