//! The bill-management session: both stores, the busy flag and the batch merge
//!
//! # Batch protocol
//!
//! ```text
//! begin_batch() ──► BatchTicket (busy = true)
//!        │
//!        ▼
//!   per-file extraction (no store access)
//!        │
//!        ▼
//! commit_batch(ticket, results) ──► single-writer merge, busy = false
//! ```
//!
//! While the ticket is alive every destructive operation fails with
//! [`BookError::Busy`], and a second `begin_batch` is refused. Dropping a
//! ticket without committing also clears the flag.

use crate::export::{write_csv, write_csv_file, ExportOptions};
use crate::invoice_store::InvoiceStore;
use crate::provider_registry::ProviderRegistry;
use crate::StoreError;
use billbook_domain::{
    BatchOutcome, FileExtraction, FileFailure, Invoice, InvoiceEdit, InvoiceId, Provider,
    ProviderDraft, ProviderId, ProviderKey, ValidationError,
};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors from session-level operations
#[derive(Error, Debug)]
pub enum BookError {
    /// A batch is in flight
    #[error("A batch is being ingested; try again when it finishes")]
    Busy,

    /// Ticket was issued by a different session
    #[error("Batch ticket does not belong to this session")]
    ForeignTicket,

    /// User input rejected before touching the stores
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store-level failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Shared, observable "batch in flight" flag
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    /// Whether a batch is in flight
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn release(&self) {
        self.0.store(false, Ordering::Release);
    }

    fn same_as(&self, other: &BusyFlag) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Proof that a batch was started; clears the busy flag when dropped
#[derive(Debug)]
pub struct BatchTicket {
    flag: BusyFlag,
}

impl Drop for BatchTicket {
    fn drop(&mut self) {
        self.flag.release();
    }
}

/// One user's invoices and providers
#[derive(Debug, Default)]
pub struct BillBook {
    invoices: InvoiceStore,
    providers: ProviderRegistry,
    busy: BusyFlag,
}

impl BillBook {
    /// Start an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoice store (read-only)
    pub fn invoices(&self) -> &InvoiceStore {
        &self.invoices
    }

    /// Provider registry (read-only)
    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    /// Handle on the busy flag for observers
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// Whether a batch is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Mark a batch as in flight
    ///
    /// # Errors
    ///
    /// [`BookError::Busy`] if another batch has not finished.
    pub fn begin_batch(&self) -> Result<BatchTicket, BookError> {
        if !self.busy.try_acquire() {
            return Err(BookError::Busy);
        }
        Ok(BatchTicket {
            flag: self.busy.clone(),
        })
    }

    /// Merge a finished batch into the stores
    ///
    /// `results` must be in submission order. Every success becomes one
    /// invoice; providers are created only for names not yet registered
    /// and not already seen earlier in `results`. New invoices and new
    /// providers are put in front of the existing ones, in submission
    /// order. Failures touch nothing.
    pub fn commit_batch(
        &mut self,
        ticket: BatchTicket,
        results: Vec<FileExtraction>,
    ) -> Result<BatchOutcome, BookError> {
        if !ticket.flag.same_as(&self.busy) {
            return Err(BookError::ForeignTicket);
        }

        let mut new_invoices = Vec::new();
        let mut candidates = Vec::new();
        let mut failures = Vec::new();

        for FileExtraction { document, result } in results {
            match result {
                Ok(report) => {
                    if let Some(candidate) = Provider::from_extraction(&report.fields) {
                        candidates.push(candidate);
                    }
                    new_invoices.push(Invoice::from_extraction(document, &report));
                }
                Err(error) => {
                    warn!(file = %document.file_name(), error = %error, "Extraction failed");
                    failures.push(FileFailure {
                        file_name: document.file_name().to_string(),
                        error,
                    });
                }
            }
        }

        let invoices_created: Vec<InvoiceId> = new_invoices.iter().map(|i| i.id).collect();
        self.invoices.append_batch(new_invoices);
        let providers_created = self.providers.upsert_on_ingest(candidates);

        info!(
            invoices = invoices_created.len(),
            providers = providers_created.len(),
            failures = failures.len(),
            "Batch merged"
        );

        drop(ticket);
        Ok(BatchOutcome {
            invoices_created,
            providers_created,
            failures,
        })
    }

    fn ensure_idle(&self) -> Result<(), BookError> {
        if self.busy.is_busy() {
            Err(BookError::Busy)
        } else {
            Ok(())
        }
    }

    /// Replace the editable fields of an invoice
    pub fn update_invoice(&mut self, id: InvoiceId, edit: InvoiceEdit) -> Result<(), BookError> {
        self.ensure_idle()?;
        let current = self
            .invoices
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let updated = current.with_edit(edit);
        self.invoices.update(id, updated)?;
        Ok(())
    }

    /// Delete an invoice; deleting an unknown id is a no-op
    pub fn delete_invoice(&mut self, id: InvoiceId) -> Result<bool, BookError> {
        self.ensure_idle()?;
        Ok(self.invoices.delete(id))
    }

    /// Validate and apply a provider edit
    ///
    /// Invoices naming the old provider name are left untouched.
    pub fn update_provider(&mut self, id: ProviderId, draft: ProviderDraft) -> Result<(), BookError> {
        self.ensure_idle()?;
        draft.validate()?;
        let record = Provider::from_draft(id, draft)
            .ok_or_else(|| ValidationError::new("name", "must not be empty"))?;
        self.providers.update(id, record)?;
        Ok(())
    }

    /// Delete a provider; invoices naming it keep their provider text
    pub fn delete_provider(&mut self, id: ProviderId) -> Result<bool, BookError> {
        self.ensure_idle()?;
        Ok(self.providers.delete(id))
    }

    /// Clear both stores
    pub fn reset(&mut self) -> Result<(), BookError> {
        self.ensure_idle()?;
        self.invoices.reset();
        self.providers.reset();
        info!("All invoice and provider data cleared");
        Ok(())
    }

    /// Invoices whose provider text matches `name`, ignoring case
    pub fn invoices_for_provider(&self, name: &str) -> Vec<&Invoice> {
        match ProviderKey::new(name) {
            Some(key) => self
                .invoices
                .iter()
                .filter(|i| ProviderKey::new(&i.provider).as_ref() == Some(&key))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Write all invoices as CSV, in current order
    pub fn export_csv<W: Write>(&self, writer: W, options: &ExportOptions) -> Result<(), BookError> {
        write_csv(self.invoices.iter(), writer, options)?;
        Ok(())
    }

    /// Write all invoices as CSV to `path`, replacing the file
    pub fn export_csv_file(&self, path: &Path, options: &ExportOptions) -> Result<(), BookError> {
        write_csv_file(self.invoices.iter(), path, options)?;
        Ok(())
    }
}
