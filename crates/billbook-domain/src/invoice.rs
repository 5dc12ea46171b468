//! Invoice records and the extraction payloads they are built from

use crate::document::SourceDocument;
use crate::ids::InvoiceId;
use serde::{Deserialize, Serialize};

/// Result of the privacy assessment for one document
///
/// Set once at ingestion and never re-run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyAssessment {
    /// Whether personal information was detected
    #[serde(rename = "hasPrivacyConcerns")]
    pub has_concerns: bool,

    /// Free-text description of the findings
    #[serde(rename = "privacyConcernsDetails", default)]
    pub details: String,
}

impl PrivacyAssessment {
    /// Assessment with no findings
    pub fn clear() -> Self {
        Self::default()
    }

    /// Assessment reporting concerns
    pub fn flagged(details: impl Into<String>) -> Self {
        Self {
            has_concerns: true,
            details: details.into(),
        }
    }
}

/// Structured fields returned by the field-extraction operation
///
/// The four invoice fields are always present (the service produces some
/// string even when unsure). Provider contact fields are absent when the
/// document does not show them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedInvoice {
    /// Invoice number as printed
    pub invoice_number: String,
    /// Invoice date as printed
    pub invoice_date: String,
    /// Provider (issuer) name
    pub provider: String,
    /// Total amount, including any currency marker
    pub amount: String,

    /// Provider postal address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_address: Option<String>,
    /// Provider phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_phone: Option<String>,
    /// Provider email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_email: Option<String>,
    /// Provider website
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_website: Option<String>,
    /// Provider VAT or tax id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_vat_id: Option<String>,
}

/// Both extraction results for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Output of the field-extraction operation
    pub fields: ExtractedInvoice,
    /// Output of the privacy-assessment operation
    pub privacy: PrivacyAssessment,
}

/// One ingested bill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    /// Stable key for update and delete
    pub id: InvoiceId,
    /// The uploaded file this record was extracted from
    pub source: SourceDocument,
    /// Invoice number
    pub invoice_number: String,
    /// Invoice date
    pub invoice_date: String,
    /// Provider name (matches `Provider::name` by value, not by reference)
    pub provider: String,
    /// Total amount
    pub amount: String,
    /// Privacy findings from ingestion
    pub privacy: PrivacyAssessment,
}

impl Invoice {
    /// Build a fresh record from a successful extraction
    pub fn from_extraction(source: SourceDocument, report: &ExtractionReport) -> Self {
        Self {
            id: InvoiceId::new(),
            source,
            invoice_number: report.fields.invoice_number.clone(),
            invoice_date: report.fields.invoice_date.clone(),
            provider: report.fields.provider.clone(),
            amount: report.fields.amount.clone(),
            privacy: report.privacy.clone(),
        }
    }

    /// The user-editable fields of this record
    pub fn edit(&self) -> InvoiceEdit {
        InvoiceEdit {
            invoice_number: self.invoice_number.clone(),
            invoice_date: self.invoice_date.clone(),
            provider: self.provider.clone(),
            amount: self.amount.clone(),
        }
    }

    /// Copy of this record with the editable fields replaced
    ///
    /// Id, source document and privacy assessment are carried over.
    pub fn with_edit(&self, edit: InvoiceEdit) -> Self {
        Self {
            id: self.id,
            source: self.source.clone(),
            invoice_number: edit.invoice_number,
            invoice_date: edit.invoice_date,
            provider: edit.provider,
            amount: edit.amount,
            privacy: self.privacy.clone(),
        }
    }
}

/// The fields of an [`Invoice`] a user may change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceEdit {
    /// Invoice number
    pub invoice_number: String,
    /// Invoice date
    pub invoice_date: String,
    /// Provider name
    pub provider: String,
    /// Total amount
    pub amount: String,
}
