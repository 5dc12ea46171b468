//! Provider records
//!
//! A provider is keyed for deduplication by its [`ProviderKey`], the trimmed
//! and lowercased name, while the display name keeps its original casing.

use crate::error::ValidationError;
use crate::ids::ProviderId;
use crate::invoice::ExtractedInvoice;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref WEBSITE: Regex =
        Regex::new(r"^(?i)(https?://)?([a-z0-9]([a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}(:\d{1,5})?(/\S*)?$")
            .unwrap();
}

/// Case-insensitive dedup key derived from a provider name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderKey(String);

impl ProviderKey {
    /// Normalize a name; `None` when the name is blank
    ///
    /// # Examples
    ///
    /// ```
    /// use billbook_domain::ProviderKey;
    ///
    /// assert_eq!(ProviderKey::new("Acme Corp"), ProviderKey::new("  ACME corp "));
    /// assert!(ProviderKey::new("   ").is_none());
    /// ```
    pub fn new(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_lowercase()))
        }
    }

    /// Normalized form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bill issuer and its contact details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    id: ProviderId,
    name: String,
    key: ProviderKey,
    /// Postal address
    pub address: String,
    /// Phone number
    pub phone: String,
    /// Email address
    pub email: String,
    /// Website
    pub website: String,
    /// VAT or tax id
    pub vat_id: String,
}

impl Provider {
    /// Build a record from validated-or-trusted draft content
    ///
    /// Returns `None` when the draft name is blank, since a provider
    /// without a name has no dedup key.
    pub fn from_draft(id: ProviderId, draft: ProviderDraft) -> Option<Self> {
        let key = ProviderKey::new(&draft.name)?;
        Some(Self {
            id,
            name: draft.name,
            key,
            address: draft.address,
            phone: draft.phone,
            email: draft.email,
            website: draft.website,
            vat_id: draft.vat_id,
        })
    }

    /// Candidate record for a provider first seen in an extraction
    ///
    /// Missing contact fields default to empty strings.
    pub fn from_extraction(fields: &ExtractedInvoice) -> Option<Self> {
        Self::from_draft(ProviderId::new(), ProviderDraft::from_extraction(fields))
    }

    /// Identifier
    pub fn id(&self) -> ProviderId {
        self.id
    }

    /// Display name with original casing
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dedup key
    pub fn key(&self) -> &ProviderKey {
        &self.key
    }

    /// Case-insensitive name comparison
    pub fn matches_name(&self, name: &str) -> bool {
        ProviderKey::new(name).is_some_and(|k| k == self.key)
    }

    /// Editable copy of this record's content
    pub fn draft(&self) -> ProviderDraft {
        ProviderDraft {
            name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            website: self.website.clone(),
            vat_id: self.vat_id.clone(),
        }
    }
}

/// Provider content without an id, as entered by a user or reported by extraction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderDraft {
    /// Display name
    pub name: String,
    /// Postal address
    pub address: String,
    /// Phone number
    pub phone: String,
    /// Email address
    pub email: String,
    /// Website
    pub website: String,
    /// VAT or tax id
    pub vat_id: String,
}

impl ProviderDraft {
    /// Provider content reported alongside an invoice
    pub fn from_extraction(fields: &ExtractedInvoice) -> Self {
        let text = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or("").to_string();
        Self {
            name: fields.provider.trim().to_string(),
            address: text(&fields.provider_address),
            phone: text(&fields.provider_phone),
            email: text(&fields.provider_email),
            website: text(&fields.provider_website),
            vat_id: text(&fields.provider_vat_id),
        }
    }

    /// Check a user edit before it reaches the registry
    ///
    /// Name must be non-blank. Email and website may be empty but, when
    /// set, must be well formed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "must not be empty"));
        }

        let email = self.email.trim();
        if !email.is_empty() && !EMAIL.is_match(email) {
            return Err(ValidationError::new(
                "email",
                format!("'{}' is not a valid email address", email),
            ));
        }

        let website = self.website.trim();
        if !website.is_empty() && !WEBSITE.is_match(website) {
            return Err(ValidationError::new(
                "website",
                format!("'{}' is not a valid URL", website),
            ));
        }

        Ok(())
    }
}
