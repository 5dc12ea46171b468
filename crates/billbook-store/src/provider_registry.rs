//! Provider collection deduplicated by case-insensitive name

use crate::StoreError;
use billbook_domain::{Provider, ProviderId, ProviderKey};
use std::collections::HashSet;
use tracing::debug;

/// Providers in display order, most recently discovered first
///
/// At most one provider per [`ProviderKey`] is held at any time.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    records: Vec<Provider>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive lookup by name
    pub fn find_by_name(&self, name: &str) -> Option<&Provider> {
        let key = ProviderKey::new(name)?;
        self.find_by_key(&key)
    }

    /// Lookup by dedup key
    pub fn find_by_key(&self, key: &ProviderKey) -> Option<&Provider> {
        self.records.iter().find(|p| p.key() == key)
    }

    /// Whether a provider with this key exists
    pub fn contains_key(&self, key: &ProviderKey) -> bool {
        self.find_by_key(key).is_some()
    }

    /// Add the candidates whose names are new, in front of the existing records
    ///
    /// A candidate is skipped when its key is already registered or an
    /// earlier candidate in the same call carried the same key, so the
    /// first sighting wins. Survivors keep their relative order.
    /// Returns the ids of the providers actually added.
    pub fn upsert_on_ingest(&mut self, candidates: Vec<Provider>) -> Vec<ProviderId> {
        let mut seen: HashSet<ProviderKey> = HashSet::new();
        let mut fresh = Vec::new();

        for candidate in candidates {
            if self.contains_key(candidate.key()) {
                debug!(provider = %candidate.name(), "Provider already registered");
                continue;
            }
            if !seen.insert(candidate.key().clone()) {
                debug!(provider = %candidate.name(), "Provider already queued in this batch");
                continue;
            }
            fresh.push(candidate);
        }

        let ids = fresh.iter().map(Provider::id).collect();
        self.records.splice(0..0, fresh);
        ids
    }

    /// Replace the record with `id`
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] when no record has `id`
    /// - [`StoreError::IdMismatch`] when `record.id()` differs from `id`
    /// - [`StoreError::DuplicateName`] when the new name collides with
    ///   another provider
    pub fn update(&mut self, id: ProviderId, record: Provider) -> Result<(), StoreError> {
        if record.id() != id {
            return Err(StoreError::IdMismatch {
                expected: id.to_string(),
                found: record.id().to_string(),
            });
        }
        if self
            .records
            .iter()
            .any(|p| p.id() != id && p.key() == record.key())
        {
            return Err(StoreError::DuplicateName(record.name().to_string()));
        }
        let slot = self
            .records
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        *slot = record;
        Ok(())
    }

    /// Remove the record with `id`; returns whether anything was removed
    pub fn delete(&mut self, id: ProviderId) -> bool {
        let before = self.records.len();
        self.records.retain(|p| p.id() != id);
        self.records.len() != before
    }

    /// Remove every record
    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// Look up a record
    pub fn get(&self, id: ProviderId) -> Option<&Provider> {
        self.records.iter().find(|p| p.id() == id)
    }

    /// First record in current order
    pub fn first(&self) -> Option<&Provider> {
        self.records.first()
    }

    /// Records in current order
    pub fn iter(&self) -> impl Iterator<Item = &Provider> {
        self.records.iter()
    }

    /// Number of records
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// True when the registry holds nothing
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billbook_domain::ProviderDraft;

    fn provider(name: &str) -> Provider {
        let draft = ProviderDraft {
            name: name.to_string(),
            ..Default::default()
        };
        Provider::from_draft(ProviderId::new(), draft).unwrap()
    }

    fn names(registry: &ProviderRegistry) -> Vec<String> {
        registry.iter().map(|p| p.name().to_string()).collect()
    }

    #[test]
    fn test_find_by_name_ignores_case() {
        let mut registry = ProviderRegistry::new();
        registry.upsert_on_ingest(vec![provider("Acme Corp")]);
        assert!(registry.find_by_name("ACME CORP").is_some());
        assert!(registry.find_by_name("acme corp").is_some());
        assert!(registry.find_by_name("Acme").is_none());
        assert!(registry.find_by_name("").is_none());
    }

    #[test]
    fn test_upsert_dedups_within_call() {
        let mut registry = ProviderRegistry::new();
        let added = registry.upsert_on_ingest(vec![
            provider("Acme Corp"),
            provider("ACME CORP"),
            provider("acme corp"),
        ]);
        assert_eq!(added.len(), 1);
        assert_eq!(registry.count(), 1);
        assert_eq!(names(&registry), vec!["Acme Corp"]);
    }

    #[test]
    fn test_upsert_skips_known_and_prepends() {
        let mut registry = ProviderRegistry::new();
        registry.upsert_on_ingest(vec![provider("Initech")]);
        let added = registry.upsert_on_ingest(vec![
            provider("Globex"),
            provider("initech"),
            provider("Umbrella"),
        ]);
        assert_eq!(added.len(), 2);
        assert_eq!(names(&registry), vec!["Globex", "Umbrella", "Initech"]);
    }

    #[test]
    fn test_first_seen_wins() {
        let mut registry = ProviderRegistry::new();
        let mut first = provider("Acme");
        first.email = "first@acme.com".to_string();
        registry.upsert_on_ingest(vec![first]);

        let mut later = provider("ACME");
        later.email = "later@acme.com".to_string();
        registry.upsert_on_ingest(vec![later]);

        assert_eq!(registry.find_by_name("acme").unwrap().email, "first@acme.com");
    }

    #[test]
    fn test_update_replaces_whole_record() {
        let mut registry = ProviderRegistry::new();
        let original = provider("Acme");
        let id = original.id();
        registry.upsert_on_ingest(vec![original.clone()]);

        let mut draft = original.draft();
        draft.name = "Acme Inc".to_string();
        draft.phone = "555".to_string();
        registry
            .update(id, Provider::from_draft(id, draft).unwrap())
            .unwrap();

        let stored = registry.get(id).unwrap();
        assert_eq!(stored.name(), "Acme Inc");
        assert_eq!(stored.phone, "555");
        assert!(registry.find_by_name("acme").is_none());
    }

    #[test]
    fn test_update_rejects_duplicate_name() {
        let mut registry = ProviderRegistry::new();
        let acme = provider("Acme");
        let globex = provider("Globex");
        registry.upsert_on_ingest(vec![acme.clone(), globex.clone()]);

        let mut draft = globex.draft();
        draft.name = "ACME".to_string();
        let result = registry.update(globex.id(), Provider::from_draft(globex.id(), draft).unwrap());
        assert!(matches!(result, Err(StoreError::DuplicateName(_))));
        assert_eq!(registry.get(globex.id()).unwrap().name(), "Globex");
    }

    #[test]
    fn test_update_missing_id() {
        let mut registry = ProviderRegistry::new();
        let ghost = provider("Ghost");
        let result = registry.update(ghost.id(), ghost);
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut registry = ProviderRegistry::new();
        let acme = provider("Acme");
        registry.upsert_on_ingest(vec![acme.clone(), provider("Globex")]);

        assert!(registry.delete(acme.id()));
        assert!(!registry.delete(acme.id()));
        assert_eq!(names(&registry), vec!["Globex"]);
    }

    #[test]
    fn test_reset() {
        let mut registry = ProviderRegistry::new();
        registry.upsert_on_ingest(vec![provider("Acme"), provider("Globex")]);
        registry.reset();
        assert!(registry.is_empty());
    }
}
