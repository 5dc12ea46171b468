//! Which provider the detail view is showing

use crate::provider_registry::ProviderRegistry;
use crate::StoreError;
use billbook_domain::{Provider, ProviderId};

/// The currently displayed provider
///
/// Call [`reconcile`](Self::reconcile) after every registry mutation so the
/// selection never points at a removed provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderSelection {
    current: Option<ProviderId>,
}

impl ProviderSelection {
    /// Nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id`
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when `id` is not in the registry; the
    /// previous selection is kept.
    pub fn select(&mut self, registry: &ProviderRegistry, id: ProviderId) -> Result<(), StoreError> {
        if registry.get(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.current = Some(id);
        Ok(())
    }

    /// Restore the invariant against the registry's current content
    ///
    /// Keeps a selection that is still present; otherwise falls back to the
    /// first provider in registry order, or to nothing when it is empty.
    pub fn reconcile(&mut self, registry: &ProviderRegistry) -> Option<ProviderId> {
        let still_present = self.current.is_some_and(|id| registry.get(id).is_some());
        if !still_present {
            self.current = registry.first().map(Provider::id);
        }
        self.current
    }

    /// Selected id, without checking the registry
    pub fn current(&self) -> Option<ProviderId> {
        self.current
    }

    /// Selected provider, if it is still registered
    pub fn selected<'a>(&self, registry: &'a ProviderRegistry) -> Option<&'a Provider> {
        self.current.and_then(|id| registry.get(id))
    }

    /// Drop the selection
    pub fn clear(&mut self) {
        self.current = None;
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

    #[test]
    fn test_reconcile_selects_first_when_empty_selection() {
        let mut registry = ProviderRegistry::new();
        let mut selection = ProviderSelection::new();
        assert_eq!(selection.reconcile(&registry), None);

        let acme = provider("Acme");
        registry.upsert_on_ingest(vec![acme.clone(), provider("Globex")]);
        assert_eq!(selection.reconcile(&registry), Some(acme.id()));
    }

    #[test]
    fn test_reconcile_keeps_present_selection() {
        let mut registry = ProviderRegistry::new();
        let globex = provider("Globex");
        registry.upsert_on_ingest(vec![provider("Acme"), globex.clone()]);

        let mut selection = ProviderSelection::new();
        selection.select(&registry, globex.id()).unwrap();
        registry.upsert_on_ingest(vec![provider("Initech")]);

        assert_eq!(selection.reconcile(&registry), Some(globex.id()));
    }

    #[test]
    fn test_reconcile_falls_back_after_delete() {
        let mut registry = ProviderRegistry::new();
        let acme = provider("Acme");
        let globex = provider("Globex");
        registry.upsert_on_ingest(vec![acme.clone(), globex.clone()]);

        let mut selection = ProviderSelection::new();
        selection.select(&registry, globex.id()).unwrap();
        registry.delete(globex.id());

        assert_eq!(selection.reconcile(&registry), Some(acme.id()));

        registry.delete(acme.id());
        assert_eq!(selection.reconcile(&registry), None);
        assert!(selection.selected(&registry).is_none());
    }

    #[test]
    fn test_select_unknown_id() {
        let mut registry = ProviderRegistry::new();
        let acme = provider("Acme");
        registry.upsert_on_ingest(vec![acme.clone()]);

        let mut selection = ProviderSelection::new();
        selection.select(&registry, acme.id()).unwrap();
        let result = selection.select(&registry, ProviderId::new());

        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(selection.current(), Some(acme.id()));
    }
}
