//! Documents the reader has kept for offline reading.
//!
//! The set is one JSON array of document ids under [`OFFLINE_KEY`], next to
//! the annotation lists in the same store.

use std::collections::BTreeSet;

use lexdoc_core::catalog;
use lexdoc_core::error::{Error, Result};
use lexdoc_core::traits::KeyValueStore;
use lexdoc_core::types::Document;
use tracing::info;

pub const OFFLINE_KEY: &str = "offline-documents";

#[derive(Debug)]
pub struct OfflineLibrary<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> OfflineLibrary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Ids currently kept offline, sorted.
    pub fn ids(&self) -> Result<BTreeSet<String>> {
        match self.store.get(OFFLINE_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| Error::Malformed { key: OFFLINE_KEY.to_string(), reason: e.to_string() }),
            None => Ok(BTreeSet::new()),
        }
    }

    pub fn is_offline(&self, document_id: &str) -> Result<bool> {
        Ok(self.ids()?.contains(document_id))
    }

    /// Marks or unmarks a catalog document. Returns whether the set changed.
    pub fn set_offline(&self, document_id: &str, offline: bool) -> Result<bool> {
        if catalog::get_by_id(document_id).is_none() {
            return Err(Error::NotFound(format!("document '{document_id}'")));
        }
        let mut ids = self.ids()?;
        let changed = if offline { ids.insert(document_id.to_string()) } else { ids.remove(document_id) };
        if changed {
            self.store.set(OFFLINE_KEY, &serde_json::to_string(&ids)?)?;
            info!(document_id, offline, "offline availability changed");
        }
        Ok(changed)
    }

    /// The catalog in order, with `is_offline` taken from the stored set.
    pub fn documents(&self) -> Result<Vec<Document>> {
        let ids = self.ids()?;
        Ok(catalog::all()
            .iter()
            .map(|d| Document { is_offline: ids.contains(&d.id), ..d.clone() })
            .collect())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn unknown_document_cannot_be_kept() {
        let lib = OfflineLibrary::new(MemoryStore::new());
        assert!(matches!(lib.set_offline("nao-existe", true), Err(Error::NotFound(_))));
        assert_eq!(lib.store().get(OFFLINE_KEY).unwrap(), None);
    }

    #[test]
    fn unreadable_set_is_malformed() {
        let lib = OfflineLibrary::new(MemoryStore::new());
        lib.store().set(OFFLINE_KEY, "{").unwrap();
        assert!(matches!(lib.is_offline("lei-terras"), Err(Error::Malformed { .. })));
    }
}
