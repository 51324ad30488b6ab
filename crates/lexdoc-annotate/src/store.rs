//! Key-value persistence for annotation lists.
//!
//! A document's annotations live under one key, `<prefix><document id>`,
//! as the whole ordered list serialized to JSON. Every write replaces the
//! whole value.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use lexdoc_core::error::{Error, Result};
pub use lexdoc_core::traits::{AnnotationRepository, KeyValueStore};
use lexdoc_core::types::Annotation;
use tracing::debug;

pub const DEFAULT_KEY_PREFIX: &str = "annotations-";

/// Key of the combined snapshot: a JSON object from document id to that
/// document's annotation list.
pub const ALL_ANNOTATIONS_KEY: &str = "all-annotations";

/// In-process store. Nothing survives the value being dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|_| Error::Operation("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key under `root`, named `<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        if !valid {
            return Err(Error::InvalidInput(format!("invalid store key '{key}'")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;
        // readers never observe a partially written list
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = value.len(), "wrote store entry");
        Ok(())
    }
}

/// [`AnnotationRepository`] over any [`KeyValueStore`], JSON encoded.
#[derive(Debug)]
pub struct KvAnnotationRepository<S: KeyValueStore> {
    store: S,
    key_prefix: String,
}

impl<S: KeyValueStore> KvAnnotationRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_prefix(store, DEFAULT_KEY_PREFIX)
    }

    pub fn with_prefix(store: S, key_prefix: impl Into<String>) -> Self {
        Self { store, key_prefix: key_prefix.into() }
    }

    pub fn key_for(&self, document_id: &str) -> String {
        format!("{}{}", self.key_prefix, document_id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the combined snapshot. Empty when none was ever written.
    pub fn load_snapshot(&self) -> Result<BTreeMap<String, Vec<Annotation>>> {
        match self.store.get(ALL_ANNOTATIONS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| Error::Malformed {
                key: ALL_ANNOTATIONS_KEY.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(BTreeMap::new()),
        }
    }
}

pub fn encode(annotations: &[Annotation]) -> Result<String> {
    Ok(serde_json::to_string(annotations)?)
}

pub fn decode(key: &str, raw: &str) -> Result<Vec<Annotation>> {
    serde_json::from_str(raw).map_err(|e| Error::Malformed { key: key.to_string(), reason: e.to_string() })
}

impl<S: KeyValueStore> AnnotationRepository for KvAnnotationRepository<S> {
    fn load(&self, document_id: &str) -> Result<Option<Vec<Annotation>>> {
        let key = self.key_for(document_id);
        match self.store.get(&key)? {
            Some(raw) => decode(&key, &raw).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, document_id: &str, annotations: &[Annotation]) -> Result<()> {
        let key = self.key_for(document_id);
        self.store.set(&key, &encode(annotations)?)
    }

    fn snapshot(&self, document_id: &str) -> Result<usize> {
        let list = self
            .load(document_id)?
            .ok_or_else(|| Error::NotFound(format!("no stored annotations for '{document_id}'")))?;
        let mut all = self.load_snapshot()?;
        let count = list.len();
        all.insert(document_id.to_string(), list);
        self.store.set(ALL_ANNOTATIONS_KEY, &serde_json::to_string(&all)?)?;
        debug!(document_id, count, documents = all.len(), "annotation snapshot written");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_rejects_path_like_keys() {
        let store = FileStore::new("/tmp/never-written");
        assert!(store.get("../escape").is_err());
        assert!(store.get("a/b").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn key_uses_prefix_and_document_id() {
        let repo = KvAnnotationRepository::new(MemoryStore::new());
        assert_eq!(repo.key_for("constitution-moz"), "annotations-constitution-moz");
    }

    #[test]
    fn snapshot_of_unsaved_document_is_not_found() {
        let repo = KvAnnotationRepository::new(MemoryStore::new());
        assert!(matches!(repo.snapshot("doc"), Err(Error::NotFound(_))));
        assert_eq!(repo.store().get(ALL_ANNOTATIONS_KEY).unwrap(), None);
    }

    #[test]
    fn unparseable_value_is_malformed() {
        let repo = KvAnnotationRepository::new(MemoryStore::new());
        repo.store().set("annotations-doc", "{not json").unwrap();
        match repo.load("doc") {
            Err(Error::Malformed { key, .. }) => assert_eq!(key, "annotations-doc"),
            other => panic!("expected malformed, got {other:?}"),
        }
    }
}
