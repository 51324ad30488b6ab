use crate::error::Result;
use crate::types::Annotation;

/// String key-value persistence, the shape of browser-local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Per-document annotation persistence.
///
/// `load` returns `Ok(None)` when nothing was ever stored for the document
/// and `Err(Error::Malformed { .. })` when something was stored but does
/// not parse.
pub trait AnnotationRepository: Send + Sync {
    fn load(&self, document_id: &str) -> Result<Option<Vec<Annotation>>>;
    fn save(&self, document_id: &str, annotations: &[Annotation]) -> Result<()>;

    /// Copies the stored list of `document_id` into the combined snapshot of
    /// all documents and returns how many annotations were copied.
    ///
    /// `Err(Error::NotFound(_))` when the document has no stored list.
    fn snapshot(&self, document_id: &str) -> Result<usize>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

impl<T: AnnotationRepository + ?Sized> AnnotationRepository for Box<T> {
    fn load(&self, document_id: &str) -> Result<Option<Vec<Annotation>>> {
        (**self).load(document_id)
    }

    fn save(&self, document_id: &str, annotations: &[Annotation]) -> Result<()> {
        (**self).save(document_id, annotations)
    }

    fn snapshot(&self, document_id: &str) -> Result<usize> {
        (**self).snapshot(document_id)
    }
}

impl<T: AnnotationRepository + ?Sized> AnnotationRepository for &T {
    fn load(&self, document_id: &str) -> Result<Option<Vec<Annotation>>> {
        (**self).load(document_id)
    }

    fn save(&self, document_id: &str, annotations: &[Annotation]) -> Result<()> {
        (**self).save(document_id, annotations)
    }

    fn snapshot(&self, document_id: &str) -> Result<usize> {
        (**self).snapshot(document_id)
    }
}
