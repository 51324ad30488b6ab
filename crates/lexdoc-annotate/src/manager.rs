use chrono::Utc;
use lexdoc_core::error::{Error, Result};
use lexdoc_core::traits::AnnotationRepository;
use lexdoc_core::types::{Annotation, AnnotationKind, KindTag, Position};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Excerpts seeded into a document that has never been annotated.
pub const SAMPLE_ANNOTATIONS: [(&str, KindTag, u32); 2] = [
    ("A República de Moçambique é um Estado independente", KindTag::Highlight, 1),
    ("PRINCÍPIOS FUNDAMENTAIS", KindTag::Bookmark, 1),
];

/// How `load` obtained the list it now holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Read from the repository; carries the number of annotations.
    Stored(usize),
    /// Nothing was stored; samples were created and persisted.
    Seeded(usize),
    /// The stored value did not parse; the session starts empty.
    Recovered,
}

/// Authoritative annotation list of the currently open document.
///
/// Every mutation rewrites the whole list in the repository.
pub struct AnnotationManager<R: AnnotationRepository> {
    repo: R,
    document_id: Option<String>,
    annotations: Vec<Annotation>,
}

impl<R: AnnotationRepository> AnnotationManager<R> {
    pub fn new(repo: R) -> Self {
        Self { repo, document_id: None, annotations: Vec::new() }
    }

    /// Makes `document_id` the open document and reads its list.
    ///
    /// When the read or the seeding write fails, the open document is left
    /// with an empty list.
    pub fn load(&mut self, document_id: &str) -> Result<LoadOutcome> {
        self.document_id = Some(document_id.to_string());
        self.annotations = Vec::new();
        let outcome = match self.repo.load(document_id) {
            Ok(Some(list)) => {
                self.annotations = list;
                LoadOutcome::Stored(self.annotations.len())
            }
            Ok(None) => {
                let seeded = sample_annotations();
                self.repo.save(document_id, &seeded)?;
                self.annotations = seeded;
                info!(document_id, count = self.annotations.len(), "seeded sample annotations");
                LoadOutcome::Seeded(self.annotations.len())
            }
            Err(Error::Malformed { key, reason }) => {
                warn!(document_id, key = %key, reason = %reason, "stored annotations unreadable, starting empty");
                LoadOutcome::Recovered
            }
            Err(e) => return Err(e),
        };
        debug!(document_id, ?outcome, "annotations loaded");
        Ok(outcome)
    }

    /// Appends a new annotation and persists the list.
    ///
    /// Blank `selected_text` or a missing `kind` is ignored and yields
    /// `Ok(None)`. Page 0 is rejected, as is a position with a non-finite
    /// coordinate or creating before `load`. The in-memory list only changes
    /// once the repository accepted the new one.
    pub fn create(
        &mut self,
        selected_text: &str,
        kind: Option<AnnotationKind>,
        page: u32,
        position: Option<Position>,
    ) -> Result<Option<Annotation>> {
        let text = selected_text.trim();
        let Some(kind) = kind else { return Ok(None) };
        if text.is_empty() {
            return Ok(None);
        }
        if page == 0 {
            return Err(Error::InvalidInput("page numbers start at 1".to_string()));
        }
        if let Some(p) = position {
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(Error::InvalidInput(format!("marker position must be finite, got ({}, {})", p.x, p.y)));
            }
        }
        let document_id = self.open_document()?.to_string();

        let annotation = Annotation {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            kind,
            page,
            created_at: Utc::now(),
            position,
        };
        let mut next = Vec::with_capacity(self.annotations.len() + 1);
        next.extend_from_slice(&self.annotations);
        next.push(annotation.clone());
        self.repo.save(&document_id, &next)?;
        self.annotations = next;
        debug!(
            document_id = %document_id,
            id = %annotation.id,
            kind = %annotation.kind.tag(),
            page,
            "annotation created"
        );
        Ok(Some(annotation))
    }

    /// Removes the annotation with `annotation_id`. Returns whether one was removed.
    pub fn delete(&mut self, annotation_id: &str) -> Result<bool> {
        let document_id = self.open_document()?.to_string();
        if self.get(annotation_id).is_none() {
            return Ok(false);
        }
        let next: Vec<Annotation> = self.annotations.iter().filter(|a| a.id != annotation_id).cloned().collect();
        self.repo.save(&document_id, &next)?;
        self.annotations = next;
        debug!(document_id = %document_id, id = annotation_id, "annotation deleted");
        Ok(true)
    }

    /// Copies the open document's stored list into the all-documents
    /// snapshot. Returns how many annotations were copied.
    pub fn snapshot(&self) -> Result<usize> {
        let document_id = self.open_document()?;
        let count = self.repo.snapshot(document_id)?;
        info!(document_id, count, "annotations saved to snapshot");
        Ok(count)
    }

    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    /// Oldest first.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn get(&self, annotation_id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == annotation_id)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn on_page(&self, page: u32) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(move |a| a.page == page)
    }

    pub fn of_kind(&self, tag: KindTag) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(move |a| a.kind.tag() == tag)
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn open_document(&self) -> Result<&str> {
        self.document_id
            .as_deref()
            .ok_or_else(|| Error::Operation("no document loaded".to_string()))
    }
}

fn sample_annotations() -> Vec<Annotation> {
    let now = Utc::now();
    SAMPLE_ANNOTATIONS
        .iter()
        .map(|&(text, tag, page)| Annotation {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            kind: match tag {
                KindTag::Highlight => AnnotationKind::Highlight,
                KindTag::Comment => AnnotationKind::Comment { comment: None },
                KindTag::Bookmark => AnnotationKind::Bookmark,
                KindTag::Reference => AnnotationKind::Reference { ref_doc_id: None, ref_doc_title: None },
            },
            page,
            created_at: now,
            position: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KvAnnotationRepository, MemoryStore};

    fn loaded() -> AnnotationManager<KvAnnotationRepository<MemoryStore>> {
        let mut m = AnnotationManager::new(KvAnnotationRepository::new(MemoryStore::new()));
        m.load("doc").unwrap();
        m
    }

    #[test]
    fn create_before_load_is_an_error() {
        let mut m = AnnotationManager::new(KvAnnotationRepository::new(MemoryStore::new()));
        assert!(m.create("texto", Some(AnnotationKind::Bookmark), 1, None).is_err());
    }

    #[test]
    fn selected_text_is_trimmed() {
        let mut m = loaded();
        let a = m.create("  soberania \n", Some(AnnotationKind::Highlight), 2, None).unwrap().unwrap();
        assert_eq!(a.text, "soberania");
    }

    #[test]
    fn page_zero_is_rejected() {
        let mut m = loaded();
        assert!(matches!(
            m.create("x", Some(AnnotationKind::Highlight), 0, None),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn non_finite_position_is_rejected() {
        let mut m = loaded();
        for p in [Position::new(f64::NAN, 10.0), Position::new(0.0, f64::INFINITY)] {
            assert!(matches!(
                m.create("soberania", Some(AnnotationKind::Highlight), 1, Some(p)),
                Err(Error::InvalidInput(_))
            ));
        }
        assert_eq!(m.len(), 2);
        assert_eq!(m.repository().load("doc").unwrap().unwrap().len(), 2);
    }

    #[test]
    fn snapshot_needs_an_open_document() {
        let m = AnnotationManager::new(KvAnnotationRepository::new(MemoryStore::new()));
        assert!(matches!(m.snapshot(), Err(Error::Operation(_))));
    }
}
