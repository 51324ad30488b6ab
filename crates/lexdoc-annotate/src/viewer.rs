//! Viewer shell: pagination, the annotation compose flow and the bridge from
//! the platform text selection to the [`AnnotationManager`].

use lexdoc_core::catalog;
use lexdoc_core::error::{Error, Result};
use lexdoc_core::traits::AnnotationRepository;
use lexdoc_core::types::{Annotation, AnnotationKind, KindTag, Position};
use tracing::debug;

use crate::anchor::{self, DocumentText, RenderedFragment};
use crate::manager::{AnnotationManager, LoadOutcome};

/// Prompt shown when an annotation action runs without selected text.
pub const NO_SELECTION_MESSAGE: &str = "Selecione um texto para anotar";

/// Current page within `[1, total]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current: u32,
    total: u32,
}

impl Pagination {
    /// `total` below 1 is treated as a single page.
    pub fn new(total: u32) -> Self {
        Self { current: 1, total: total.max(1) }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Moves to `page` if it is in range. Out-of-range requests are ignored.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total {
            return false;
        }
        self.current = page;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to_page(self.current.saturating_add(1))
    }

    pub fn previous(&mut self) -> bool {
        self.go_to_page(self.current.saturating_sub(1))
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ComposeState {
    #[default]
    Idle,
    Composing { kind: KindTag, draft_text: String },
}

impl ComposeState {
    /// Whether the pending kind still wants a comment or a target document
    /// before it is confirmed.
    pub fn awaits_extra_input(&self) -> bool {
        matches!(self, Self::Composing { kind, .. } if kind.needs_extra_input())
    }
}

/// Extra fields gathered while composing. Only the ones the pending kind
/// uses are read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposeInput {
    pub comment: Option<String>,
    pub ref_doc_id: Option<String>,
    pub position: Option<Position>,
}

impl ComposeInput {
    pub fn comment(text: impl Into<String>) -> Self {
        Self { comment: Some(text.into()), ..Self::default() }
    }

    pub fn reference(document_id: impl Into<String>) -> Self {
        Self { ref_doc_id: Some(document_id.into()), ..Self::default() }
    }

    fn into_kind(self, tag: KindTag) -> AnnotationKind {
        match tag {
            KindTag::Highlight => AnnotationKind::Highlight,
            KindTag::Bookmark => AnnotationKind::Bookmark,
            KindTag::Comment => AnnotationKind::Comment { comment: self.comment },
            KindTag::Reference => {
                let ref_doc_id = self.ref_doc_id.filter(|id| !id.trim().is_empty());
                let ref_doc_title = ref_doc_id
                    .as_deref()
                    .and_then(catalog::get_by_id)
                    .map(|d| d.title.clone());
                AnnotationKind::Reference { ref_doc_id, ref_doc_title }
            }
        }
    }
}

/// The platform's text selection.
pub trait TextSelection {
    fn selected_text(&self) -> Option<String>;
    fn clear(&mut self);
}

/// Selection held in memory, set explicitly by the caller.
#[derive(Debug, Clone, Default)]
pub struct HeldSelection {
    text: Option<String>,
}

impl HeldSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }
}

impl TextSelection for HeldSelection {
    fn selected_text(&self) -> Option<String> {
        self.text.clone()
    }

    fn clear(&mut self) {
        self.text = None;
    }
}

pub struct Viewer<R: AnnotationRepository, S: TextSelection> {
    manager: AnnotationManager<R>,
    selection: S,
    pagination: Pagination,
    compose: ComposeState,
}

impl<R: AnnotationRepository, S: TextSelection> Viewer<R, S> {
    pub fn new(repo: R, selection: S, total_pages: u32) -> Self {
        Self {
            manager: AnnotationManager::new(repo),
            selection,
            pagination: Pagination::new(total_pages),
            compose: ComposeState::Idle,
        }
    }

    /// Opens a document: loads its annotations, returns to page 1, drops any
    /// pending compose.
    pub fn open(&mut self, document_id: &str) -> Result<LoadOutcome> {
        let outcome = self.manager.load(document_id)?;
        self.pagination.reset();
        self.compose = ComposeState::Idle;
        Ok(outcome)
    }

    pub fn manager(&self) -> &AnnotationManager<R> {
        &self.manager
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn compose_state(&self) -> &ComposeState {
        &self.compose
    }

    pub fn selection_mut(&mut self) -> &mut S {
        &mut self.selection
    }

    pub fn go_to_page(&mut self, page: u32) -> bool {
        self.pagination.go_to_page(page)
    }

    pub fn next_page(&mut self) -> bool {
        self.pagination.next()
    }

    pub fn previous_page(&mut self) -> bool {
        self.pagination.previous()
    }

    /// Starts composing an annotation of `kind` over the current selection.
    pub fn begin_annotation(&mut self, kind: KindTag) -> Result<()> {
        let text = self.selection.selected_text().map(|s| s.trim().to_string()).unwrap_or_default();
        if text.is_empty() {
            return Err(Error::InvalidInput(NO_SELECTION_MESSAGE.to_string()));
        }
        debug!(%kind, extra_input = kind.needs_extra_input(), "compose started");
        self.compose = ComposeState::Composing { kind, draft_text: text };
        Ok(())
    }

    /// Saves the pending annotation on the current page. No-op while idle.
    pub fn confirm(&mut self, input: ComposeInput) -> Result<Option<Annotation>> {
        let ComposeState::Composing { kind, draft_text } = &self.compose else {
            return Ok(None);
        };
        let (tag, text) = (*kind, draft_text.clone());
        let position = input.position;
        let created = self.manager.create(&text, Some(input.into_kind(tag)), self.pagination.current(), position)?;
        self.finish();
        Ok(created)
    }

    pub fn cancel(&mut self) {
        if self.compose != ComposeState::Idle {
            debug!("compose cancelled");
        }
        self.finish();
    }

    pub fn delete_annotation(&mut self, annotation_id: &str) -> Result<bool> {
        self.manager.delete(annotation_id)
    }

    /// Rendered fragments of the current page with their markers. Empty when
    /// nothing is open or the document ships no static text.
    pub fn visible_markers(&self) -> Vec<RenderedFragment<'_>> {
        let Some(text) = self.manager.document_id().and_then(DocumentText::for_document) else {
            return Vec::new();
        };
        let page = self.pagination.current();
        anchor::render_page(text.page(page), self.manager.annotations(), page)
    }

    fn finish(&mut self) {
        self.compose = ComposeState::Idle;
        self.selection.clear();
    }
}
