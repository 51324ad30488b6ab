//! lexdoc-annotate
//!
//! Annotation overlay for the document viewer: persistence adapters, the
//! per-document annotation manager, text-anchor matching, the offline
//! library and the viewer shell that turns text selections into annotations.
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod anchor;
pub mod manager;
pub mod offline;
pub mod store;
pub mod viewer;

pub use anchor::{DocumentText, Fragment, FragmentRole, MarkerStyle, RenderedFragment};
pub use manager::{AnnotationManager, LoadOutcome};
pub use offline::OfflineLibrary;
pub use store::{FileStore, KvAnnotationRepository, MemoryStore, ALL_ANNOTATIONS_KEY, DEFAULT_KEY_PREFIX};
pub use viewer::{ComposeInput, ComposeState, HeldSelection, Pagination, TextSelection, Viewer};
