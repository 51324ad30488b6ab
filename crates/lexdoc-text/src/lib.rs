//! lexdoc-text
//!
//! Tantivy-based search over the legal document catalog. See `index` and
//! `search` modules and the `search` example for CLI-like usage.

pub mod index;
pub mod search;
pub mod tantivy_utils;

pub use index::CatalogIndex;
pub use search::SearchResult;
