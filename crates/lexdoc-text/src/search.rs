use anyhow::Result;
use tantivy::collector::{FacetCollector, TopDocs};
use tantivy::query::{AllQuery, Query, QueryParser};
use tantivy::schema::{Facet, Value};
use tantivy::TantivyDocument;
use tracing::debug;

use lexdoc_core::types::SearchFilters;

use crate::index::CatalogIndex;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub category: String,
    pub score: f32,
}

impl CatalogIndex {
    /// Blank input matches everything; otherwise terms are OR-ed over title,
    /// description and type. Syntax errors are tolerated.
    fn parse_query(&self, query_text: &str) -> Box<dyn Query> {
        if query_text.trim().is_empty() {
            return Box::new(AllQuery);
        }
        let query_parser =
            QueryParser::for_index(&self.index, vec![self.title_field, self.description_field, self.type_field]);
        let (query, errors) = query_parser.parse_query_lenient(query_text);
        if !errors.is_empty() {
            debug!(query = query_text, ?errors, "query parsed leniently");
        }
        query
    }

    /// Ranked documents matching `query_text` that pass `filters`, at most `limit`.
    ///
    /// A blank query lists the filtered catalog in catalog order.
    pub fn search(&self, query_text: &str, filters: &SearchFilters, limit: usize) -> Result<Vec<SearchResult>> {
        if limit == 0 || self.documents.is_empty() {
            return Ok(Vec::new());
        }
        if query_text.trim().is_empty() {
            return Ok(self
                .documents
                .iter()
                .filter(|d| filters.accepts(d))
                .take(limit)
                .map(|d| SearchResult {
                    id: d.id.clone(),
                    title: d.title.clone(),
                    category: d.category.clone(),
                    score: 1.0,
                })
                .collect());
        }
        let searcher = self.reader.searcher();
        let query = self.parse_query(query_text);
        // filters run after ranking, so rank the whole catalog
        let top_docs = searcher.search(query.as_ref(), &TopDocs::with_limit(self.documents.len()))?;
        let mut results = Vec::new();
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            let Some(d) = doc.get_first(self.id_field).and_then(|v| v.as_str()).and_then(|id| self.document(id))
            else {
                continue;
            };
            if !filters.accepts(d) {
                continue;
            }
            results.push(SearchResult {
                id: d.id.clone(),
                title: d.title.clone(),
                category: d.category.clone(),
                score,
            });
            if results.len() == limit {
                break;
            }
        }
        debug!(query = query_text, hits = results.len(), "catalog search");
        Ok(results)
    }

    /// Number of documents per category matching `query_text` (blank = all).
    pub fn category_counts(&self, query_text: &str) -> Result<Vec<(String, u64)>> {
        let searcher = self.reader.searcher();
        let query = self.parse_query(query_text);
        let mut facet_collector = FacetCollector::for_field("category");
        facet_collector.add_facet(Facet::root());
        let facet_counts = searcher.search(query.as_ref(), &facet_collector)?;
        let mut facets = Vec::new();
        for (facet, count) in facet_counts.get(&Facet::root().to_string()) {
            let name = facet.to_path().last().map(|s| (*s).to_string()).unwrap_or_default();
            facets.push((name, count));
        }
        Ok(facets)
    }
}
