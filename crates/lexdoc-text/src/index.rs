use anyhow::Result;
use tantivy::schema::{Facet, Field};
use tantivy::{doc, Index, IndexReader, IndexWriter};
use tracing::debug;

use lexdoc_core::types::Document;

use crate::tantivy_utils::{build_schema, register_tokenizer};

/// In-RAM full-text index over a fixed set of catalog documents.
pub struct CatalogIndex {
    pub(crate) index: Index,
    pub(crate) reader: IndexReader,
    pub(crate) documents: Vec<Document>,
    pub(crate) id_field: Field,
    pub(crate) title_field: Field,
    pub(crate) description_field: Field,
    pub(crate) type_field: Field,
}

impl CatalogIndex {
    pub fn build(documents: &[Document]) -> Result<Self> {
        let schema = build_schema();
        let index = Index::create_in_ram(schema.clone());
        register_tokenizer(&index);
        let id_field = schema.get_field("id")?;
        let title_field = schema.get_field("title")?;
        let description_field = schema.get_field("description")?;
        let type_field = schema.get_field("doc_type")?;
        let category_field = schema.get_field("category")?;
        let category_text_field = schema.get_field("category_text")?;

        let mut index_writer: IndexWriter = index.writer_with_num_threads(1, 20_000_000)?;
        for d in documents {
            index_writer.add_document(doc!(
                id_field => d.id.clone(),
                title_field => d.title.clone(),
                description_field => d.description.clone(),
                type_field => d.doc_type.clone(),
                category_field => Facet::from_path([d.category.as_str()]),
                category_text_field => d.category.clone(),
            ))?;
        }
        index_writer.commit()?;
        let reader = index.reader()?;
        debug!(documents = documents.len(), "catalog index built");
        Ok(Self { index, reader, documents: documents.to_vec(), id_field, title_field, description_field, type_field })
    }

    /// Index over the built-in catalog.
    pub fn from_catalog() -> Result<Self> {
        Self::build(lexdoc_core::catalog::all())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub(crate) fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }
}
