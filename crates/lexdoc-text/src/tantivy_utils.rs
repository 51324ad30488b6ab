use tantivy::schema::{FacetOptions, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING};
use tantivy::tokenizer::{AsciiFoldingFilter, LowerCaser, SimpleTokenizer, StopWordFilter, TextAnalyzer};
use tantivy::Index;

pub const TOKENIZER: &str = "pt_folded";

pub fn build_schema() -> Schema {
    let mut schema_builder = Schema::builder();
    let _id_field = schema_builder.add_text_field("id", STRING | STORED);
    let text_field_indexing = TextFieldIndexing::default()
        .set_tokenizer(TOKENIZER)
        .set_index_option(IndexRecordOption::WithFreqsAndPositions);
    let stored_text = TextOptions::default().set_indexing_options(text_field_indexing.clone()).set_stored();
    let indexed_text = TextOptions::default().set_indexing_options(text_field_indexing);
    let _title_field = schema_builder.add_text_field("title", stored_text.clone());
    let _description_field = schema_builder.add_text_field("description", stored_text);
    let _type_field = schema_builder.add_text_field("doc_type", indexed_text);
    let _category_field = schema_builder.add_facet_field("category", FacetOptions::default());
    let _category_text_field = schema_builder.add_text_field("category_text", STRING | STORED);
    schema_builder.build()
}

/// Lowercases, folds accents ("Código" matches "codigo") and drops Portuguese stop words.
pub fn register_tokenizer(index: &Index) {
    let stop_words = vec![
        "a", "o", "as", "os", "um", "uma", "de", "da", "do", "das", "dos", "e", "em", "na", "no", "nas", "nos", "por",
        "pela", "pelo", "para", "com", "que", "se", "ao", "aos", "sobre", "sua", "seu",
    ];
    let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(AsciiFoldingFilter)
        .filter(StopWordFilter::remove(stop_words.into_iter().map(|s| s.to_string())))
        .build();
    index.tokenizers().register(TOKENIZER, tokenizer);
}
