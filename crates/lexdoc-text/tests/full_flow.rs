use chrono::NaiveDate;
use lexdoc_core::types::SearchFilters;
use lexdoc_text::CatalogIndex;

fn ids(results: &[lexdoc_text::SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn catalog_full_flow() {
    let index = CatalogIndex::from_catalog().expect("index");
    assert_eq!(index.len(), 6);

    let hits = index.search("Código Penal", &SearchFilters::default(), 10).expect("search");
    eprintln!("q='Código Penal' -> {:?}", ids(&hits));
    assert_eq!(hits[0].id, "codigo-penal");
    assert!(ids(&hits).contains(&"codigo-comercial"));
    for w in hits.windows(2) {
        assert!(w[0].score >= w[1].score);
    }
}

#[test]
fn accents_are_folded() {
    let index = CatalogIndex::from_catalog().expect("index");
    let hits = index.search("familia", &SearchFilters::default(), 10).expect("search");
    assert_eq!(ids(&hits), vec!["lei-familia"]);
    let hits = index.search("CONSTITUIÇÃO", &SearchFilters::default(), 10).expect("search");
    assert_eq!(hits[0].id, "constitution-moz");
}

#[test]
fn filters_apply_to_ranked_results() {
    let index = CatalogIndex::from_catalog().expect("index");
    let mut filters = SearchFilters { document_type: Some("Civil".into()), ..SearchFilters::default() };
    let hits = index.search("lei", &filters, 10).expect("search");
    let mut got = ids(&hits);
    got.sort_unstable();
    assert_eq!(got, vec!["lei-familia", "lei-terras"]);

    filters.end_date = NaiveDate::from_ymd_opt(2000, 12, 31);
    assert_eq!(ids(&index.search("lei", &filters, 10).expect("search")), vec!["lei-terras"]);
}

#[test]
fn blank_query_lists_catalog_in_order() {
    let index = CatalogIndex::from_catalog().expect("index");
    let all = index.search("  ", &SearchFilters::default(), 10).expect("search");
    assert_eq!(all.len(), 6);
    assert_eq!(all[0].id, "constitution-moz");
    assert_eq!(index.search("", &SearchFilters::default(), 2).expect("search").len(), 2);
    assert!(index.search("lei", &SearchFilters::default(), 0).expect("search").is_empty());

    let mut filters = SearchFilters::default();
    filters.add_keyword("Assembleia");
    assert_eq!(ids(&index.search("", &filters, 10).expect("search")), vec!["constitution-moz"]);
}

#[test]
fn category_facets() {
    let index = CatalogIndex::from_catalog().expect("index");
    let counts = index.category_counts("").expect("facets");
    let civil = counts.iter().find(|(c, _)| c == "Civil").map(|(_, n)| *n);
    assert_eq!(civil, Some(2));
    assert_eq!(counts.iter().map(|(_, n)| n).sum::<u64>(), 6);

    let counts = index.category_counts("terras").expect("facets");
    assert_eq!(counts, vec![("Civil".to_string(), 1)]);
}

#[test]
fn unbalanced_query_does_not_fail() {
    let index = CatalogIndex::from_catalog().expect("index");
    assert!(index.search("lei (", &SearchFilters::default(), 10).is_ok());
}
