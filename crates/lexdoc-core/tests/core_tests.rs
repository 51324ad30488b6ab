use chrono::NaiveDate;
use figment::Jail;

use lexdoc_core::catalog;
use lexdoc_core::config::{expand_path, resolve_with_base, Config};
use lexdoc_core::types::{Document, SearchFilters};

#[test]
fn catalog_lookup_by_id() {
    let doc = catalog::get_by_id("lei-terras").expect("lei-terras is in the catalog");
    assert_eq!(doc.title, "Lei de Terras");
    assert_eq!(doc.published_date, NaiveDate::from_ymd_opt(1997, 10, 1).unwrap());
    assert!(catalog::get_by_id("lei-inexistente").is_none(), "unknown ids are absent, not errors");
}

#[test]
fn catalog_lookup_by_category_keeps_catalog_order() {
    let civil: Vec<&str> = catalog::get_by_category("Civil").iter().map(|d| d.id.as_str()).collect();
    assert_eq!(civil, vec!["lei-terras", "lei-familia"]);
    assert!(catalog::get_by_category("Administrativo").is_empty());
}

#[test]
fn catalog_ids_are_unique_and_categories_distinct() {
    let mut ids: Vec<&str> = catalog::all().iter().map(|d| d.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), catalog::all().len());
    assert_eq!(catalog::categories(), vec!["Constitucional", "Trabalhista", "Penal", "Civil", "Comercial"]);
}

#[test]
fn document_serializes_with_original_field_names() {
    let doc = catalog::get_by_id("codigo-penal").unwrap();
    let v = serde_json::to_value(doc).unwrap();
    assert_eq!(v["type"], "Penal");
    assert_eq!(v["publishedDate"], "2014-12-31");
    let back: Document = serde_json::from_value(v).unwrap();
    assert_eq!(&back, doc);
}

#[test]
fn filters_narrow_by_type_dates_and_keywords() {
    let terras = catalog::get_by_id("lei-terras").unwrap();
    let familia = catalog::get_by_id("lei-familia").unwrap();

    let mut f = SearchFilters { document_type: Some("civil".into()), ..SearchFilters::default() };
    assert!(f.accepts(terras) && f.accepts(familia));

    f.start_date = NaiveDate::from_ymd_opt(2000, 1, 1);
    assert!(!f.accepts(terras));
    assert!(f.accepts(familia));

    f.add_keyword("revoga");
    assert!(f.accepts(familia));
    f.add_keyword("trabalho");
    assert!(!f.accepts(familia), "every keyword must appear");

    f.clear();
    assert_eq!(f, SearchFilters::default());
}

#[test]
fn config_defaults_apply_without_files() {
    Jail::expect_with(|_jail| {
        let settings = Config::load_for_env("test").expect("load").settings().expect("settings");
        assert_eq!(settings.viewer.total_pages, 42);
        assert_eq!(settings.store.key_prefix, "annotations-");
        assert_eq!(settings.search.default_limit, 20);
        Ok(())
    });
}

#[test]
fn config_files_and_env_layer_in_order() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[viewer]\ntotal_pages = 10\n[store]\ndir = \"data\"\n")?;
        jail.create_file("config.test.toml", "[viewer]\ntotal_pages = 12\n")?;
        jail.set_env("APP_STORE__KEY_PREFIX", "notes-");
        let config = Config::load_for_env("test").expect("load");
        let settings = config.settings().expect("settings");
        assert_eq!(settings.viewer.total_pages, 12);
        assert_eq!(settings.store.dir, "data");
        assert_eq!(settings.store.key_prefix, "notes-");
        assert_eq!(config.get::<u32>("viewer.total_pages").expect("key"), 12);
        Ok(())
    });
}

#[test]
fn config_rejects_zero_pages() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[viewer]\ntotal_pages = 0\n")?;
        assert!(Config::load_for_env("dev").is_err());
        Ok(())
    });
}

#[test]
fn relative_paths_resolve_against_base() {
    let base = tempfile::TempDir::new().unwrap();
    assert_eq!(resolve_with_base(base.path(), "notes"), base.path().join("notes"));
    assert!(expand_path("/abs/path").is_absolute());
}
