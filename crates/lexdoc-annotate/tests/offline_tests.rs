use tempfile::TempDir;

use lexdoc_annotate::offline::OFFLINE_KEY;
use lexdoc_annotate::{FileStore, KvAnnotationRepository, OfflineLibrary};
use lexdoc_core::catalog;
use lexdoc_core::traits::{AnnotationRepository, KeyValueStore};

#[test]
fn kept_documents_survive_a_reopen() {
    let dir = TempDir::new().unwrap();
    let lib = OfflineLibrary::new(FileStore::new(dir.path()));
    assert!(lib.set_offline("lei-terras", true).unwrap());
    assert!(lib.set_offline("constitution-moz", true).unwrap());
    assert!(!lib.set_offline("lei-terras", true).unwrap(), "already kept");

    let reopened = OfflineLibrary::new(FileStore::new(dir.path()));
    assert_eq!(reopened.ids().unwrap().into_iter().collect::<Vec<_>>(), vec!["constitution-moz", "lei-terras"]);
    assert_eq!(
        reopened.store().get(OFFLINE_KEY).unwrap().as_deref(),
        Some(r#"["constitution-moz","lei-terras"]"#)
    );

    assert!(reopened.set_offline("lei-terras", false).unwrap());
    assert!(!reopened.set_offline("lei-terras", false).unwrap());
    assert!(!reopened.is_offline("lei-terras").unwrap());
    assert!(reopened.is_offline("constitution-moz").unwrap());
}

#[test]
fn documents_carry_the_offline_flag_in_catalog_order() {
    let dir = TempDir::new().unwrap();
    let lib = OfflineLibrary::new(FileStore::new(dir.path()));
    lib.set_offline("lei-terras", true).unwrap();

    let docs = lib.documents().unwrap();
    assert_eq!(docs.len(), catalog::all().len());
    for (d, base) in docs.iter().zip(catalog::all()) {
        assert_eq!(d.id, base.id);
        assert_eq!(d.is_offline, d.id == "lei-terras");
    }
    assert!(catalog::all().iter().all(|d| !d.is_offline), "static catalog is untouched");
}

#[test]
fn offline_set_and_annotations_share_a_store_without_clashing() {
    let dir = TempDir::new().unwrap();
    let repo = KvAnnotationRepository::new(FileStore::new(dir.path()));
    repo.save("lei-terras", &[]).unwrap();
    let lib = OfflineLibrary::new(FileStore::new(dir.path()));
    lib.set_offline("lei-terras", true).unwrap();

    assert_eq!(repo.load("lei-terras").unwrap(), Some(Vec::new()));
    assert!(lib.is_offline("lei-terras").unwrap());
}
