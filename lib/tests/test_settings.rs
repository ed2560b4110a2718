use ontosheet::config::Config;
use ontosheet::consts::SETTINGS_KEY;
use ontosheet::settings::{FileSettingsStore, MemorySettingsStore, SettingsManager, SettingsStore};
use ontosheet::workspace::{find_workspace_root_from, Workspace, WORKSPACE_DIR};
use ontosheet::{session::example_rows, ExportFormat, InsertMode};
use tempdir::TempDir;

#[test]
fn test_generate_builds_iri_from_label() {
    let mut manager = SettingsManager::new(MemorySettingsStore::new());
    let settings = manager
        .generate("http://example.org", "My Ontology", "Ann", "Desc", "/")
        .unwrap();
    assert!(settings.iri.contains("MyOntology"));
    assert_eq!(settings.label, "My Ontology");
    assert!(settings
        .version_iri
        .ends_with(&format!("{}/MyOntology", settings.version_info)));
    assert!(manager.store().get(SETTINGS_KEY).is_some());
}

#[test]
fn test_load_generates_defaults_once() {
    let mut manager = SettingsManager::new(MemorySettingsStore::new());
    assert!(manager.stored().unwrap().is_none());
    let first = manager.load().unwrap();
    assert_eq!(first.iri, "http://example.org/ExampleOntology");
    assert_eq!(first.creator, "Barry Guarino");
    let second = manager.load().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_update_keeps_imports() {
    let mut manager = SettingsManager::new(MemorySettingsStore::new());
    manager.generate_default().unwrap();
    assert!(manager.add_import("http://purl.obolibrary.org/obo/bfo.owl").unwrap());
    assert!(!manager.add_import("http://purl.obolibrary.org/obo/bfo.owl").unwrap());
    assert!(!manager.add_import("  ").unwrap());

    let updated = manager
        .update("http://example.org/onto", "Pet Ontology", "Ann", "Pets", "#")
        .unwrap();
    assert_eq!(updated.iri, "http://example.org/onto#PetOntology");
    assert_eq!(updated.imports, vec!["http://purl.obolibrary.org/obo/bfo.owl"]);
    assert_eq!(manager.load().unwrap(), updated);
}

#[test]
fn test_import_sources() {
    let mut manager = SettingsManager::new(MemorySettingsStore::new());
    manager.add_import("http://example.org/base").unwrap();
    assert!(!manager
        .store_import_source("http://example.org/base", "just some text")
        .unwrap());
    let status = manager.import_status().unwrap();
    assert_eq!(status.len(), 1);
    assert!(!status[0].loaded);

    let ttl = "@prefix owl: <http://www.w3.org/2002/07/owl#> .\n<http://example.org/base> a owl:Ontology .\n";
    assert!(manager
        .store_import_source("http://example.org/base", ttl)
        .unwrap());
    assert!(manager.import_status().unwrap()[0].loaded);
    assert_eq!(
        manager.import_source("http://example.org/base").as_deref(),
        Some(ttl)
    );
}

#[test]
fn test_file_store_persists_across_reopen() {
    let dir = TempDir::new("ontosheet").unwrap();
    let path = dir.path().join("settings.json");

    let store = FileSettingsStore::open(&path).unwrap();
    let mut manager = SettingsManager::new(store);
    let generated = manager
        .generate("http://example.org", "Pet Ontology", "Ann", "Pets", "/")
        .unwrap();
    drop(manager);
    assert!(path.exists());

    let mut reopened = SettingsManager::new(FileSettingsStore::open(&path).unwrap());
    assert_eq!(reopened.load().unwrap(), generated);
}

#[test]
fn test_extra_annotations_survive() {
    let mut store = MemorySettingsStore::new();
    store
        .set(
            SETTINGS_KEY,
            r#"{"iri":"http://example.org/Onto","rdfs:label":"Onto","dcterms:license":"CC-BY"}"#,
        )
        .unwrap();
    let mut manager = SettingsManager::new(store);
    let settings = manager.load().unwrap();
    assert_eq!(settings.extra.get("dcterms:license").map(|s| s.as_str()), Some("CC-BY"));
    assert_eq!(
        settings.base_and_delimiter(),
        ("http://example.org".to_string(), "/".to_string())
    );
}

#[test]
fn test_workspace_init_and_load() {
    let dir = TempDir::new("ontosheet").unwrap();
    let config = Config::builder()
        .label("Pet Ontology")
        .export_format(ExportFormat::NTriples)
        .insert_mode(InsertMode::Replace)
        .build()
        .unwrap();
    let mut workspace = Workspace::init(dir.path(), config.clone(), example_rows(), false).unwrap();
    assert!(Workspace::init(dir.path(), config.clone(), vec![], false).is_err());

    workspace.session.add_custom_predicate("ex:note");
    workspace.save().unwrap();

    let mut loaded = Workspace::load(dir.path()).unwrap();
    assert_eq!(loaded.config, config);
    assert_eq!(loaded.session.rows().len(), 5);
    assert_eq!(loaded.session.predicates().custom_predicates().len(), 1);
    let settings = loaded.session.settings_mut().load().unwrap();
    assert_eq!(settings.iri, "http://example.org/PetOntology");

    let export = loaded.session.export(loaded.config.export_format).unwrap();
    assert_eq!(export.file_name, "ontology.nt");
    assert_eq!(export.mime_type, "application/n-triples");
    assert!(export.text.contains("<http://example.org/Person>"));

    let overwritten = Workspace::init(dir.path(), Config::default(), vec![], true).unwrap();
    assert!(overwritten.session.rows().is_empty());
}

#[test]
fn test_find_workspace_root() {
    let dir = TempDir::new("ontosheet").unwrap();
    let nested = dir.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();
    assert_eq!(find_workspace_root_from(&nested), None);

    std::fs::create_dir_all(dir.path().join(WORKSPACE_DIR)).unwrap();
    assert_eq!(
        find_workspace_root_from(&nested).as_deref(),
        Some(dir.path())
    );
}
