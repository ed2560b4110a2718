//! Ontology-level metadata (IRI, version IRI, label, creator, description, imports) and the
//! key-value stores it is persisted in.
//!
//! Settings are derived deterministically from the user's base IRI, label, creator,
//! description and delimiter plus the current date, and are written to the settings store
//! under [`SETTINGS_KEY`] every time they are generated.

use crate::consts::*;
use anyhow::{anyhow, Result};
use chrono::prelude::*;
use fs2::FileExt;
use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref WORD_BOUNDARY: Regex = Regex::new(r"[^a-z0-9]+(.)").unwrap();
    static ref ONTOLOGY_MARKERS: Regex = Regex::new(r"rdf:RDF|@prefix|owl:Ontology").unwrap();
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct OntologySettings {
    #[serde(default)]
    pub iri: String,
    #[serde(rename = "owl:versionIRI", default)]
    pub version_iri: String,
    #[serde(rename = "owl:versionInfo", default)]
    pub version_info: String,
    #[serde(rename = "rdfs:label", default)]
    pub label: String,
    #[serde(rename = "dcterms:creator", default)]
    pub creator: String,
    #[serde(rename = "dcterms:description", default)]
    pub description: String,
    #[serde(rename = "owl:imports", default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    /// Any other string-valued annotations found in persisted settings.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl OntologySettings {
    /// The fixed literal-valued annotations keyed by predicate, in emission order. Empty
    /// values are included.
    pub fn fixed_annotations(&self) -> [(&'static str, &str); 5] {
        [
            (OWL_VERSION_IRI, self.version_iri.as_str()),
            (OWL_VERSION_INFO, self.version_info.as_str()),
            (RDFS_LABEL, self.label.as_str()),
            (DCTERMS_CREATOR, self.creator.as_str()),
            (DCTERMS_DESCRIPTION, self.description.as_str()),
        ]
    }

    /// Recovers the base IRI and delimiter the settings were generated from.
    pub fn base_and_delimiter(&self) -> (String, String) {
        let suffix = to_pascal_case(&self.label);
        if let Some(rest) = self.iri.strip_suffix(suffix.as_str()) {
            for delimiter in ["/", "#"] {
                if let Some(base) = rest.strip_suffix(delimiter) {
                    return (base.to_string(), delimiter.to_string());
                }
            }
        }
        match self.iri.rsplit_once('/') {
            Some((base, _)) => (base.to_string(), DEFAULT_DELIMITER.to_string()),
            None => (self.iri.clone(), DEFAULT_DELIMITER.to_string()),
        }
    }

    pub fn print(&self) {
        println!("Ontology Settings:");
        println!("  IRI: {}", self.iri);
        println!("  Version IRI: {}", self.version_iri);
        println!("  Version Info: {}", self.version_info);
        println!("  Label: {}", self.label);
        println!("  Creator: {}", self.creator);
        println!("  Description: {}", self.description);
        if !self.imports.is_empty() {
            println!("  Imports:");
            for import in &self.imports {
                println!("    - {}", import);
            }
        }
        for (key, value) in &self.extra {
            println!("  {}: {}", key, value);
        }
    }
}

/// Lowercases `label` and upper-cases the first character after every run of
/// non-alphanumeric characters, dropping the run. "Foo Bar baz" becomes "fooBarBaz".
pub fn to_camel_case(label: &str) -> String {
    let lower = label.to_lowercase();
    WORD_BOUNDARY
        .replace_all(&lower, |caps: &regex::Captures| caps[1].to_uppercase())
        .into_owned()
}

/// Like [`to_camel_case`] with the first character upper-cased: "My Ontology" becomes
/// "MyOntology".
pub fn to_pascal_case(label: &str) -> String {
    let camel = to_camel_case(label);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Cheap sniff test for ontology text: non-empty and mentions `rdf:RDF`, `@prefix` or
/// `owl:Ontology` somewhere. Not a parse.
pub fn is_valid_ontology_source(text: &str) -> bool {
    !text.is_empty() && ONTOLOGY_MARKERS.is_match(text)
}

/// Builds settings for the given date without touching any store.
pub fn settings_for_date(
    date: NaiveDate,
    base_iri: &str,
    label: &str,
    creator: &str,
    description: &str,
    delimiter: &str,
) -> OntologySettings {
    let version_info = format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day());
    let normalized_label = to_pascal_case(label);
    OntologySettings {
        iri: format!("{}{}{}", base_iri, delimiter, normalized_label),
        version_iri: format!(
            "{}/{}{}{}",
            base_iri, version_info, delimiter, normalized_label
        ),
        version_info,
        label: label.to_string(),
        creator: creator.to_string(),
        description: description.to_string(),
        imports: vec![],
        extra: BTreeMap::new(),
    }
}

pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values: HashMap<String, String>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A settings store kept as a single JSON object on disk. Every `set` rewrites the file
/// while holding an exclusive lock on a sibling `.lock` file.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileSettingsStore {
    pub fn open(path: &Path) -> Result<Self> {
        let values = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_json::from_str(&contents)
                .map_err(|e| anyhow!("Failed to read settings file {:?}: {}", path, e))?
        } else {
            debug!("No settings file at {:?}; starting empty", path);
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let lock_path = self.path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        lock_file.lock_exclusive().map_err(|e| {
            anyhow!("Could not acquire exclusive lock on {:?}: {}", lock_path, e)
        })?;
        let contents = serde_json::to_string_pretty(&self.values)?;
        let mut file = std::fs::File::create(&self.path)?;
        file.write_all(contents.as_bytes())?;
        // lock is released when lock_file is dropped
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatus {
    pub iri: String,
    /// True if ontology text for this import has been stored.
    pub loaded: bool,
}

/// Owns a settings store and reads/writes ontology settings through it.
pub struct SettingsManager<S: SettingsStore> {
    store: S,
}

impl<S: SettingsStore> SettingsManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Generates settings dated today and persists them, overwriting any stored settings.
    pub fn generate(
        &mut self,
        base_iri: &str,
        label: &str,
        creator: &str,
        description: &str,
        delimiter: &str,
    ) -> Result<OntologySettings> {
        let today = Local::now().date_naive();
        self.generate_on(today, base_iri, label, creator, description, delimiter)
    }

    pub fn generate_on(
        &mut self,
        date: NaiveDate,
        base_iri: &str,
        label: &str,
        creator: &str,
        description: &str,
        delimiter: &str,
    ) -> Result<OntologySettings> {
        let settings = settings_for_date(date, base_iri, label, creator, description, delimiter);
        self.save(&settings)?;
        info!("Generated ontology settings for {}", settings.iri);
        Ok(settings)
    }

    pub fn generate_default(&mut self) -> Result<OntologySettings> {
        self.generate(
            DEFAULT_BASE_IRI,
            DEFAULT_LABEL,
            DEFAULT_CREATOR,
            DEFAULT_DESCRIPTION,
            DEFAULT_DELIMITER,
        )
    }

    /// Returns the stored settings, generating and persisting defaults if none exist.
    pub fn load(&mut self) -> Result<OntologySettings> {
        match self.store.get(SETTINGS_KEY) {
            Some(stored) => serde_json::from_str(&stored)
                .map_err(|e| anyhow!("Stored ontology settings are not valid: {}", e)),
            None => {
                info!("No stored ontology settings; generating defaults");
                self.generate_default()
            }
        }
    }

    /// Returns the stored settings without generating defaults.
    pub fn stored(&self) -> Result<Option<OntologySettings>> {
        match self.store.get(SETTINGS_KEY) {
            Some(stored) => Ok(Some(serde_json::from_str(&stored)?)),
            None => Ok(None),
        }
    }

    pub fn save(&mut self, settings: &OntologySettings) -> Result<()> {
        let json = serde_json::to_string(settings)?;
        self.store.set(SETTINGS_KEY, &json)
    }

    /// Regenerates settings from new user input, keeping the current import list and any
    /// extra annotations.
    pub fn update(
        &mut self,
        base_iri: &str,
        label: &str,
        creator: &str,
        description: &str,
        delimiter: &str,
    ) -> Result<OntologySettings> {
        let previous = self.load()?;
        let mut settings = self.generate(base_iri, label, creator, description, delimiter)?;
        settings.imports = previous.imports;
        settings.extra = previous.extra;
        self.save(&settings)?;
        Ok(settings)
    }

    /// Appends `iri` to `owl:imports`. Returns false if it is empty or already imported.
    pub fn add_import(&mut self, iri: &str) -> Result<bool> {
        let iri = iri.trim();
        if iri.is_empty() {
            return Ok(false);
        }
        let mut settings = self.load()?;
        if settings.imports.iter().any(|i| i == iri) {
            debug!("Import {} already present", iri);
            return Ok(false);
        }
        settings.imports.push(iri.to_string());
        self.save(&settings)?;
        info!("Added import {}", iri);
        Ok(true)
    }

    /// Stores raw ontology text for an import under `import:{iri}`. Text that does not look
    /// like an ontology is rejected and nothing is stored.
    pub fn store_import_source(&mut self, iri: &str, text: &str) -> Result<bool> {
        if !is_valid_ontology_source(text) {
            warn!("Rejected file for {}: not a valid RDF/OWL file", iri);
            return Ok(false);
        }
        self.store
            .set(&format!("{}{}", IMPORT_KEY_PREFIX, iri), text)?;
        info!("Loaded valid ontology for {}", iri);
        Ok(true)
    }

    pub fn import_source(&self, iri: &str) -> Option<String> {
        self.store.get(&format!("{}{}", IMPORT_KEY_PREFIX, iri))
    }

    pub fn import_status(&mut self) -> Result<Vec<ImportStatus>> {
        let settings = self.load()?;
        Ok(settings
            .imports
            .iter()
            .map(|iri| ImportStatus {
                iri: iri.clone(),
                loaded: self.import_source(iri).is_some(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("Example Ontology"), "exampleOntology");
        assert_eq!(to_camel_case("Foo Bar Baz"), "fooBarBaz");
        assert_eq!(to_camel_case("snake_case_text"), "snakeCaseText");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("My Ontology"), "MyOntology");
        assert_eq!(to_pascal_case("example term"), "ExampleTerm");
        assert_eq!(to_pascal_case("common--core  ontologies"), "CommonCoreOntologies");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_is_valid_ontology_source() {
        assert!(is_valid_ontology_source("@prefix ex: <http://example.org/> ."));
        assert!(is_valid_ontology_source("<rdf:RDF></rdf:RDF>"));
        assert!(is_valid_ontology_source(
            "<owl:Ontology rdf:about='...'></owl:Ontology>"
        ));
        assert!(!is_valid_ontology_source(""));
        assert!(!is_valid_ontology_source("not a valid rdf"));
    }

    #[test]
    fn test_settings_for_date() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let s = settings_for_date(date, "http://example.org", "My Ontology", "Ann", "Desc", "/");
        assert_eq!(s.iri, "http://example.org/MyOntology");
        assert_eq!(s.version_iri, "http://example.org/2025-07-04/MyOntology");
        assert_eq!(s.version_info, "2025-07-04");
        assert_eq!(s.label, "My Ontology");

        let s = settings_for_date(date, "http://example.org/onto", "My Ontology", "", "", "#");
        assert_eq!(s.iri, "http://example.org/onto#MyOntology");
        assert_eq!(s.version_iri, "http://example.org/onto/2025-07-04#MyOntology");
    }

    #[test]
    fn test_base_and_delimiter() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let s = settings_for_date(date, "http://example.org/onto", "My Ontology", "", "", "#");
        assert_eq!(
            s.base_and_delimiter(),
            ("http://example.org/onto".to_string(), "#".to_string())
        );
        let s = settings_for_date(date, "http://example.org", "My Ontology", "", "", "/");
        assert_eq!(
            s.base_and_delimiter(),
            ("http://example.org".to_string(), "/".to_string())
        );
    }
}
