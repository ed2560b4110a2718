//! Defines the configuration for an ontosheet workspace: the defaults used to generate
//! ontology settings and the default import/export behavior.

use crate::consts::*;
use crate::graph::ExportFormat;
use crate::merge::InsertMode;
use anyhow::Result;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Write};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Builder)]
#[builder(default, setter(into))]
#[serde(default)]
pub struct Config {
    pub base_iri: String,
    pub label: String,
    pub creator: String,
    pub description: String,
    // separates the base IRI from the ontology name, usually "/" or "#"
    pub delimiter: String,
    pub export_format: ExportFormat,
    pub has_header_row: bool,
    pub insert_mode: InsertMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_iri: DEFAULT_BASE_IRI.to_string(),
            label: DEFAULT_LABEL.to_string(),
            creator: DEFAULT_CREATOR.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            export_format: ExportFormat::default(),
            has_header_row: true,
            insert_mode: InsertMode::default(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn save_to_file(&self, file: &Path) -> Result<()> {
        let config_str = serde_json::to_string_pretty(&self)?;
        let mut file = std::fs::File::create(file)?;
        file.write_all(config_str.as_bytes())?;
        Ok(())
    }

    pub fn from_file(file: &Path) -> Result<Self> {
        let file = std::fs::File::open(file)?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)?;
        Ok(config)
    }

    /// Prints out the current Config in a clear and readable way for command line output.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  Base IRI: {}", self.base_iri);
        println!("  Label: {}", self.label);
        println!("  Creator: {}", self.creator);
        println!("  Description: {}", self.description);
        println!("  Delimiter: {}", self.delimiter);
        println!("  Export Format: {}", self.export_format);
        println!("  Header Row: {}", self.has_header_row);
        println!("  Insert Mode: {}", self.insert_mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = Config::builder()
            .label("Pizza Ontology")
            .delimiter("#")
            .build()
            .unwrap();
        assert_eq!(config.base_iri, "http://example.org");
        assert_eq!(config.label, "Pizza Ontology");
        assert_eq!(config.delimiter, "#");
        assert_eq!(config.export_format, ExportFormat::Turtle);
        assert!(config.has_header_row);
        assert_eq!(config.insert_mode, InsertMode::Append);
    }
}
