//! Classifies files by extension into spreadsheet, ontology, or unsupported formats.

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

pub const SPREADSHEET_EXTENSIONS: [&str; 4] = ["csv", "tsv", "xls", "xlsx"];
pub const ONTOLOGY_EXTENSIONS: [&str; 4] = ["ttl", "nt", "rdf", "jsonld"];

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Spreadsheet,
    Ontology,
    Unsupported,
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::Spreadsheet => write!(f, "spreadsheet"),
            FileFormat::Ontology => write!(f, "ontology"),
            FileFormat::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Returns the lowercase text after the last '.' of `filename`.
///
/// Returns an empty string when there is no '.' or when the '.' is the final
/// character.
pub fn parse_extension(filename: &str) -> String {
    info!("Parsing extension of filename: {}", filename);
    match filename.rfind('.') {
        Some(idx) if idx + 1 < filename.len() => {
            let ext = filename[idx + 1..].to_lowercase();
            info!("Parsed extension: {}", ext);
            ext
        }
        _ => {
            warn!("No extension found in {:?}", filename);
            String::new()
        }
    }
}

/// Same as [`parse_extension`] for callers holding an optional or non-text filename.
pub fn parse_extension_opt(filename: Option<&str>) -> String {
    match filename {
        Some(name) => parse_extension(name),
        None => {
            error!("Cannot parse extension: expected a filename");
            String::new()
        }
    }
}

/// Maps an already-lowercased extension onto a [`FileFormat`]. Matching is case-sensitive.
pub fn detect_format(extension: &str) -> FileFormat {
    info!("Checking extension: {}", extension);
    if SPREADSHEET_EXTENSIONS.contains(&extension) {
        info!("Detected spreadsheet format");
        return FileFormat::Spreadsheet;
    }
    if ONTOLOGY_EXTENSIONS.contains(&extension) {
        info!("Detected ontology format");
        return FileFormat::Ontology;
    }
    warn!("Unsupported extension: {:?}", extension);
    FileFormat::Unsupported
}

pub fn detect_format_opt(extension: Option<&str>) -> FileFormat {
    match extension {
        Some(ext) => detect_format(ext),
        None => {
            error!("Cannot detect format: expected an extension");
            FileFormat::Unsupported
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extension() {
        assert_eq!(parse_extension("myfile.csv"), "csv");
        assert_eq!(parse_extension("document.TSV"), "tsv");
        assert_eq!(parse_extension("archive.XLSX"), "xlsx");
        assert_eq!(parse_extension("2025.07.21.data.xlsx"), "xlsx");
        assert_eq!(parse_extension("myfile"), "");
        assert_eq!(parse_extension("weirdname."), "");
        assert_eq!(parse_extension(""), "");
        assert_eq!(parse_extension_opt(None), "");
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format("csv"), FileFormat::Spreadsheet);
        assert_eq!(detect_format(&"XLSX".to_lowercase()), FileFormat::Spreadsheet);
        assert_eq!(detect_format("ttl"), FileFormat::Ontology);
        assert_eq!(detect_format(&"JSONLD".to_lowercase()), FileFormat::Ontology);
        assert_eq!(detect_format("exe"), FileFormat::Unsupported);
        assert_eq!(detect_format(""), FileFormat::Unsupported);
        // case-sensitive: callers lowercase first
        assert_eq!(detect_format("CSV"), FileFormat::Unsupported);
        assert_eq!(detect_format_opt(None), FileFormat::Unsupported);
    }
}
