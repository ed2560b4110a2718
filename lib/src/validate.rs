//! Validates decoded rows before they are merged into the table.
//!
//! Validation never fails outright: structural problems, bad element types and internal
//! failures all come back as a [`ValidationResult`] with `valid == false` and a list of
//! messages. Rows are cleaned (padded or truncated to the known column count) whether or
//! not they are valid, so callers can show the user exactly what would be imported.

use crate::element::ElementType;
use crate::predicates::ELEMENT_TYPE_COL;
use crate::table::{normalize_row, Row};
use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::HashMap;

lazy_static! {
    /// Maps common spellings of the fixed column headers onto their canonical names.
    /// Keys are lowercase and trimmed.
    pub static ref HEADER_ALIASES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("iri", "iri");
        m.insert("id", "iri");
        m.insert("label", "label");
        m.insert("rdfs:label", "label");
        m.insert("element type", "element type");
        m.insert("type", "element type");
        m.insert("rdf:type", "element type");
        m.insert("definition", "definition");
        m.insert("skos:definition", "definition");
        m.insert("is a", "is a");
        m.insert("subclass of", "is a");
        m.insert("rdfs:subclassof", "is a");
        m.insert("is defined by", "is defined by");
        m.insert("rdfs:isdefinedby", "is defined by");
        m
    };
}

pub const UNPARSEABLE_INPUT: &str = "File could not be parsed or is empty";

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub cleaned_rows: Vec<Row>,
    /// Original text of header cells that matched no known column. Informational only.
    pub ignored_columns: Vec<String>,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn failed(message: impl Into<String>) -> Self {
        ValidationResult {
            valid: false,
            cleaned_rows: vec![],
            ignored_columns: vec![],
            errors: vec![message.into()],
        }
    }
}

/// Lowercases and trims a header cell, then maps it through [`HEADER_ALIASES`]. Unknown
/// headers are returned in their lowercased form.
pub fn normalize_header(cell: &str) -> String {
    let key = cell.trim().to_lowercase();
    match HEADER_ALIASES.get(key.as_str()) {
        Some(canonical) => canonical.to_string(),
        None => key,
    }
}

/// Validates `rows` against the table's known column headers.
///
/// `rows` is `None` when the decoder produced nothing usable; that yields an invalid result
/// with a single error. `known_predicates` is the full list of column headers (fixed columns
/// then custom predicates) and fixes the width every cleaned row is normalized to.
pub fn validate(
    rows: Option<&[Row]>,
    header: Option<&[String]>,
    known_predicates: &[String],
    has_header_row: bool,
) -> ValidationResult {
    info!("Validating {} decoded rows", rows.map(|r| r.len()).unwrap_or(0));
    match try_validate(rows, header, known_predicates, has_header_row) {
        Ok(result) => result,
        Err(e) => {
            error!("Validation failed: {}", e);
            ValidationResult::failed(e.to_string())
        }
    }
}

fn try_validate(
    rows: Option<&[Row]>,
    header: Option<&[String]>,
    known_predicates: &[String],
    has_header_row: bool,
) -> Result<ValidationResult> {
    if known_predicates.len() <= ELEMENT_TYPE_COL {
        return Err(anyhow!(
            "Expected at least {} known columns, got {}",
            ELEMENT_TYPE_COL + 1,
            known_predicates.len()
        ));
    }
    let known: Vec<String> = known_predicates
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut ignored_columns = vec![];
    if let (true, Some(header)) = (has_header_row, header) {
        for cell in header {
            if !known.contains(&normalize_header(cell)) {
                ignored_columns.push(cell.clone());
            }
        }
        if !ignored_columns.is_empty() {
            warn!("Ignored columns: {:?}", ignored_columns);
        }
    }

    let rows = match rows {
        Some(rows) => rows,
        None => {
            error!("Invalid parsed input: no rows");
            return Ok(ValidationResult::failed(UNPARSEABLE_INPUT));
        }
    };

    let expected_cols = known_predicates.len();
    let mut errors = vec![];
    let mut cleaned_rows = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if row.len() < expected_cols {
            debug!("Padding row {} with empty cells", i + 1);
        }
        let cleaned = normalize_row(row.clone(), expected_cols);
        let type_value = &cleaned[ELEMENT_TYPE_COL];
        if type_value.parse::<ElementType>().is_err() {
            let msg = format!("Row {} has invalid Element Type: \"{}\"", i + 1, type_value);
            warn!("{}", msg);
            errors.push(msg);
        }
        cleaned_rows.push(cleaned);
    }

    Ok(ValidationResult {
        valid: errors.is_empty(),
        cleaned_rows,
        ignored_columns,
        errors,
    })
}
