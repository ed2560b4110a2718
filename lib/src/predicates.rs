//! Tracks the six fixed sheet columns and the ordered list of user-added custom predicates.

use crate::element::ElementType;
use crate::table::ColumnDef;
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const SUBJECT_COL: usize = 0;
pub const LABEL_COL: usize = 1;
pub const ELEMENT_TYPE_COL: usize = 2;
pub const DEFINITION_COL: usize = 3;
pub const IS_A_COL: usize = 4;
pub const IS_DEFINED_BY_COL: usize = 5;
/// Number of fixed columns; custom predicate `i` lives at column `FIXED_COLUMN_COUNT + i`.
pub const FIXED_COLUMN_COUNT: usize = 6;

pub const FIXED_HEADERS: [&str; FIXED_COLUMN_COUNT] = [
    "iri",
    "label",
    "element type",
    "definition",
    "is a",
    "is defined by",
];

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PredicateRegistry {
    custom: Vec<String>,
}

impl PredicateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a registry from a persisted list, dropping empty and repeated entries.
    pub fn from_predicates<I, S>(predicates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for predicate in predicates {
            registry.add_custom_predicate(predicate.as_ref());
        }
        registry
    }

    /// Appends `iri` to the custom predicates. Returns false if it is empty or already
    /// registered.
    ///
    /// Callers owning the table must widen every row to [`PredicateRegistry::column_count`]
    /// in the same operation.
    pub fn add_custom_predicate(&mut self, iri: &str) -> bool {
        let iri = iri.trim();
        if iri.is_empty() {
            warn!("Refusing to add an empty custom predicate");
            return false;
        }
        if self.custom.iter().any(|p| p == iri) {
            warn!("Predicate already added: {}", iri);
            return false;
        }
        self.custom.push(iri.to_string());
        info!("Added custom predicate {} at column {}", iri, self.column_count() - 1);
        true
    }

    pub fn custom_predicates(&self) -> &[String] {
        &self.custom
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.custom.iter().any(|p| p == iri)
    }

    pub fn column_count(&self) -> usize {
        FIXED_COLUMN_COUNT + self.custom.len()
    }

    /// Fixed headers followed by the custom predicate IRIs, in column order. This is the
    /// list of known predicates imports are validated against.
    pub fn column_headers(&self) -> Vec<String> {
        FIXED_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(self.custom.iter().cloned())
            .collect()
    }

    pub fn column_defs(&self) -> Vec<ColumnDef> {
        let mut defs: Vec<ColumnDef> = (0..FIXED_COLUMN_COUNT)
            .map(|idx| {
                if idx == ELEMENT_TYPE_COL {
                    ColumnDef::Dropdown {
                        source: ElementType::names(),
                        strict: true,
                    }
                } else {
                    ColumnDef::Text
                }
            })
            .collect();
        defs.extend(self.custom.iter().map(|_| ColumnDef::Text));
        defs
    }
}
