//! The ontology categories a table row can declare, and the "is a" relation each one implies.

use crate::consts::{RDFS_SUBCLASS_OF, RDFS_SUBPROPERTY_OF, RDF_TYPE};
use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    Class,
    NamedIndividual,
    ObjectProperty,
    DatatypeProperty,
    AnnotationProperty,
}

impl ElementType {
    pub const ALL: [ElementType; 5] = [
        ElementType::Class,
        ElementType::NamedIndividual,
        ElementType::ObjectProperty,
        ElementType::DatatypeProperty,
        ElementType::AnnotationProperty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Class => "Class",
            ElementType::NamedIndividual => "NamedIndividual",
            ElementType::ObjectProperty => "ObjectProperty",
            ElementType::DatatypeProperty => "DatatypeProperty",
            ElementType::AnnotationProperty => "AnnotationProperty",
        }
    }

    /// Predicate linking a subject to the target of its "is a" cell.
    pub fn is_a_predicate(&self) -> &'static str {
        match self {
            ElementType::Class => RDFS_SUBCLASS_OF,
            ElementType::ObjectProperty
            | ElementType::DatatypeProperty
            | ElementType::AnnotationProperty => RDFS_SUBPROPERTY_OF,
            ElementType::NamedIndividual => RDF_TYPE,
        }
    }

    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|t| t.as_str().to_string()).collect()
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// exact, case-sensitive match: the table cell must hold one of the five names verbatim
impl FromStr for ElementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| anyhow!("Unknown element type: {:?}", s))
    }
}

/// Returns the "is a" predicate for a raw element-type cell, or None if the cell is not a
/// known element type.
pub fn is_a_predicate_for(cell: &str) -> Option<&'static str> {
    cell.parse::<ElementType>().ok().map(|t| t.is_a_predicate())
}
