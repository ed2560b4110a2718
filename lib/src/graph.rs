//! Turns ontology settings and table rows into an ordered sequence of quads, and writes
//! those quads out in one of the supported RDF syntaxes.
//!
//! Quads keep terms exactly as they were authored in the sheet (usually compact names like
//! `ex:Dog`); they are only resolved to full IRIs against the prefix map when serialized.

use crate::consts::*;
use crate::element::is_a_predicate_for;
use crate::errors::SerializationError;
use crate::predicates::*;
use crate::prefixes::PrefixMap;
use crate::settings::OntologySettings;
use crate::table::Row;
use anyhow::{anyhow, Error, Result};
use log::{debug, error, info, warn};
use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::{GraphName, Literal, Quad as RdfQuad, Term};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Object {
    NamedNode(String),
    Literal(String),
}

/// A subject-predicate-object statement in the default graph.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    pub subject: String,
    pub predicate: String,
    pub object: Object,
}

impl Quad {
    pub fn named(subject: &str, predicate: &str, object: &str) -> Self {
        Quad {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            object: Object::NamedNode(object.to_string()),
        }
    }

    pub fn literal(subject: &str, predicate: &str, value: &str) -> Self {
        Quad {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            object: Object::Literal(value.to_string()),
        }
    }

    fn to_rdf(&self, prefixes: &PrefixMap) -> Result<RdfQuad> {
        let subject = prefixes.resolve(&self.subject)?;
        let predicate = prefixes.resolve(&self.predicate)?;
        let object: Term = match &self.object {
            Object::NamedNode(iri) => prefixes.resolve(iri)?.into(),
            Object::Literal(value) => Literal::new_simple_literal(value).into(),
        };
        Ok(RdfQuad::new(subject, predicate, object, GraphName::DefaultGraph))
    }
}

impl std::fmt::Display for Quad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.object {
            Object::NamedNode(iri) => write!(f, "{} {} {}", self.subject, self.predicate, iri),
            Object::Literal(value) => write!(f, "{} {} {:?}", self.subject, self.predicate, value),
        }
    }
}

fn cell(row: &Row, idx: usize) -> &str {
    row.get(idx).map(|c| c.as_str()).unwrap_or("")
}

/// Builds the full quad sequence for one export.
///
/// The ontology header comes first (`rdf:type owl:Ontology`, then the literal annotations
/// and `owl:imports` from `settings`), followed by each row in order. Rows with an empty
/// subject or element type are skipped. Custom predicate `i` is read from column
/// `FIXED_COLUMN_COUNT + i`. Duplicates are not removed.
pub fn build_quads(rows: &[Row], settings: &OntologySettings, custom_predicates: &[String]) -> Vec<Quad> {
    let ontology = settings.iri.as_str();
    let mut quads = vec![Quad::named(ontology, RDF_TYPE, OWL_ONTOLOGY)];

    for (key, value) in settings.fixed_annotations() {
        if !value.is_empty() {
            quads.push(Quad::literal(ontology, key, value));
        }
    }
    for import in &settings.imports {
        quads.push(Quad::named(ontology, OWL_IMPORTS, import));
    }
    for (key, value) in &settings.extra {
        if !value.is_empty() {
            quads.push(Quad::literal(ontology, key, value));
        }
    }

    for (idx, row) in rows.iter().enumerate() {
        let subject = cell(row, SUBJECT_COL);
        let element_type = cell(row, ELEMENT_TYPE_COL);
        if subject.is_empty() || element_type.is_empty() {
            debug!("Skipping row {}: no subject or element type", idx + 1);
            continue;
        }

        quads.push(Quad::named(subject, RDF_TYPE, &format!("owl:{}", element_type)));

        let label = cell(row, LABEL_COL);
        if !label.is_empty() {
            quads.push(Quad::literal(subject, RDFS_LABEL, label));
        }
        let definition = cell(row, DEFINITION_COL);
        if !definition.is_empty() {
            quads.push(Quad::literal(subject, SKOS_DEFINITION, definition));
        }
        let is_a = cell(row, IS_A_COL);
        if let (Some(predicate), false) = (is_a_predicate_for(element_type), is_a.is_empty()) {
            quads.push(Quad::named(subject, predicate, is_a));
        }
        let defined_by = cell(row, IS_DEFINED_BY_COL);
        if !defined_by.is_empty() {
            quads.push(Quad::literal(subject, RDFS_IS_DEFINED_BY, defined_by));
        }

        for (i, predicate) in custom_predicates.iter().enumerate() {
            let value = cell(row, FIXED_COLUMN_COUNT + i);
            if !value.is_empty() {
                quads.push(Quad::literal(subject, predicate, value));
            }
        }
    }
    info!("Built {} quads from {} rows", quads.len(), rows.len());
    quads
}

/// The concrete syntaxes an export can be written in.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    #[serde(rename = "ttl")]
    Turtle,
    #[serde(rename = "rdf")]
    RdfXml,
    #[serde(rename = "jsonld")]
    JsonLd,
    #[serde(rename = "nt")]
    NTriples,
    #[serde(rename = "trig")]
    TriG,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Turtle,
        ExportFormat::RdfXml,
        ExportFormat::JsonLd,
        ExportFormat::NTriples,
        ExportFormat::TriG,
    ];

    /// Short key used to select the format; also the file extension.
    pub fn key(&self) -> &'static str {
        match self {
            ExportFormat::Turtle => "ttl",
            ExportFormat::RdfXml => "rdf",
            ExportFormat::JsonLd => "jsonld",
            ExportFormat::NTriples => "nt",
            ExportFormat::TriG => "trig",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.key()
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Turtle => "text/turtle",
            ExportFormat::RdfXml => "application/rdf+xml",
            ExportFormat::JsonLd => "application/ld+json",
            ExportFormat::NTriples => "application/n-triples",
            ExportFormat::TriG => "application/trig",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Turtle => "Turtle",
            ExportFormat::RdfXml => "RDF/XML",
            ExportFormat::JsonLd => "JSON-LD",
            ExportFormat::NTriples => "N-Triples",
            ExportFormat::TriG => "TriG",
        }
    }

    /// Parses a format key, falling back to Turtle for anything unrecognised.
    pub fn from_key_lenient(key: &str) -> Self {
        match key.parse() {
            Ok(format) => format,
            Err(_) => {
                warn!("Unknown export format {:?}; using Turtle", key);
                ExportFormat::Turtle
            }
        }
    }

    pub fn rdf_format(&self) -> Result<RdfFormat> {
        match self {
            ExportFormat::Turtle => Ok(RdfFormat::Turtle),
            ExportFormat::RdfXml => Ok(RdfFormat::RdfXml),
            ExportFormat::NTriples => Ok(RdfFormat::NTriples),
            ExportFormat::TriG => Ok(RdfFormat::TriG),
            ExportFormat::JsonLd => RdfFormat::from_extension("jsonld")
                .ok_or_else(|| anyhow!("JSON-LD is not supported by the RDF writer")),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .iter()
            .find(|f| f.key() == s)
            .copied()
            .ok_or_else(|| anyhow!("Unknown export format: {}", s))
    }
}

fn serialization_error(message: impl Into<String>) -> Error {
    let err = SerializationError {
        message: message.into(),
    };
    error!("{}", err);
    Error::new(err)
}

/// Writes `quads` in the given syntax. Every prefix in `prefixes` is declared to the writer
/// and used to resolve compact names in the quads; any term that does not resolve to an
/// absolute IRI fails the whole serialization.
pub fn serialize(quads: &[Quad], format: ExportFormat, prefixes: &PrefixMap) -> Result<String> {
    info!("Serializing {} quads as {}", quads.len(), format.name());
    let rdf_format = format
        .rdf_format()
        .map_err(|e| serialization_error(e.to_string()))?;
    let mut serializer = RdfSerializer::from_format(rdf_format);
    for (prefix, namespace) in prefixes.iter() {
        serializer = serializer.with_prefix(prefix, namespace).map_err(|e| {
            serialization_error(format!("invalid namespace for prefix {}: {}", prefix, e))
        })?;
    }

    let mut writer = serializer.for_writer(Vec::new());
    for quad in quads {
        let rdf_quad = quad
            .to_rdf(prefixes)
            .map_err(|e| serialization_error(format!("{} ({})", e, quad)))?;
        writer
            .serialize_quad(&rdf_quad)
            .map_err(|e| serialization_error(e.to_string()))?;
    }
    let bytes = writer
        .finish()
        .map_err(|e| serialization_error(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| serialization_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn settings() -> OntologySettings {
        OntologySettings {
            iri: "http://example.org/Onto".to_string(),
            label: "Onto".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_individual_is_a_uses_rdf_type() {
        let rows = vec![row(&["ex:Bob", "", "NamedIndividual", "", "ex:Person", ""])];
        let quads = build_quads(&rows, &settings(), &[]);
        assert!(quads.contains(&Quad::named("ex:Bob", "rdf:type", "owl:NamedIndividual")));
        assert!(quads.contains(&Quad::named("ex:Bob", "rdf:type", "ex:Person")));
    }

    #[test]
    fn test_unknown_element_type_has_no_is_a() {
        let rows = vec![row(&["ex:W", "", "Widget", "", "ex:Thing", ""])];
        let quads = build_quads(&rows, &settings(), &[]);
        assert!(quads.contains(&Quad::named("ex:W", "rdf:type", "owl:Widget")));
        assert!(!quads.iter().any(|q| q.object == Object::NamedNode("ex:Thing".into())));
    }

    #[test]
    fn test_export_format_keys() {
        assert_eq!("jsonld".parse::<ExportFormat>().unwrap(), ExportFormat::JsonLd);
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::from_key_lenient("xml"), ExportFormat::Turtle);
        assert_eq!(ExportFormat::RdfXml.mime_type(), "application/rdf+xml");
        assert_eq!(ExportFormat::TriG.extension(), "trig");
    }
}
