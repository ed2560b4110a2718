//! Prefix name to namespace IRI mapping used to resolve compact names on export.

use crate::consts::DEFAULT_PREFIXES;
use anyhow::{anyhow, Result};
use log::{info, warn};
use oxigraph::model::NamedNode;
use serde::{Deserialize, Serialize};

/// An insertion-ordered map from prefix name to namespace IRI with unique names.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PrefixMap {
    entries: Vec<(String, String)>,
}

impl Default for PrefixMap {
    fn default() -> Self {
        Self {
            entries: DEFAULT_PREFIXES
                .iter()
                .map(|(p, ns)| (p.to_string(), ns.to_string()))
                .collect(),
        }
    }
}

impl PrefixMap {
    pub fn empty() -> Self {
        Self { entries: vec![] }
    }

    /// Adds a prefix. Returns false if either side is empty or the prefix is already defined.
    pub fn add(&mut self, prefix: &str, namespace: &str) -> bool {
        let prefix = prefix.trim();
        let namespace = namespace.trim();
        if prefix.is_empty() || namespace.is_empty() {
            return false;
        }
        if self.get(prefix).is_some() {
            warn!("Prefix already exists: {}", prefix);
            return false;
        }
        self.entries.push((prefix.to_string(), namespace.to_string()));
        info!("Added prefix {}: <{}>", prefix, namespace);
        true
    }

    /// Removes a prefix, returning its namespace if it was defined.
    pub fn remove(&mut self, prefix: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(p, _)| p == prefix)?;
        let (_, namespace) = self.entries.remove(idx);
        info!("Removed prefix {}", prefix);
        Some(namespace)
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, ns)| ns.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expands `prefix:local` when the prefix is defined; otherwise returns the term unchanged.
    /// Angle brackets around a full IRI are stripped.
    pub fn expand(&self, term: &str) -> String {
        let term = term.trim();
        if let Some(iri) = term.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
            return iri.to_string();
        }
        if let Some((prefix, local)) = term.split_once(':') {
            if let Some(namespace) = self.get(prefix) {
                return format!("{}{}", namespace, local);
            }
        }
        term.to_string()
    }

    /// Expands `term` and checks that the result is an absolute IRI.
    pub fn resolve(&self, term: &str) -> Result<NamedNode> {
        let expanded = self.expand(term);
        NamedNode::new(expanded.as_str())
            .map_err(|e| anyhow!("Cannot resolve {:?} to an IRI: {}", term, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{DEFINITION, TYPE};

    #[test]
    fn test_default_prefixes() {
        let prefixes = PrefixMap::default();
        assert_eq!(prefixes.len(), 10);
        assert_eq!(prefixes.get("skos"), Some("http://www.w3.org/2004/02/skos/core#"));
        let names: Vec<&str> = prefixes.iter().map(|(p, _)| p).collect();
        assert_eq!(names[0], "owl");
        assert_eq!(names[9], "ex");
    }

    #[test]
    fn test_add_remove() {
        let mut prefixes = PrefixMap::empty();
        assert!(prefixes.add("bfo", "http://purl.obolibrary.org/obo/BFO_"));
        assert!(!prefixes.add("bfo", "http://other.org/"));
        assert!(!prefixes.add("", "http://other.org/"));
        assert!(!prefixes.add("x", " "));
        assert_eq!(prefixes.remove("bfo").as_deref(), Some("http://purl.obolibrary.org/obo/BFO_"));
        assert_eq!(prefixes.remove("bfo"), None);
        assert!(prefixes.is_empty());
    }

    #[test]
    fn test_resolve() {
        let prefixes = PrefixMap::default();
        assert_eq!(prefixes.resolve("rdf:type").unwrap().as_ref(), TYPE);
        assert_eq!(prefixes.resolve("skos:definition").unwrap().as_ref(), DEFINITION);
        assert_eq!(
            prefixes.resolve("<http://example.org/Dog>").unwrap().as_str(),
            "http://example.org/Dog"
        );
        assert_eq!(
            prefixes.resolve("urn:isbn:123").unwrap().as_str(),
            "urn:isbn:123"
        );
        assert!(prefixes.resolve("no prefix here").is_err());
    }
}
