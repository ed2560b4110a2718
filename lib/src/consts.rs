//! Defines constant NamedNodeRefs and compact names for the RDF terms the sheet emits,
//! primarily from OWL, RDF, RDFS, SKOS and DCTERMS, plus the default prefix set.

use oxigraph::model::NamedNodeRef;

pub const ONTOLOGY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Ontology");
pub const IMPORTS: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#imports");
pub const TYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
pub const LABEL: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#label");
pub const DEFINED_BY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#isDefinedBy");
pub const DEFINITION: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#definition");

// compact names as they appear in emitted quads; resolved against the prefix map on output
pub const RDF_TYPE: &str = "rdf:type";
pub const OWL_ONTOLOGY: &str = "owl:Ontology";
pub const OWL_IMPORTS: &str = "owl:imports";
pub const OWL_VERSION_IRI: &str = "owl:versionIRI";
pub const OWL_VERSION_INFO: &str = "owl:versionInfo";
pub const RDFS_LABEL: &str = "rdfs:label";
pub const RDFS_SUBCLASS_OF: &str = "rdfs:subClassOf";
pub const RDFS_SUBPROPERTY_OF: &str = "rdfs:subPropertyOf";
pub const RDFS_IS_DEFINED_BY: &str = "rdfs:isDefinedBy";
pub const SKOS_DEFINITION: &str = "skos:definition";
pub const DCTERMS_CREATOR: &str = "dcterms:creator";
pub const DCTERMS_DESCRIPTION: &str = "dcterms:description";

/// Key under which the ontology settings are persisted in a settings store.
pub const SETTINGS_KEY: &str = "ontologySettings";
/// Prefix of settings-store keys that hold raw imported ontology text.
pub const IMPORT_KEY_PREFIX: &str = "import:";

pub const DEFAULT_PREFIXES: [(&str, &str); 10] = [
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("obo", "http://purl.obolibrary.org/obo/"),
    ("cco", "https://www.commoncoreontologies.org/"),
    ("iofcore", "https://spec.industrialontologies.org/ontology/core/"),
    ("ex", "http://example.org/"),
];

// defaults used when settings are generated without user input
pub const DEFAULT_BASE_IRI: &str = "http://example.org";
pub const DEFAULT_LABEL: &str = "Example Ontology";
pub const DEFAULT_CREATOR: &str = "Barry Guarino";
pub const DEFAULT_DESCRIPTION: &str = "An example ontology";
pub const DEFAULT_DELIMITER: &str = "/";
