//! ontosheet turns a spreadsheet of ontology terms into an OWL ontology.
//!
//! Rows are validated and merged into a [`session::TableSession`], which combines them with
//! generated ontology settings and writes RDF through oxigraph's serializers.

extern crate derive_builder;

pub mod config;
pub mod consts;
pub mod decode;
pub mod element;
pub mod errors;
pub mod format;
pub mod graph;
pub mod merge;
pub mod predicates;
pub mod prefixes;
pub mod session;
pub mod settings;
pub mod table;
pub mod validate;
pub mod workspace;

pub use config::Config;
pub use graph::{ExportFormat, Quad};
pub use merge::InsertMode;
pub use session::TableSession;
pub use workspace::Workspace;

pub fn init_logging() {
    // ONTOSHEET_LOG takes precedence over RUST_LOG
    if let Ok(log_level) = std::env::var("ONTOSHEET_LOG") {
        std::env::set_var("RUST_LOG", log_level);
    }
}
