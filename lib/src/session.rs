//! `TableSession` owns all mutable sheet state (the table, the custom predicates, the
//! prefix map and the settings store) and runs every user-level operation against it.
//!
//! Each operation runs to completion before the next; a failed import or export returns
//! an error and leaves the table exactly as it was.

use crate::decode::{DecodedTable, TabularDecoder};
use crate::element::ElementType;
use crate::errors::{DecodeError, UnsupportedFormatError, ValidationFailedError};
use crate::format::{detect_format, parse_extension, FileFormat};
use crate::graph::{build_quads, serialize, ExportFormat, Quad};
use crate::merge::{merge, InsertMode, MergeStats};
use crate::predicates::{PredicateRegistry, ELEMENT_TYPE_COL, FIXED_HEADERS, IS_DEFINED_BY_COL};
use crate::prefixes::PrefixMap;
use crate::settings::{SettingsManager, SettingsStore};
use crate::table::{empty_row, normalize_row, MemoryTable, Row, TableStore};
use crate::validate::validate;
use anyhow::{anyhow, Error, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Write};
use std::path::Path;

/// The rows a fresh sheet starts with: a few sample entities and one blank row.
pub fn example_rows() -> Vec<Row> {
    let rows: [[&str; 6]; 5] = [
        ["ex:Person", "Person", "Class", "A human person.", "ex:Agent", "ex:ExampleOntology"],
        ["ex:Bob", "Bob", "NamedIndividual", "An instance of a Person.", "ex:Person", "ex:ExampleOntology"],
        [
            "ex:hasVehicle",
            "has vehicle",
            "ObjectProperty",
            "x hasVehicle y iff x possesses y and y is a Vehicle.",
            "ex:Owns",
            "ex:ExampleOntology",
        ],
        [
            "ex:Automobile",
            "Automobile",
            "Class",
            "A ground vehicle that is designed to transport passengers.",
            "ex:GroundVehicle",
            "ex:ExampleOntology",
        ],
        ["", "", "", "", "", ""],
    ];
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub stats: MergeStats,
    /// Header cells that matched no known column and were not imported.
    pub ignored_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub text: String,
    pub format: ExportFormat,
    pub mime_type: &'static str,
    pub file_name: String,
}

/// Everything needed to restore a session's table state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub rows: Vec<Row>,
    #[serde(default)]
    pub custom_predicates: Vec<String>,
    #[serde(default)]
    pub prefixes: PrefixMap,
}

impl SessionSnapshot {
    pub fn save_to_file(&self, file: &Path) -> Result<()> {
        let snapshot_str = serde_json::to_string_pretty(&self)?;
        let mut file = std::fs::File::create(file)?;
        file.write_all(snapshot_str.as_bytes())?;
        Ok(())
    }

    pub fn from_file(file: &Path) -> Result<Self> {
        let file = std::fs::File::open(file)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

pub struct TableSession<T: TableStore, S: SettingsStore> {
    table: T,
    predicates: PredicateRegistry,
    prefixes: PrefixMap,
    settings: SettingsManager<S>,
}

impl<S: SettingsStore> TableSession<MemoryTable, S> {
    pub fn from_snapshot(snapshot: SessionSnapshot, settings_store: S) -> Self {
        let predicates = PredicateRegistry::from_predicates(&snapshot.custom_predicates);
        let mut session = TableSession {
            table: MemoryTable::default(),
            predicates,
            prefixes: snapshot.prefixes,
            settings: SettingsManager::new(settings_store),
        };
        session.rebuild(snapshot.rows);
        session
    }
}

impl<T: TableStore, S: SettingsStore> TableSession<T, S> {
    /// Creates a session with no custom predicates and the default prefixes. The table is
    /// rebuilt so its headers and row widths match the fixed columns.
    pub fn new(table: T, settings_store: S) -> Self {
        let mut session = TableSession {
            table,
            predicates: PredicateRegistry::new(),
            prefixes: PrefixMap::default(),
            settings: SettingsManager::new(settings_store),
        };
        let rows = session.table.all_rows();
        session.rebuild(rows);
        session
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn rows(&self) -> Vec<Row> {
        self.table.all_rows()
    }

    pub fn predicates(&self) -> &PredicateRegistry {
        &self.predicates
    }

    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    pub fn prefixes_mut(&mut self) -> &mut PrefixMap {
        &mut self.prefixes
    }

    pub fn settings(&self) -> &SettingsManager<S> {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsManager<S> {
        &mut self.settings
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            rows: self.table.all_rows(),
            custom_predicates: self.predicates.custom_predicates().to_vec(),
            prefixes: self.prefixes.clone(),
        }
    }

    // full-table replace with every row normalized to the current column count
    fn rebuild(&mut self, rows: Vec<Row>) {
        let width = self.predicates.column_count();
        let rows = rows.into_iter().map(|r| normalize_row(r, width)).collect();
        self.table.replace_all(
            rows,
            self.predicates.column_headers(),
            self.predicates.column_defs(),
        );
    }

    /// Validates decoded rows and merges them into the table. Nothing is merged if any row
    /// fails validation; the error is a [`ValidationFailedError`] listing every problem.
    pub fn import_rows(
        &mut self,
        decoded: DecodedTable,
        has_header_row: bool,
        mode: InsertMode,
    ) -> Result<ImportReport> {
        let known = self.predicates.column_headers();
        let header = if has_header_row {
            decoded.header.as_deref()
        } else {
            None
        };
        let result = validate(Some(decoded.rows.as_slice()), header, &known, has_header_row);
        if !result.valid {
            warn!("Validation failed: {:?}", result.errors);
            return Err(Error::new(ValidationFailedError {
                errors: result.errors,
            }));
        }

        let outcome = merge(&self.table.all_rows(), &result.cleaned_rows, mode);
        self.rebuild(outcome.merged_rows);
        info!(
            "{} rows added ({} total)",
            outcome.stats.appended, outcome.stats.total
        );
        Ok(ImportReport {
            stats: outcome.stats,
            ignored_columns: result.ignored_columns,
        })
    }

    /// Decodes `bytes` (the contents of `filename`) and imports the rows.
    pub fn import_bytes(
        &mut self,
        filename: &str,
        bytes: &[u8],
        has_header_row: bool,
        mode: InsertMode,
        decoder: &dyn TabularDecoder,
    ) -> Result<ImportReport> {
        let extension = parse_extension(filename);
        if detect_format(&extension) != FileFormat::Spreadsheet {
            return Err(Error::new(UnsupportedFormatError { extension }));
        }
        let decoded = decoder
            .decode(bytes, &extension, has_header_row)
            .map_err(|e| {
                Error::new(DecodeError {
                    file: filename.to_string(),
                    message: e.to_string(),
                })
            })?;
        self.import_rows(decoded, has_header_row, mode)
    }

    pub fn import_file(
        &mut self,
        path: &Path,
        has_header_row: bool,
        mode: InsertMode,
        decoder: &dyn TabularDecoder,
    ) -> Result<ImportReport> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("Not a file path: {}", path.display()))?;
        let bytes = std::fs::read(path).map_err(|e| {
            Error::new(DecodeError {
                file: path.display().to_string(),
                message: e.to_string(),
            })
        })?;
        self.import_bytes(filename, &bytes, has_header_row, mode, decoder)
    }

    /// Registers a custom predicate and widens every row by one empty cell in the same step.
    /// Element-type cells holding anything other than a known type are cleared. Returns
    /// false, leaving the table untouched, if the predicate is empty or already present.
    pub fn add_custom_predicate(&mut self, iri: &str) -> bool {
        if !self.predicates.add_custom_predicate(iri) {
            return false;
        }
        let rows = self
            .table
            .all_rows()
            .into_iter()
            .map(|mut row| {
                if let Some(cell) = row.get_mut(ELEMENT_TYPE_COL) {
                    if cell.parse::<ElementType>().is_err() {
                        cell.clear();
                    }
                }
                row
            })
            .collect();
        self.rebuild(rows);
        true
    }

    /// Appends `n` blank rows.
    pub fn add_rows(&mut self, n: usize) -> Result<()> {
        if n < 1 {
            return Err(anyhow!("Please enter a valid number of rows to add."));
        }
        let width = self.predicates.column_count();
        let mut rows = self.table.all_rows();
        rows.extend(std::iter::repeat_with(|| empty_row(width)).take(n));
        self.rebuild(rows);
        info!("{} row(s) added to the table", n);
        Ok(())
    }

    /// Sets the "is defined by" cell to the ontology IRI on every row where it is empty.
    /// Returns the number of cells updated; does nothing if no ontology IRI is stored.
    pub fn fill_is_defined_by(&mut self) -> Result<usize> {
        let iri = match self.settings.stored()? {
            Some(settings) if !settings.iri.is_empty() => settings.iri,
            _ => {
                warn!("Ontology IRI not found in settings");
                return Ok(0);
            }
        };
        let column = self
            .table
            .column_headers()
            .iter()
            .position(|h| h == FIXED_HEADERS[IS_DEFINED_BY_COL]);
        let column = match column {
            Some(c) => c,
            None => {
                warn!("'is defined by' column not found in table");
                return Ok(0);
            }
        };

        let total = self.table.count_rows();
        let mut updated = 0;
        for row in 0..total {
            let empty = self
                .table
                .cell(row, column)
                .map(|v| v.is_empty())
                .unwrap_or(true);
            if empty {
                self.table.set_cell(row, column, &iri)?;
                updated += 1;
            }
        }
        info!("Set isDefinedBy for {} of {} rows", updated, total);
        Ok(updated)
    }

    /// Builds the quads for the current table, loading (or generating) ontology settings.
    pub fn build_quads(&mut self) -> Result<Vec<Quad>> {
        let settings = self.settings.load()?;
        if settings.iri.is_empty() {
            return Err(anyhow!("Ontology IRI is not set; update the ontology settings first"));
        }
        Ok(build_quads(
            &self.table.all_rows(),
            &settings,
            self.predicates.custom_predicates(),
        ))
    }

    pub fn export(&mut self, format: ExportFormat) -> Result<Export> {
        let quads = self.build_quads()?;
        let text = serialize(&quads, format, &self.prefixes)?;
        Ok(Export {
            text,
            format,
            mime_type: format.mime_type(),
            file_name: format!("ontology.{}", format.extension()),
        })
    }
}
