//! Combines validated rows with the rows already in the table.

use crate::errors::InvalidInsertModeError;
use crate::table::Row;
use anyhow::{Error, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InsertMode {
    #[default]
    Append,
    Replace,
}

impl InsertMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertMode::Append => "append",
            InsertMode::Replace => "replace",
        }
    }

    /// Parses `mode`, treating anything other than "replace" as append.
    ///
    /// Prefer [`InsertMode::from_str`] at user-facing boundaries; it rejects unknown modes.
    pub fn from_str_lenient(mode: &str) -> Self {
        match mode.parse() {
            Ok(mode) => mode,
            Err(_) => {
                warn!("Unknown insert mode {:?}. Defaulting to append.", mode);
                InsertMode::Append
            }
        }
    }
}

impl std::fmt::Display for InsertMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsertMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(InsertMode::Append),
            "replace" => Ok(InsertMode::Replace),
            _ => Err(Error::new(InvalidInsertModeError {
                mode: s.to_string(),
            })),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    /// Rows in the table before the merge.
    pub original: usize,
    /// Rows supplied by the import.
    pub appended: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub merged_rows: Vec<Row>,
    pub stats: MergeStats,
}

/// Returns a new row sequence built from `current_rows` and `new_rows`. Neither input is
/// modified.
pub fn merge(current_rows: &[Row], new_rows: &[Row], mode: InsertMode) -> MergeOutcome {
    info!("Merging with mode: {}", mode);
    let merged_rows: Vec<Row> = match mode {
        InsertMode::Replace => {
            info!(
                "Replacing all {} rows with {} new rows",
                current_rows.len(),
                new_rows.len()
            );
            new_rows.to_vec()
        }
        InsertMode::Append => {
            info!(
                "Appending {} rows to existing {} rows",
                new_rows.len(),
                current_rows.len()
            );
            current_rows.iter().chain(new_rows.iter()).cloned().collect()
        }
    };
    let stats = MergeStats {
        original: current_rows.len(),
        appended: new_rows.len(),
        total: merged_rows.len(),
    };
    info!("Merge complete: {:?}", stats);
    MergeOutcome { merged_rows, stats }
}
