//! Turns the raw bytes of a spreadsheet file into rows and an optional header.

use crate::table::Row;
use anyhow::{anyhow, Result};
use csv::ReaderBuilder;
use log::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedTable {
    pub rows: Vec<Row>,
    pub header: Option<Vec<String>>,
}

pub trait TabularDecoder {
    /// Decodes `bytes` as a table in the format named by `extension` (lowercase, no dot).
    /// When `has_header_row` is set the first non-blank row becomes the header.
    fn decode(&self, bytes: &[u8], extension: &str, has_header_row: bool) -> Result<DecodedTable>;
}

/// Decoder for delimited text (`csv`, `tsv`). Blank rows are dropped and rows may have
/// differing lengths. Binary workbooks (`xls`, `xlsx`) need a different decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedDecoder;

impl DelimitedDecoder {
    fn delimiter_for(extension: &str) -> Result<u8> {
        match extension {
            "csv" => Ok(b','),
            "tsv" => Ok(b'\t'),
            "xls" | "xlsx" => Err(anyhow!(
                "binary workbook format .{} is not supported by the delimited text decoder",
                extension
            )),
            other => Err(anyhow!("cannot decode .{} as a table", other)),
        }
    }
}

impl TabularDecoder for DelimitedDecoder {
    fn decode(&self, bytes: &[u8], extension: &str, has_header_row: bool) -> Result<DecodedTable> {
        let delimiter = Self::delimiter_for(extension)?;
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(bytes);

        let mut all_rows: Vec<Row> = vec![];
        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| anyhow!("record {}: {}", idx + 1, e))?;
            if record.iter().all(|field| field.is_empty()) {
                debug!("Dropping blank record {}", idx + 1);
                continue;
            }
            all_rows.push(record.iter().map(|field| field.to_string()).collect());
        }

        let header = if has_header_row && !all_rows.is_empty() {
            Some(all_rows.remove(0))
        } else {
            None
        };
        info!(
            "Decoded {} rows from .{} input (header: {})",
            all_rows.len(),
            extension,
            header.is_some()
        );
        Ok(DecodedTable {
            rows: all_rows,
            header,
        })
    }
}
