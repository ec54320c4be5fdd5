//! Reading raw CSV exports into [`Table`]s.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use rtx_model::Table;
use tracing::debug;

use crate::error::{IngestError, Result};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a CSV export from disk. The first non-blank record is the header.
///
/// # Errors
///
/// Fails when the file cannot be opened or parsed, or when it holds no
/// records at all ([`ModelError::MissingHeader`]).
pub fn read_table(path: &Path, name: &str) -> Result<Table> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::io(path, source))?;
    read_table_from_reader(file, name, path)
}

/// Read a CSV export from any reader; `source` is only used in error messages.
pub fn read_table_from_reader<R: Read>(reader: R, name: &str, source: &Path) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| IngestError::csv(source, err))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let normalize = if records.is_empty() {
            normalize_header
        } else {
            normalize_cell
        };
        records.push(record.iter().map(normalize).collect());
    }
    let table = Table::from_records(name, records)?;
    debug!(
        table = name,
        source_file = %source.display(),
        columns = table.width(),
        rows = table.height(),
        "read export"
    );
    Ok(table)
}
