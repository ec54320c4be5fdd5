//! Writing produced frames through polars.

use std::collections::BTreeMap;
use std::path::Path;

use polars::prelude::{Column, CsvWriter, DataFrame, IntoColumn, NamedFrom, SerWriter, Series};
use rtx_model::Table;
use tracing::info;

use crate::error::{IngestError, Result};

/// Convert a table into a DataFrame of string columns.
///
/// Repeated header names get a numeric suffix (`Value`, `Value_2`) since
/// DataFrame column names must be unique.
pub fn table_to_dataframe(table: &Table) -> Result<DataFrame> {
    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
    let mut columns: Vec<Column> = Vec::with_capacity(table.width());
    for (idx, header) in table.headers.iter().enumerate() {
        let count = seen.entry(header.as_str()).or_insert(0);
        *count += 1;
        let name = if *count == 1 {
            header.clone()
        } else {
            format!("{header}_{count}")
        };
        let values: Vec<String> = table
            .rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or_default())
            .collect();
        columns.push(Series::new(name.as_str().into(), values).into_column());
    }
    DataFrame::new(columns).map_err(|source| IngestError::Output {
        table: table.name.clone(),
        source,
    })
}

/// Write a table as CSV with a header row.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    let mut df = table_to_dataframe(table)?;
    let mut file = std::fs::File::create(path).map_err(|source| IngestError::io(path, source))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|source| IngestError::Output {
            table: table.name.clone(),
            source,
        })?;
    info!(
        table = %table.name,
        output_file = %path.display(),
        rows = table.height(),
        "wrote frame"
    );
    Ok(())
}
