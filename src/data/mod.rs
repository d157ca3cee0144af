//! Record loading: turns a spreadsheet export into participant groups

use anyhow::Result;
use polars::prelude::*;
use log;

/// Split one delimited cell into trimmed, non-empty participant labels
pub fn split_participants(cell: &str, delimiter: &str) -> Vec<String> {
    cell.split(delimiter)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Load participant groups from a CSV file.
///
/// `column` names the cell holding the delimited participant list; rows with
/// a null cell are skipped. Groups that end up empty are kept and ignored
/// downstream by the graph builder.
pub fn load_records(path: &str, column: &str, delimiter: &str) -> Result<Vec<Vec<String>>> {
    log::info!("Reading records from: {}", path);

    // Check if the file exists
    if !std::path::Path::new(path).exists() {
        return Err(anyhow::anyhow!("File not found: {}", path));
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()?
        .collect()?;

    log::info!("Loaded {} rows", df.height());

    let cells = df.column(column)?.str()?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if let Some(cell) = cells.get(i) {
            records.push(split_participants(cell, delimiter));
        }
    }

    log::info!("Extracted {} participant groups", records.len());

    Ok(records)
}
