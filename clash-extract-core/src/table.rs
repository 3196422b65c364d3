//! CSV table reader for exported game-data tables.
//!
//! Exports start with a header row followed by a row of type annotations
//! (`String`, `int`, `boolean`, ...). The annotation row carries no data and
//! is always discarded.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::ExtractError;
use crate::record::Row;

/// Headers plus every data row of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Position of a header, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Read a table from a CSV file on disk.
pub fn read_table_file(path: &Path) -> Result<Table, ExtractError> {
    let file = File::open(path)?;
    let table = read_table(file)?;
    log::debug!(
        "Read {} rows ({} columns) from {}",
        table.rows.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

/// Read a table from any CSV byte stream.
///
/// Short rows are padded with empty cells, long rows are cut to the header
/// width, and every cell is trimmed. A stream that ends before the type row
/// yields the headers with no rows.
pub fn read_table<R: Read>(reader: R) -> Result<Table, ExtractError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = reader.records();

    let headers: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(|h| h.to_string()).collect(),
        None => return Ok(Table::default()),
    };

    // Type annotation row
    if records.next().transpose()?.is_none() {
        return Ok(Table {
            headers,
            rows: Vec::new(),
        });
    }

    let mut rows = Vec::new();
    for result in records {
        let record = result?;
        // Blank lines carry no fields; a quoted empty cell (`""`) is a row.
        if record.is_empty() {
            continue;
        }

        let mut row = Row::new();
        for (i, header) in headers.iter().enumerate() {
            row.set(header.as_str(), record.get(i).unwrap_or("").trim());
        }
        rows.push(row);
    }

    Ok(Table { headers, rows })
}
