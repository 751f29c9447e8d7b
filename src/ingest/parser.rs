//! Header-delimited file parsing for manual imports.
//!
//! Parsing is all-or-nothing for structural problems (encoding, missing
//! header, ragged rows). Empty cells are fine and come
//! back as empty strings.

use std::io::Cursor;
use std::path::Path;

use tracing::info;

use crate::error::AppError;

/// UTF-8 BOM bytes.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// One data row, values positionally aligned with [`CsvTable::columns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    values: Vec<String>,
}

impl CsvRow {
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// A parsed file: ordered column names and ordered rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    columns: Vec<String>,
    rows: Vec<CsvRow>,
}

impl CsvTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[CsvRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with this exact name. Duplicate names
    /// always resolve to the first occurrence.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell of `row` under the column named `column`.
    pub fn value<'a>(&self, row: &'a CsvRow, column: &str) -> Option<&'a str> {
        self.column_index(column)
            .and_then(|idx| row.values.get(idx))
            .map(String::as_str)
    }

    /// First `n` rows, for the mapping preview.
    pub fn preview(&self, n: usize) -> &[CsvRow] {
        &self.rows[..self.rows.len().min(n)]
    }
}

/// Parses an in-memory upload.
///
/// # Errors
///
/// - `AppError::EmptyFile` - no bytes (or only a BOM)
/// - `AppError::NotUtf8` - invalid encoding
/// - `AppError::CsvInvalid` - missing header, or a row whose column count
///   differs from the header
pub fn parse_bytes(data: &[u8]) -> Result<CsvTable, AppError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    if data.is_empty() {
        return Err(AppError::EmptyFile);
    }
    if std::str::from_utf8(data).is_err() {
        return Err(AppError::NotUtf8);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        // Ragged rows are reported below with a row number.
        .flexible(true)
        .from_reader(Cursor::new(data));

    let columns: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    if columns.is_empty() || columns.iter().all(|c| c.trim().is_empty()) {
        return Err(AppError::CsvInvalid("missing header row".to_string()));
    }

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;

        if is_blank_record(&record) {
            continue;
        }

        if record.len() != columns.len() {
            // Line in the file, so skipped blank lines still count.
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 2);
            return Err(AppError::CsvInvalid(format!(
                "row {} has {} fields, expected {}",
                line,
                record.len(),
                columns.len()
            )));
        }

        rows.push(CsvRow {
            values: record.iter().map(String::from).collect(),
        });
    }

    info!(
        "[IMPORT] parsed {} rows across {} columns",
        rows.len(),
        columns.len()
    );

    Ok(CsvTable { columns, rows })
}

/// Reads and parses a file from disk.
pub async fn parse_file(path: &Path) -> Result<CsvTable, AppError> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    parse_bytes(&data)
}

/// A whitespace-only line parses as a single blank field.
fn is_blank_record(record: &csv::StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|f| f.trim().is_empty())
}
