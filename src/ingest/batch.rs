//! Row-to-payload transformation.

use crate::error::AppError;
use crate::ingest::mapping::{ColumnMapping, ImportField};
use crate::ingest::parser::{CsvRow, CsvTable};
use crate::models::ImportJobPayload;

/// Builds one payload per row, in row order.
///
/// Mapped cells are trimmed. Unmapped fields, and fields mapped to a column
/// the file does not have, stay `None`. Rows are never dropped, even when the
/// title ends up empty; per-row content is checked by the worker.
///
/// # Errors
///
/// `AppError::Validation` if the mapping does not cover every required field.
pub fn build_batch(
    table: &CsvTable,
    mapping: &ColumnMapping,
) -> Result<Vec<ImportJobPayload>, AppError> {
    mapping.validate()?;

    // Resolve column positions once; duplicates resolve to the first.
    let resolved: Vec<(ImportField, usize)> = mapping
        .iter()
        .filter_map(|(field, column)| table.column_index(column).map(|idx| (field, idx)))
        .collect();

    Ok(table
        .rows()
        .iter()
        .map(|row| row_payload(row, &resolved))
        .collect())
}

fn row_payload(row: &CsvRow, resolved: &[(ImportField, usize)]) -> ImportJobPayload {
    let mut payload = ImportJobPayload::default();

    for (field, idx) in resolved {
        let Some(raw) = row.values().get(*idx) else {
            continue;
        };
        let value = Some(raw.trim().to_string());
        match field {
            ImportField::Title => payload.title = value,
            ImportField::Company => payload.company = value,
            ImportField::JobType => payload.job_type = value,
            ImportField::JobLocation => payload.job_location = value,
            ImportField::Description => payload.description = value,
            ImportField::Link => payload.link = value,
            ImportField::PublishedAt => payload.published_at = value,
        }
    }

    payload
}
