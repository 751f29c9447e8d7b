//! Logical import fields and their association with source columns.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Job attribute a source column can feed.
///
/// Variant order is the declaration order: required fields first, then
/// optional ones. Inference and iteration both follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportField {
    Title,
    Company,
    JobType,
    JobLocation,
    Description,
    Link,
    PublishedAt,
}

/// Fields that must be mapped before a batch can be built.
pub const REQUIRED_FIELDS: &[ImportField] = &[ImportField::Title];

pub const OPTIONAL_FIELDS: &[ImportField] = &[
    ImportField::Company,
    ImportField::JobType,
    ImportField::JobLocation,
    ImportField::Description,
    ImportField::Link,
    ImportField::PublishedAt,
];

impl ImportField {
    /// Name as it appears in the job payload.
    pub fn name(self) -> &'static str {
        match self {
            ImportField::Title => "title",
            ImportField::Company => "company",
            ImportField::JobType => "jobType",
            ImportField::JobLocation => "jobLocation",
            ImportField::Description => "description",
            ImportField::Link => "link",
            ImportField::PublishedAt => "publishedAt",
        }
    }

    pub fn is_required(self) -> bool {
        REQUIRED_FIELDS.contains(&self)
    }

    /// Required fields, then optional, in declaration order.
    pub fn all() -> impl Iterator<Item = ImportField> {
        REQUIRED_FIELDS.iter().chain(OPTIONAL_FIELDS.iter()).copied()
    }
}

impl fmt::Display for ImportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field → column association for one upload. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    fields: BTreeMap<ImportField, String>,
}

impl ColumnMapping {
    /// Picks, per field, the first column whose name contains the field name
    /// (case-insensitive). Fields with no match stay unmapped.
    pub fn infer(columns: &[String]) -> Self {
        let lowered: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();

        let fields = ImportField::all()
            .filter_map(|field| {
                let needle = field.name().to_lowercase();
                lowered
                    .iter()
                    .position(|col| col.contains(&needle))
                    .map(|idx| (field, columns[idx].clone()))
            })
            .collect();

        Self { fields }
    }

    pub fn get(&self, field: ImportField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Explicit override. An empty column unmaps the field.
    pub fn set(&mut self, field: ImportField, column: impl Into<String>) {
        let column = column.into();
        if column.is_empty() {
            self.fields.remove(&field);
        } else {
            self.fields.insert(field, column);
        }
    }

    /// Transition form of [`set`](Self::set): returns the updated mapping.
    pub fn with(mut self, field: ImportField, column: impl Into<String>) -> Self {
        self.set(field, column);
        self
    }

    /// Mapped pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ImportField, &str)> {
        self.fields.iter().map(|(f, c)| (*f, c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn missing_required(&self) -> Vec<ImportField> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|f| self.get(*f).map_or(true, str::is_empty))
            .collect()
    }

    /// True iff every required field has a non-empty column.
    pub fn is_valid(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Like [`is_valid`](Self::is_valid) but as a `ValidationError`.
    pub fn validate(&self) -> Result<(), AppError> {
        let missing = self.missing_required();
        if missing.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
        Err(AppError::Validation {
            field: names.join(", "),
            message: "Please map all required fields before importing.".to_string(),
        })
    }
}
