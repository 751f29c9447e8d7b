//! One in-progress manual upload: parsed rows, the current mapping and the
//! source label.
//!
//! A session is one-shot. A successful submit clears it; a failed submit
//! leaves it untouched so the user can retry without reloading the file.

use std::path::Path;

use tracing::{info, warn};

use crate::error::AppError;
use crate::gateway::JobsGateway;
use crate::ingest::batch::build_batch;
use crate::ingest::mapping::{ColumnMapping, ImportField};
use crate::ingest::parser::{self, CsvRow, CsvTable};
use crate::models::{ImportJobPayload, UploadAck, UploadRequest};

/// Rows shown by the mapping preview.
pub const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone)]
pub struct ImportSession {
    table: CsvTable,
    mapping: ColumnMapping,
    source_label: String,
    default_label: String,
}

impl ImportSession {
    pub fn new(default_label: impl Into<String>) -> Self {
        let default_label = default_label.into();
        Self {
            table: CsvTable::default(),
            mapping: ColumnMapping::default(),
            source_label: default_label.clone(),
            default_label,
        }
    }

    /// Replaces the session contents with a freshly parsed upload and
    /// re-infers the mapping. On error the previous contents are kept.
    pub fn load_bytes(&mut self, data: &[u8]) -> Result<(), AppError> {
        let table = parser::parse_bytes(data)?;
        self.replace(table);
        Ok(())
    }

    pub async fn load_file(&mut self, path: &Path) -> Result<(), AppError> {
        let table = parser::parse_file(path).await?;
        self.replace(table);
        Ok(())
    }

    fn replace(&mut self, table: CsvTable) {
        self.mapping = ColumnMapping::infer(table.columns());
        info!(
            "[IMPORT] loaded {} rows, {} fields mapped",
            table.len(),
            self.mapping.len()
        );
        self.table = table;
    }

    pub fn columns(&self) -> &[String] {
        self.table.columns()
    }

    pub fn rows(&self) -> &[CsvRow] {
        self.table.rows()
    }

    pub fn table(&self) -> &CsvTable {
        &self.table
    }

    pub fn preview(&self) -> &[CsvRow] {
        self.table.preview(PREVIEW_ROWS)
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// User override of one field. An empty column unmaps it.
    pub fn set_mapping(&mut self, field: ImportField, column: impl Into<String>) {
        self.mapping.set(field, column);
    }

    pub fn is_ready(&self) -> bool {
        self.mapping.is_valid()
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn set_source_label(&mut self, label: impl Into<String>) {
        self.source_label = label.into();
    }

    pub fn build_batch(&self) -> Result<Vec<ImportJobPayload>, AppError> {
        build_batch(&self.table, &self.mapping)
    }

    /// Sends the whole batch as a single upload.
    ///
    /// The mapping is checked before anything goes on the wire. An empty batch
    /// is a legal no-op that reports zero queued without a network call.
    pub async fn submit(&mut self, gateway: &dyn JobsGateway) -> Result<UploadAck, AppError> {
        let jobs = self.build_batch()?;

        if jobs.is_empty() {
            info!("[IMPORT] nothing to submit");
            return Ok(UploadAck {
                queued: 0,
                message: None,
            });
        }

        let count = jobs.len() as u64;
        let request = UploadRequest {
            jobs,
            source: self.source_label.clone(),
        };

        match gateway.upload_jobs(&request).await {
            Ok(mut ack) => {
                if ack.queued == 0 {
                    ack.queued = count;
                }
                info!("[IMPORT] queued {} jobs from '{}'", ack.queued, request.source);
                self.discard_upload();
                Ok(ack)
            }
            Err(e) => {
                warn!("[IMPORT] upload failed, keeping {} rows: {}", count, e);
                Err(e)
            }
        }
    }

    /// Drops rows, columns and mapping, and restores the default label.
    pub fn clear(&mut self) {
        self.discard_upload();
        self.source_label = self.default_label.clone();
    }

    /// Drops rows, columns and mapping. The source label stays for the next
    /// upload.
    fn discard_upload(&mut self) {
        self.table = CsvTable::default();
        self.mapping = ColumnMapping::default();
    }
}
