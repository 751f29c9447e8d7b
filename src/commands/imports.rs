//! CSV upload commands and the import history view.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::commands::reported;
use crate::error::AppError;
use crate::ingest::{ColumnMapping, ImportField, ImportSession};
use crate::models::UploadAck;
use crate::state::{AppState, Invalidation};

/// What the mapping step shows after a file is loaded or the mapping changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub columns: Vec<String>,
    /// First rows of the file, cell values in column order.
    pub preview: Vec<Vec<String>>,
    pub total_rows: usize,
    pub mapping: ColumnMapping,
    pub source_label: String,
    /// True when every required field is mapped.
    pub ready: bool,
}

impl ImportPreview {
    fn of(session: &ImportSession) -> Self {
        Self {
            columns: session.columns().to_vec(),
            preview: session.preview().iter().map(|r| r.values().to_vec()).collect(),
            total_rows: session.rows().len(),
            mapping: session.mapping().clone(),
            source_label: session.source_label().to_string(),
            ready: session.is_ready(),
        }
    }
}

/// Parses the file at `path` into the session and infers a mapping.
pub async fn load_import_file(state: &AppState, path: &Path) -> Result<ImportPreview, AppError> {
    let mut session = state.import.lock().await;
    reported(&state.notifier, session.load_file(path).await)?;
    Ok(ImportPreview::of(&session))
}

/// Same as [`load_import_file`] for an in-memory upload.
pub async fn load_import_bytes(state: &AppState, data: &[u8]) -> Result<ImportPreview, AppError> {
    let mut session = state.import.lock().await;
    reported(&state.notifier, session.load_bytes(data))?;
    Ok(ImportPreview::of(&session))
}

/// Overrides one field of the mapping. An empty column unmaps it.
pub async fn set_import_mapping(state: &AppState, field: ImportField, column: &str) -> ImportPreview {
    let mut session = state.import.lock().await;
    session.set_mapping(field, column);
    ImportPreview::of(&session)
}

pub async fn set_import_source(state: &AppState, label: &str) -> ImportPreview {
    let mut session = state.import.lock().await;
    session.set_source_label(label);
    ImportPreview::of(&session)
}

pub async fn import_preview(state: &AppState) -> ImportPreview {
    ImportPreview::of(&*state.import.lock().await)
}

/// Abandons the current upload.
pub async fn clear_import(state: &AppState) {
    state.import.lock().await.clear();
}

/// Queues the mapped rows for import.
///
/// On success the rows and mapping are cleared (the source label is kept)
/// and dashboard, list and history are
/// refetched. On failure the session is kept for a retry.
pub async fn submit_import(state: &AppState) -> Result<UploadAck, AppError> {
    let ack = {
        let mut session = state.import.lock().await;
        reported(&state.notifier, session.submit(&*state.gateway).await)?
    };

    if ack.queued == 0 {
        state.notifier.info("No rows to import");
        return Ok(ack);
    }

    info!("[IMPORT] upload accepted: {} queued", ack.queued);
    state
        .notifier
        .success(format!("Queued {} jobs for import", ack.queued));
    state.invalidate(Invalidation::ALL).await;
    Ok(ack)
}

/// Shows page `page` of the import run history.
pub async fn load_import_history(state: &AppState, page: u32) -> Result<(), AppError> {
    state.history.load(page).await
}
