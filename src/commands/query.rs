//! Job list commands: query changes, paging, refresh and export.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::commands::reported;
use crate::error::AppError;
use crate::export::export_jobs_csv;
use crate::listing::{ListSnapshot, QueryPatch, SortDirection, StatusFilter};
use crate::state::AppState;

/// Free-text search. Debounced; resets to page 1.
pub async fn search_jobs(state: &AppState, text: &str) {
    state.list.set_query(QueryPatch::search(text)).await;
}

/// Status filter change. Resets to page 1.
pub async fn filter_jobs(state: &AppState, status: StatusFilter) {
    state.list.set_query(QueryPatch::status(status)).await;
}

/// Sort direction change. Resets to page 1.
pub async fn sort_jobs(state: &AppState, sort: SortDirection) {
    state.list.set_query(QueryPatch::sort(sort)).await;
}

/// Jumps to `page`, fetching immediately.
pub async fn go_to_page(state: &AppState, page: u32) {
    state.list.set_query(QueryPatch::page(page)).await;
}

pub async fn refresh_jobs(state: &AppState) {
    state.list.refresh().await;
}

pub fn list_snapshot(state: &AppState) -> ListSnapshot {
    state.list.snapshot()
}

/// Writes the jobs currently shown to a dated CSV in `dir`.
pub fn export_current_page(state: &AppState, dir: &Path) -> Result<PathBuf, AppError> {
    let jobs = state.list.jobs();
    let path = reported(
        &state.notifier,
        export_jobs_csv(&jobs, dir, Local::now().date_naive()),
    )?;
    state
        .notifier
        .success(format!("Exported {} jobs", jobs.len()));
    Ok(path)
}
