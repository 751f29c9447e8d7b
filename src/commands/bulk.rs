//! Selection and bulk-action commands.

use crate::error::AppError;
use crate::state::AppState;

/// Flips one job on the current page. Returns whether it is now selected.
pub fn toggle_job_selection(state: &AppState, id: &str) -> bool {
    state.list.toggle_selected(id)
}

/// Selects the whole page, or clears it when already fully selected.
pub fn toggle_page_selection(state: &AppState) {
    state.list.toggle_all();
}

pub fn clear_job_selection(state: &AppState) {
    state.list.clear_selection();
}

/// Deletes the selected jobs. Returns the number deleted.
pub async fn bulk_delete_selected(state: &AppState) -> Result<u64, AppError> {
    state.bulk.delete_selected().await
}

/// Re-queues the selected jobs. Returns the number queued.
pub async fn bulk_retry_selected(state: &AppState) -> Result<u64, AppError> {
    state.bulk.retry_selected().await
}
