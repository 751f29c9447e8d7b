//! Single-job commands: view, create, update, delete.

use tracing::info;

use crate::commands::reported;
use crate::error::AppError;
use crate::jobs::JobDraft;
use crate::models::Job;
use crate::state::{AppState, Invalidation};

/// Fetches one job for the detail view.
pub async fn view_job(state: &AppState, id: &str) -> Result<Job, AppError> {
    reported(&state.notifier, state.gateway.get_job(id).await)
}

/// Validates `draft` locally, then creates the job.
pub async fn create_job(state: &AppState, draft: JobDraft) -> Result<Job, AppError> {
    reported(&state.notifier, draft.validate())?;

    let payload = draft.into_payload();
    let job = reported(&state.notifier, state.gateway.create_job(&payload).await)?;

    info!("[JOBS] created {}", job.id);
    state.notifier.success("Job created successfully");
    state.invalidate(Invalidation::JOBS).await;
    Ok(job)
}

/// Validates `draft` locally, then replaces the job's fields.
pub async fn update_job(state: &AppState, id: &str, draft: JobDraft) -> Result<Job, AppError> {
    reported(&state.notifier, draft.validate())?;

    let payload = draft.into_payload();
    let job = reported(&state.notifier, state.gateway.update_job(id, &payload).await)?;

    info!("[JOBS] updated {}", job.id);
    state.notifier.success("Job updated successfully");
    state.invalidate(Invalidation::JOBS).await;
    Ok(job)
}

pub async fn delete_job(state: &AppState, id: &str) -> Result<u64, AppError> {
    let response = reported(&state.notifier, state.gateway.delete_job(id).await)?;

    info!("[JOBS] deleted {} ({})", id, response.message);
    state.notifier.success("Job deleted successfully");
    state.invalidate(Invalidation::JOBS).await;
    Ok(response.deleted)
}
