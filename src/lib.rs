//! Core of the job-import operator console.
//!
//! The crate turns CSV uploads into import batches and keeps a paginated,
//! filtered view of remote jobs consistent while the user searches, pages
//! and runs bulk actions. All remote access goes through
//! [`gateway::JobsGateway`]; all user-facing outcomes go through
//! [`notify::Notifier`].

pub mod commands;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod gateway;
pub mod history;
pub mod ingest;
pub mod jobs;
pub mod listing;
pub mod logging;
pub mod models;
pub mod notify;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::{Mutex, MutexGuard};

pub use config::ConsoleConfig;
pub use error::AppError;
pub use state::AppState;

/// Locks `mutex`, recovering the guard if a panicking holder poisoned it.
/// Every guarded value here is left consistent between statements.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
