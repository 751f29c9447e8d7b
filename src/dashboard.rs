//! Summary counters shown above the job list.
//!
//! The aggregator never polls. Mutation call sites invoke
//! [`DashboardAggregator::refresh`] after the server confirms a change.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::gateway::JobsGateway;
use crate::lock;
use crate::models::DashboardResponse;
use crate::notify::Notifier;

#[derive(Debug, Default)]
struct DashboardView {
    snapshot: Option<DashboardResponse>,
    loading: bool,
    generation: u64,
}

/// Cloneable handle to the dashboard snapshot.
#[derive(Clone)]
pub struct DashboardAggregator {
    gateway: Arc<dyn JobsGateway>,
    notifier: Notifier,
    view: Arc<Mutex<DashboardView>>,
}

impl DashboardAggregator {
    pub fn new(gateway: Arc<dyn JobsGateway>, notifier: Notifier) -> Self {
        Self {
            gateway,
            notifier,
            view: Arc::new(Mutex::new(DashboardView::default())),
        }
    }

    /// Fetches a fresh snapshot and replaces the previous one wholesale.
    ///
    /// On failure the error is reported and the last snapshot stays. When
    /// refreshes overlap only the newest one is applied; an older response
    /// is returned to its caller but never replaces the snapshot.
    pub async fn refresh(&self) -> Result<DashboardResponse, AppError> {
        let generation = {
            let mut view = lock(&self.view);
            view.generation += 1;
            view.loading = true;
            view.generation
        };

        let result = self.gateway.dashboard().await;

        let mut view = lock(&self.view);
        if generation != view.generation {
            debug!("[DASHBOARD] dropping stale snapshot");
            return result;
        }
        view.loading = false;
        match result {
            Ok(dashboard) => {
                info!(
                    "[DASHBOARD] {} jobs, {} failed, {} waiting",
                    dashboard.summary.total_jobs,
                    dashboard.summary.failed_jobs,
                    dashboard.queue.waiting
                );
                view.snapshot = Some(dashboard.clone());
                Ok(dashboard)
            }
            Err(e) => {
                drop(view);
                warn!("[DASHBOARD] refresh failed: {}", e);
                self.notifier.report(&e);
                Err(e)
            }
        }
    }

    /// Last good snapshot, `None` before the first successful refresh.
    pub fn snapshot(&self) -> Option<DashboardResponse> {
        lock(&self.view).snapshot.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.view).loading
    }
}
