//! Bulk retry and bulk delete over the current selection.

use std::sync::Arc;

use tracing::{info, warn};

use crate::dashboard::DashboardAggregator;
use crate::error::AppError;
use crate::gateway::JobsGateway;
use crate::listing::controller::ListController;
use crate::notify::Notifier;

/// Which bulk endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Delete,
    Retry,
}

impl BulkAction {
    fn success_message(self, count: u64) -> String {
        match self {
            BulkAction::Delete => format!("Deleted {} jobs", count),
            BulkAction::Retry => format!("Queued {} jobs for retry", count),
        }
    }
}

/// Issues bulk actions and invalidates the views they affect.
#[derive(Clone)]
pub struct BulkCoordinator {
    gateway: Arc<dyn JobsGateway>,
    notifier: Notifier,
    list: ListController,
    dashboard: DashboardAggregator,
}

impl BulkCoordinator {
    pub fn new(
        gateway: Arc<dyn JobsGateway>,
        notifier: Notifier,
        list: ListController,
        dashboard: DashboardAggregator,
    ) -> Self {
        Self {
            gateway,
            notifier,
            list,
            dashboard,
        }
    }

    pub async fn bulk_delete(&self, ids: &[String]) -> Result<u64, AppError> {
        self.run(BulkAction::Delete, ids).await
    }

    pub async fn bulk_retry(&self, ids: &[String]) -> Result<u64, AppError> {
        self.run(BulkAction::Retry, ids).await
    }

    pub async fn delete_selected(&self) -> Result<u64, AppError> {
        let ids = self.list.selected_ids();
        self.bulk_delete(&ids).await
    }

    pub async fn retry_selected(&self) -> Result<u64, AppError> {
        let ids = self.list.selected_ids();
        self.bulk_retry(&ids).await
    }

    /// An empty id set is a no-op. On success the count is reported, the
    /// selection cleared, and list and dashboard refetched. On failure the
    /// error is reported and the selection kept.
    async fn run(&self, action: BulkAction, ids: &[String]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        info!("[BULK] {:?} of {} jobs", action, ids.len());
        let result = match action {
            BulkAction::Delete => self.gateway.bulk_delete(ids).await.map(|r| r.deleted),
            BulkAction::Retry => self.gateway.bulk_retry(ids).await.map(|r| r.queued),
        };

        let count = match result {
            Ok(count) => count,
            Err(e) => {
                warn!("[BULK] {:?} failed: {}", action, e);
                self.notifier.report(&e);
                return Err(e);
            }
        };

        self.notifier.success(action.success_message(count));
        self.list.clear_selection();

        // Both refreshes report their own failures.
        let (_, _) = tokio::join!(self.list.refresh(), self.dashboard.refresh());

        Ok(count)
    }
}
