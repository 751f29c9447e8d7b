//! Paginated import run history.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::gateway::JobsGateway;
use crate::lock;
use crate::models::{ImportLog, PaginatedResponse, Pagination};
use crate::notify::Notifier;

const DEFAULT_PAGE_LIMIT: u32 = 10;

#[derive(Debug)]
struct HistoryView {
    page: u32,
    logs: PaginatedResponse<ImportLog>,
    loading: bool,
    generation: u64,
}

/// Cloneable handle to the import history view.
#[derive(Clone)]
pub struct ImportHistory {
    gateway: Arc<dyn JobsGateway>,
    notifier: Notifier,
    view: Arc<Mutex<HistoryView>>,
}

impl ImportHistory {
    pub fn new(gateway: Arc<dyn JobsGateway>, notifier: Notifier) -> Self {
        Self {
            gateway,
            notifier,
            view: Arc::new(Mutex::new(HistoryView {
                page: 1,
                logs: PaginatedResponse::empty(DEFAULT_PAGE_LIMIT),
                loading: false,
                generation: 0,
            })),
        }
    }

    /// Loads `page` (clamped to at least 1). Only the newest load is applied;
    /// on failure the previous logs stay visible.
    pub async fn load(&self, page: u32) -> Result<(), AppError> {
        let page = page.max(1);
        let generation = {
            let mut view = lock(&self.view);
            view.page = page;
            view.generation += 1;
            view.loading = true;
            view.generation
        };

        let result = self.gateway.list_import_logs(page).await;

        let mut view = lock(&self.view);
        if generation != view.generation {
            debug!("[HISTORY] dropping stale page {}", page);
            return Ok(());
        }
        view.loading = false;

        match result {
            Ok(logs) => {
                info!(
                    "[HISTORY] page {}/{} with {} runs",
                    logs.pagination.page,
                    logs.pagination.pages,
                    logs.data.len()
                );
                view.logs = logs;
                Ok(())
            }
            Err(e) => {
                drop(view);
                warn!("[HISTORY] load failed: {}", e);
                self.notifier.report(&e);
                Err(e)
            }
        }
    }

    /// Reloads the current page.
    pub async fn refresh(&self) -> Result<(), AppError> {
        let page = lock(&self.view).page;
        self.load(page).await
    }

    pub fn logs(&self) -> Vec<ImportLog> {
        lock(&self.view).logs.data.clone()
    }

    pub fn pagination(&self) -> Pagination {
        lock(&self.view).logs.pagination
    }

    pub fn current_page(&self) -> u32 {
        lock(&self.view).page
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.view).loading
    }
}
