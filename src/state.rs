//! Console state: one gateway, one notifier, and the components built on
//! them.
//!
//! Components are independent and reconcile on their own; cross-view
//! freshness is sequenced explicitly through [`AppState::invalidate`].

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::config::ConsoleConfig;
use crate::dashboard::DashboardAggregator;
use crate::error::AppError;
use crate::gateway::{GatewayClient, JobsApi, JobsGateway};
use crate::history::ImportHistory;
use crate::ingest::ImportSession;
use crate::listing::{BulkCoordinator, ListController};
use crate::notify::Notifier;

/// Views that may need a refetch after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invalidation {
    pub list: bool,
    pub dashboard: bool,
    pub history: bool,
}

impl Invalidation {
    /// List and dashboard: job counts or statuses changed.
    pub const JOBS: Invalidation = Invalidation {
        list: true,
        dashboard: true,
        history: false,
    };

    /// Everything, after a queued import.
    pub const ALL: Invalidation = Invalidation {
        list: true,
        dashboard: true,
        history: true,
    };
}

/// Shared state handed to every command.
pub struct AppState {
    pub config: ConsoleConfig,
    pub gateway: Arc<dyn JobsGateway>,
    pub notifier: Notifier,
    pub list: ListController,
    pub dashboard: DashboardAggregator,
    pub history: ImportHistory,
    pub bulk: BulkCoordinator,
    /// In-progress upload. Locked for the duration of a submit.
    pub import: Mutex<ImportSession>,
}

impl AppState {
    /// Builds the HTTP gateway from `config` and wires the components.
    pub fn new(config: ConsoleConfig) -> Result<Self, AppError> {
        let client = GatewayClient::new(&config)?;
        let gateway: Arc<dyn JobsGateway> = Arc::new(JobsApi::new(client));
        Ok(Self::with_gateway(config, gateway))
    }

    /// Wires the components around an existing gateway.
    pub fn with_gateway(config: ConsoleConfig, gateway: Arc<dyn JobsGateway>) -> Self {
        let notifier = Notifier::start(config.notification_ttl());
        let list = ListController::new(
            Arc::clone(&gateway),
            notifier.clone(),
            config.search_debounce(),
        );
        let dashboard = DashboardAggregator::new(Arc::clone(&gateway), notifier.clone());
        let history = ImportHistory::new(Arc::clone(&gateway), notifier.clone());
        let bulk = BulkCoordinator::new(
            Arc::clone(&gateway),
            notifier.clone(),
            list.clone(),
            dashboard.clone(),
        );
        let import = Mutex::new(ImportSession::new(config.default_source_label.clone()));

        Self {
            config,
            gateway,
            notifier,
            list,
            dashboard,
            history,
            bulk,
            import,
        }
    }

    /// Initial load: dashboard, list page 1 and history page 1.
    pub async fn bootstrap(&self) {
        info!("[STATE] bootstrapping against {}", self.config.api_base_url);
        self.invalidate(Invalidation::ALL).await;
    }

    /// Refetches the requested views concurrently. Each view reports its own
    /// failure.
    pub async fn invalidate(&self, what: Invalidation) {
        let list = async {
            if what.list {
                self.list.refresh().await;
            }
        };
        let dashboard = async {
            if what.dashboard {
                let _ = self.dashboard.refresh().await;
            }
        };
        let history = async {
            if what.history {
                let _ = self.history.refresh().await;
            }
        };
        tokio::join!(list, dashboard, history);
    }

    /// Cancels the pending search fetch and tears down the notifier.
    pub fn shutdown(&self) {
        self.list.shutdown();
        self.notifier.shutdown();
        info!("[STATE] shut down");
    }
}
