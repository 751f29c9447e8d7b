//! Paginated job list: query state, fetch scheduling and reconciliation.
//!
//! Every query change and every fetch bumps a generation number. A response
//! is applied only if nothing has bumped it since its fetch started, so a
//! response for a superseded query is dropped even while the replacement
//! is still waiting out the debounce window.
//! Fetch failures are reported once and leave the last good page visible.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::gateway::JobsGateway;
use crate::listing::debounce::Debouncer;
use crate::listing::query::{ListQuery, QueryPatch, Transition};
use crate::listing::selection::Selection;
use crate::lock;
use crate::models::{Job, PaginatedResponse, Pagination};
use crate::notify::Notifier;

/// Page size assumed until the server reports one.
const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Point-in-time copy of the list view.
#[derive(Debug, Clone)]
pub struct ListSnapshot {
    pub query: ListQuery,
    /// Query that produced `jobs`, `None` before the first successful fetch.
    pub applied: Option<ListQuery>,
    pub jobs: Vec<Job>,
    pub pagination: Pagination,
    pub loading: bool,
    pub selected: Vec<String>,
}

#[derive(Debug)]
struct ListView {
    query: ListQuery,
    applied: Option<ListQuery>,
    page: PaginatedResponse<Job>,
    loading: bool,
    generation: u64,
    selection: Selection,
}

struct Inner {
    gateway: Arc<dyn JobsGateway>,
    notifier: Notifier,
    debouncer: Debouncer,
    view: Mutex<ListView>,
}

/// Cloneable handle to the list state machine.
#[derive(Clone)]
pub struct ListController {
    inner: Arc<Inner>,
}

impl ListController {
    pub fn new(gateway: Arc<dyn JobsGateway>, notifier: Notifier, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway,
                notifier,
                debouncer: Debouncer::new(debounce),
                view: Mutex::new(ListView {
                    query: ListQuery::default(),
                    applied: None,
                    page: PaginatedResponse::empty(DEFAULT_PAGE_LIMIT),
                    loading: false,
                    generation: 0,
                    selection: Selection::default(),
                }),
            }),
        }
    }

    /// Merges `patch` into the query and schedules the fetch.
    ///
    /// The query and the cleared selection are visible immediately. A
    /// page-only change fetches now and resolves when that fetch has been
    /// reconciled; any other change fetches after the debounce window and
    /// returns at once.
    pub async fn set_query(&self, patch: QueryPatch) {
        let (next, transition) = {
            let mut view = lock(&self.inner.view);
            let (next, transition) = view.query.apply(&patch);
            view.query = next.clone();
            view.selection.clear();
            view.generation += 1;
            view.loading = true;
            (next, transition)
        };

        match transition {
            Transition::Immediate => {
                self.inner.debouncer.cancel();
                debug!("[LIST] page change to {}, fetching now", next.page);
                self.fetch(next).await;
            }
            Transition::Debounced => {
                debug!(
                    "[LIST] query change, fetching in {:?}",
                    self.inner.debouncer.delay()
                );
                let this = self.clone();
                self.inner.debouncer.schedule(async move {
                    this.fetch_current().await;
                });
            }
        }
    }

    /// Refetches the current query now, superseding any pending debounce.
    pub async fn refresh(&self) {
        self.inner.debouncer.cancel();
        self.fetch_current().await;
    }

    async fn fetch_current(&self) {
        let query = lock(&self.inner.view).query.clone();
        self.fetch(query).await;
    }

    async fn fetch(&self, query: ListQuery) {
        let generation = {
            let mut view = lock(&self.inner.view);
            view.generation += 1;
            view.loading = true;
            view.generation
        };

        let result = self.inner.gateway.list_jobs(&query).await;

        let mut view = lock(&self.inner.view);
        if generation != view.generation {
            debug!(
                "[LIST] dropping stale response for generation {} (current {})",
                generation, view.generation
            );
            return;
        }
        view.loading = false;

        match result {
            Ok(page) => {
                info!(
                    "[LIST] page {}/{} with {} jobs ({} total)",
                    page.pagination.page,
                    page.pagination.pages,
                    page.data.len(),
                    page.pagination.total
                );
                view.selection.retain_page(&page.data);
                view.page = page;
                view.applied = Some(query);
            }
            Err(e) => {
                drop(view);
                warn!("[LIST] fetch failed: {}", e);
                self.inner.notifier.report(&e);
            }
        }
    }

    pub fn query(&self) -> ListQuery {
        lock(&self.inner.view).query.clone()
    }

    pub fn jobs(&self) -> Vec<Job> {
        lock(&self.inner.view).page.data.clone()
    }

    pub fn pagination(&self) -> Pagination {
        lock(&self.inner.view).page.pagination
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.inner.view).loading
    }

    pub fn is_fetch_pending(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    pub fn snapshot(&self) -> ListSnapshot {
        let view = lock(&self.inner.view);
        ListSnapshot {
            query: view.query.clone(),
            applied: view.applied.clone(),
            jobs: view.page.data.clone(),
            pagination: view.page.pagination,
            loading: view.loading,
            selected: view.selection.ids(),
        }
    }

    // ── Selection ────────────────────────────────────────────────────────────

    /// Flips selection of a job on the current page.
    pub fn toggle_selected(&self, id: &str) -> bool {
        let mut view = lock(&self.inner.view);
        let ListView { selection, page, .. } = &mut *view;
        selection.toggle(id, &page.data)
    }

    /// Selects every job on the current page, or clears the selection if
    /// they are all selected already.
    pub fn toggle_all(&self) {
        let mut view = lock(&self.inner.view);
        let ListView { selection, page, .. } = &mut *view;
        if selection.covers(&page.data) {
            selection.clear();
        } else {
            selection.select_all(&page.data);
        }
    }

    pub fn select_all(&self) {
        let mut view = lock(&self.inner.view);
        let ListView { selection, page, .. } = &mut *view;
        selection.select_all(&page.data);
    }

    pub fn clear_selection(&self) {
        lock(&self.inner.view).selection.clear();
    }

    pub fn selected_ids(&self) -> Vec<String> {
        lock(&self.inner.view).selection.ids()
    }

    /// Cancels a pending debounced fetch.
    pub fn shutdown(&self) {
        if self.inner.debouncer.cancel() {
            lock(&self.inner.view).loading = false;
            debug!("[LIST] pending fetch cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::listing::query::{SortDirection, StatusFilter};
    use crate::models::JobStatus;
    use crate::notify::NotificationKind;
    use crate::testing::FakeGateway;

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn controller(gateway: &Arc<FakeGateway>) -> (ListController, Notifier) {
        let notifier = Notifier::default();
        let gw: Arc<dyn JobsGateway> = gateway.clone();
        (ListController::new(gw, notifier.clone(), DEBOUNCE), notifier)
    }

    #[tokio::test(start_paused = true)]
    async fn page_change_fetches_immediately() {
        let gateway = Arc::new(FakeGateway::new());
        let (list, _) = controller(&gateway);

        list.set_query(QueryPatch::page(2)).await;

        assert_eq!(gateway.calls("list_jobs"), 1);
        assert_eq!(list.pagination().page, 2);
        assert!(!list.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn typing_burst_fetches_once_with_final_text() {
        let gateway = Arc::new(FakeGateway::new());
        let (list, _) = controller(&gateway);

        for text in ["r", "ru", "rus", "rust"] {
            list.set_query(QueryPatch::search(text)).await;
            tokio::time::sleep(Duration::from_millis(120)).await;
        }
        assert_eq!(gateway.calls("list_jobs"), 0);

        tokio::time::sleep(Duration::from_millis(400)).await;

        let queries = gateway.list_queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].search, "rust");
        assert_eq!(list.snapshot().applied.map(|q| q.search), Some("rust".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn filter_and_sort_fold_into_pending_search() {
        let gateway = Arc::new(FakeGateway::new());
        let (list, _) = controller(&gateway);

        list.set_query(QueryPatch::search("ops")).await;
        list.set_query(QueryPatch::status(StatusFilter::Only(JobStatus::Failed)))
            .await;
        list.set_query(QueryPatch::sort(SortDirection::Asc)).await;
        tokio::time::sleep(Duration::from_millis(350)).await;

        let queries = gateway.list_queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].search, "ops");
        assert_eq!(queries[0].status, StatusFilter::Only(JobStatus::Failed));
        assert_eq!(queries[0].sort, SortDirection::Asc);
        assert_eq!(queries[0].page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn page_change_cancels_pending_debounce() {
        let gateway = Arc::new(FakeGateway::new());
        let (list, _) = controller(&gateway);

        list.set_query(QueryPatch::search("data")).await;
        list.set_query(QueryPatch::page(2)).await;
        tokio::time::sleep(Duration::from_millis(500)).await;

        let queries = gateway.list_queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].search, "data");
        assert_eq!(queries[0].page, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_for_superseded_query_is_dropped() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.delay_list_responses([Duration::from_millis(500), Duration::from_millis(50)]);
        let (list, _) = controller(&gateway);

        let slow = {
            let list = list.clone();
            tokio::spawn(async move { list.set_query(QueryPatch::page(2)).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(list.is_loading());

        list.set_query(QueryPatch::page(3)).await;
        assert_eq!(list.pagination().page, 3);
        assert!(!list.is_loading());

        slow.await.unwrap();

        assert_eq!(list.pagination().page, 3);
        assert_eq!(list.snapshot().applied.map(|q| q.page), Some(3));
        assert!(!list.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn response_landing_in_debounce_window_is_dropped() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.delay_list_responses([Duration::from_millis(100)]);
        let (list, _) = controller(&gateway);

        let slow = {
            let list = list.clone();
            tokio::spawn(async move { list.set_query(QueryPatch::page(2)).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        list.set_query(QueryPatch::search("rust")).await;

        slow.await.unwrap();

        let snap = list.snapshot();
        assert_eq!(snap.query.search, "rust");
        assert_eq!(snap.applied, None);
        assert!(snap.jobs.is_empty());
        assert!(snap.loading);
        assert!(list.is_fetch_pending());

        tokio::time::sleep(Duration::from_millis(400)).await;

        let snap = list.snapshot();
        assert_eq!(snap.applied.as_ref(), Some(&snap.query));
        assert_eq!(snap.jobs[0].title, "rust job 0");
        assert!(!snap.loading);
        assert_eq!(gateway.calls("list_jobs"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn set_query_always_clears_selection() {
        let gateway = Arc::new(FakeGateway::new());
        let (list, _) = controller(&gateway);
        list.refresh().await;

        list.select_all();
        assert!(!list.selected_ids().is_empty());
        list.set_query(QueryPatch::search("x")).await;
        assert!(list.selected_ids().is_empty());

        tokio::time::sleep(Duration::from_millis(400)).await;
        let first = list.jobs()[0].id.clone();
        list.toggle_selected(&first);
        list.set_query(QueryPatch::page(1)).await;
        assert!(list.selected_ids().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_last_good_page() {
        let gateway = Arc::new(FakeGateway::new());
        let (list, notifier) = controller(&gateway);
        list.set_query(QueryPatch::page(2)).await;
        let shown = list.jobs();
        assert_eq!(list.pagination().pages, 3);

        gateway.fail_next(AppError::ConnectionFailed("refused".into()));
        list.set_query(QueryPatch::page(3)).await;

        assert_eq!(list.jobs(), shown);
        assert_eq!(list.pagination().page, 2);
        assert!(!list.is_loading());
        let entries = notifier.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, NotificationKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_all_selects_then_clears() {
        let gateway = Arc::new(FakeGateway::new());
        let (list, _) = controller(&gateway);
        list.refresh().await;

        list.toggle_all();
        assert_eq!(list.selected_ids().len(), list.jobs().len());

        list.toggle_all();
        assert!(list.selected_ids().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_fetch() {
        let gateway = Arc::new(FakeGateway::new());
        let (list, _) = controller(&gateway);

        list.set_query(QueryPatch::search("late")).await;
        assert!(list.is_fetch_pending());
        list.shutdown();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(gateway.calls("list_jobs"), 0);
        assert!(!list.is_loading());
    }
}
