//! In-memory gateway used by component tests.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use crate::error::AppError;
use crate::gateway::{GatewayFuture, JobsGateway};
use crate::listing::ListQuery;
use crate::lock;
use crate::models::{
    BulkDeleteResponse, BulkRetryResponse, DashboardResponse, DashboardSummary, DeleteJobResponse,
    ImportLog, ImportRunStatus, Job, JobPayload, JobStatus, PaginatedResponse, Pagination,
    QueueCounts, UploadAck, UploadRequest,
};

/// Page count reported for every list response.
pub const FAKE_PAGES: u32 = 3;
/// Jobs returned per list page.
pub const FAKE_PAGE_SIZE: usize = 3;

/// Records every call and answers with canned data. Failures queued with
/// [`fail_next`](Self::fail_next) are consumed by the next call of any kind.
#[derive(Default)]
pub struct FakeGateway {
    calls: Mutex<Vec<&'static str>>,
    failures: Mutex<VecDeque<AppError>>,
    list_delays: Mutex<VecDeque<Duration>>,
    dashboard_delays: Mutex<VecDeque<Duration>>,
    list_queries: Mutex<Vec<ListQuery>>,
    uploads: Mutex<Vec<UploadRequest>>,
    retried: Mutex<Vec<Vec<String>>>,
    deleted: Mutex<Vec<Vec<String>>>,
    log_pages: Mutex<Vec<u32>>,
    payloads: Mutex<Vec<JobPayload>>,
    total_jobs: Mutex<u64>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, err: AppError) {
        lock(&self.failures).push_back(err);
    }

    /// Delays applied to successive `list_jobs` calls, in call order.
    pub fn delay_list_responses(&self, delays: impl IntoIterator<Item = Duration>) {
        lock(&self.list_delays).extend(delays);
    }

    /// Delays applied to successive `dashboard` calls, in call order.
    pub fn delay_dashboard_responses(&self, delays: impl IntoIterator<Item = Duration>) {
        lock(&self.dashboard_delays).extend(delays);
    }

    pub fn set_total_jobs(&self, total: u64) {
        *lock(&self.total_jobs) = total;
    }

    pub fn calls(&self, name: &str) -> usize {
        lock(&self.calls).iter().filter(|c| **c == name).count()
    }

    pub fn total_calls(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn list_queries(&self) -> Vec<ListQuery> {
        lock(&self.list_queries).clone()
    }

    pub fn uploads(&self) -> Vec<UploadRequest> {
        lock(&self.uploads).clone()
    }

    pub fn bulk_retried(&self) -> Vec<Vec<String>> {
        lock(&self.retried).clone()
    }

    pub fn bulk_deleted(&self) -> Vec<Vec<String>> {
        lock(&self.deleted).clone()
    }

    pub fn import_log_pages(&self) -> Vec<u32> {
        lock(&self.log_pages).clone()
    }

    pub fn payloads(&self) -> Vec<JobPayload> {
        lock(&self.payloads).clone()
    }

    fn begin(&self, name: &'static str) -> Result<(), AppError> {
        lock(&self.calls).push(name);
        match lock(&self.failures).pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

pub fn fake_job(id: &str, title: &str) -> Job {
    Job {
        id: id.to_string(),
        title: title.to_string(),
        company: Some("Acme".to_string()),
        job_type: None,
        job_location: None,
        description: None,
        link: None,
        source: Some("csv-upload".to_string()),
        published_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).single(),
        last_imported_at: None,
        status: JobStatus::Imported,
        error_reason: None,
        tags: BTreeSet::new(),
    }
}

fn job_from_payload(id: &str, payload: &JobPayload) -> Job {
    let mut job = fake_job(id, payload.title.as_deref().unwrap_or_default());
    job.company = payload.company.clone();
    job.link = payload.link.clone();
    job.status = payload.status.unwrap_or(JobStatus::Imported);
    job
}

impl JobsGateway for FakeGateway {
    fn list_jobs<'a>(&'a self, query: &'a ListQuery) -> GatewayFuture<'a, PaginatedResponse<Job>> {
        Box::pin(async move {
            lock(&self.list_queries).push(query.clone());
            let delay = lock(&self.list_delays).pop_front();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.begin("list_jobs")?;

            let data = (0..FAKE_PAGE_SIZE)
                .map(|i| {
                    fake_job(
                        &format!("p{}-{}", query.page, i),
                        &format!("{} job {}", query.search, i),
                    )
                })
                .collect();
            Ok(PaginatedResponse {
                data,
                pagination: Pagination {
                    page: query.page,
                    pages: FAKE_PAGES,
                    limit: 20,
                    total: 55,
                },
            })
        })
    }

    fn get_job<'a>(&'a self, id: &'a str) -> GatewayFuture<'a, Job> {
        Box::pin(async move {
            self.begin("get_job")?;
            if id == "missing" {
                return Err(AppError::NotFound(format!("Job {}", id)));
            }
            Ok(fake_job(id, "Existing job"))
        })
    }

    fn create_job<'a>(&'a self, payload: &'a JobPayload) -> GatewayFuture<'a, Job> {
        Box::pin(async move {
            self.begin("create_job")?;
            lock(&self.payloads).push(payload.clone());
            Ok(job_from_payload("new-1", payload))
        })
    }

    fn update_job<'a>(&'a self, id: &'a str, payload: &'a JobPayload) -> GatewayFuture<'a, Job> {
        Box::pin(async move {
            self.begin("update_job")?;
            lock(&self.payloads).push(payload.clone());
            Ok(job_from_payload(id, payload))
        })
    }

    fn delete_job<'a>(&'a self, _id: &'a str) -> GatewayFuture<'a, DeleteJobResponse> {
        Box::pin(async move {
            self.begin("delete_job")?;
            Ok(DeleteJobResponse {
                message: "Job deleted".to_string(),
                deleted: 1,
            })
        })
    }

    fn bulk_delete<'a>(&'a self, ids: &'a [String]) -> GatewayFuture<'a, BulkDeleteResponse> {
        Box::pin(async move {
            self.begin("bulk_delete")?;
            lock(&self.deleted).push(ids.to_vec());
            Ok(BulkDeleteResponse {
                deleted: ids.len() as u64,
            })
        })
    }

    fn bulk_retry<'a>(&'a self, ids: &'a [String]) -> GatewayFuture<'a, BulkRetryResponse> {
        Box::pin(async move {
            self.begin("bulk_retry")?;
            lock(&self.retried).push(ids.to_vec());
            Ok(BulkRetryResponse {
                queued: ids.len() as u64,
            })
        })
    }

    fn upload_jobs<'a>(&'a self, request: &'a UploadRequest) -> GatewayFuture<'a, UploadAck> {
        Box::pin(async move {
            self.begin("upload_jobs")?;
            lock(&self.uploads).push(request.clone());
            Ok(UploadAck {
                queued: request.jobs.len() as u64,
                message: Some("Jobs queued for import".to_string()),
            })
        })
    }

    fn list_import_logs(&self, page: u32) -> GatewayFuture<'_, PaginatedResponse<ImportLog>> {
        Box::pin(async move {
            self.begin("list_import_logs")?;
            lock(&self.log_pages).push(page);
            let log = ImportLog {
                id: format!("log-{}", page),
                timestamp: Utc::now(),
                total_fetched: 10,
                total_imported: 10,
                new_jobs: 8,
                updated_jobs: 2,
                failed_jobs: Vec::new(),
                duration_ms: Some(1200),
                status: ImportRunStatus::Completed,
            };
            Ok(PaginatedResponse {
                data: vec![log],
                pagination: Pagination {
                    page,
                    pages: 2,
                    limit: 10,
                    total: 11,
                },
            })
        })
    }

    fn dashboard(&self) -> GatewayFuture<'_, DashboardResponse> {
        Box::pin(async move {
            let total_jobs = *lock(&self.total_jobs);
            let delay = lock(&self.dashboard_delays).pop_front();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.begin("dashboard")?;
            Ok(DashboardResponse {
                summary: DashboardSummary {
                    total_jobs,
                    ..Default::default()
                },
                queue: QueueCounts::default(),
                recent_imports: Vec::new(),
            })
        })
    }
}
