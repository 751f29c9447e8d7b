//! Typed endpoints of the import API.
//!
//! Components talk to the API only through [`JobsGateway`], so tests can
//! swap in fakes. [`JobsApi`] is the HTTP implementation.

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::error::AppError;
use crate::gateway::client::GatewayClient;
use crate::listing::ListQuery;
use crate::models::{
    BulkDeleteResponse, BulkIdsRequest, BulkRetryResponse, DashboardResponse, DeleteJobResponse,
    ImportLog, Job, JobPayload, PaginatedResponse, UploadAck, UploadRequest,
};

/// Boxed future returned by every gateway call.
pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'a>>;

/// Remote operations consumed by the console core.
pub trait JobsGateway: Send + Sync {
    /// `GET /api/jobs?page&search&status&sort`
    fn list_jobs<'a>(&'a self, query: &'a ListQuery)
        -> GatewayFuture<'a, PaginatedResponse<Job>>;

    /// `GET /api/jobs/{id}`
    fn get_job<'a>(&'a self, id: &'a str) -> GatewayFuture<'a, Job>;

    /// `POST /api/jobs`
    fn create_job<'a>(&'a self, payload: &'a JobPayload) -> GatewayFuture<'a, Job>;

    /// `PUT /api/jobs/{id}`
    fn update_job<'a>(&'a self, id: &'a str, payload: &'a JobPayload) -> GatewayFuture<'a, Job>;

    /// `DELETE /api/jobs/{id}`
    fn delete_job<'a>(&'a self, id: &'a str) -> GatewayFuture<'a, DeleteJobResponse>;

    /// `POST /api/jobs/bulk/delete`
    fn bulk_delete<'a>(&'a self, ids: &'a [String]) -> GatewayFuture<'a, BulkDeleteResponse>;

    /// `POST /api/jobs/bulk/retry`
    fn bulk_retry<'a>(&'a self, ids: &'a [String]) -> GatewayFuture<'a, BulkRetryResponse>;

    /// `POST /api/imports/upload`
    fn upload_jobs<'a>(&'a self, request: &'a UploadRequest) -> GatewayFuture<'a, UploadAck>;

    /// `GET /api/import-logs?page`
    fn list_import_logs(&self, page: u32) -> GatewayFuture<'_, PaginatedResponse<ImportLog>>;

    /// `GET /api/dashboard`
    fn dashboard(&self) -> GatewayFuture<'_, DashboardResponse>;
}

/// HTTP implementation of [`JobsGateway`].
#[derive(Debug, Clone)]
pub struct JobsApi {
    client: GatewayClient,
}

impl JobsApi {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

impl JobsGateway for JobsApi {
    fn list_jobs<'a>(
        &'a self,
        query: &'a ListQuery,
    ) -> GatewayFuture<'a, PaginatedResponse<Job>> {
        Box::pin(async move {
            let params = query.to_params();
            self.client.get(&["api", "jobs"], &params).await
        })
    }

    fn get_job<'a>(&'a self, id: &'a str) -> GatewayFuture<'a, Job> {
        Box::pin(async move { self.client.get(&["api", "jobs", id], &[]).await })
    }

    fn create_job<'a>(&'a self, payload: &'a JobPayload) -> GatewayFuture<'a, Job> {
        Box::pin(async move { self.client.post(&["api", "jobs"], payload).await })
    }

    fn update_job<'a>(&'a self, id: &'a str, payload: &'a JobPayload) -> GatewayFuture<'a, Job> {
        Box::pin(async move { self.client.put(&["api", "jobs", id], payload).await })
    }

    fn delete_job<'a>(&'a self, id: &'a str) -> GatewayFuture<'a, DeleteJobResponse> {
        Box::pin(async move { self.client.delete(&["api", "jobs", id]).await })
    }

    fn bulk_delete<'a>(&'a self, ids: &'a [String]) -> GatewayFuture<'a, BulkDeleteResponse> {
        Box::pin(async move {
            debug!("[GATEWAY] bulk delete of {} ids", ids.len());
            let body = BulkIdsRequest { ids: ids.to_vec() };
            self.client.post(&["api", "jobs", "bulk", "delete"], &body).await
        })
    }

    fn bulk_retry<'a>(&'a self, ids: &'a [String]) -> GatewayFuture<'a, BulkRetryResponse> {
        Box::pin(async move {
            debug!("[GATEWAY] bulk retry of {} ids", ids.len());
            let body = BulkIdsRequest { ids: ids.to_vec() };
            self.client.post(&["api", "jobs", "bulk", "retry"], &body).await
        })
    }

    fn upload_jobs<'a>(&'a self, request: &'a UploadRequest) -> GatewayFuture<'a, UploadAck> {
        Box::pin(async move {
            debug!("[GATEWAY] uploading {} rows", request.jobs.len());
            self.client.post(&["api", "imports", "upload"], request).await
        })
    }

    fn list_import_logs(&self, page: u32) -> GatewayFuture<'_, PaginatedResponse<ImportLog>> {
        Box::pin(async move {
            self.client
                .get(&["api", "import-logs"], &[("page", page.to_string())])
                .await
        })
    }

    fn dashboard(&self) -> GatewayFuture<'_, DashboardResponse> {
        Box::pin(async move { self.client.get(&["api", "dashboard"], &[]).await })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsoleConfig;
    use crate::listing::{QueryPatch, SortDirection, StatusFilter};
    use crate::models::JobStatus;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(server: &MockServer) -> JobsApi {
        let cfg = ConsoleConfig::default().with_api_base_url(server.uri());
        JobsApi::new(GatewayClient::new(&cfg).unwrap())
    }

    fn job_json(id: &str, title: &str) -> serde_json::Value {
        serde_json::json!({ "_id": id, "title": title, "status": "imported" })
    }

    #[tokio::test]
    async fn list_jobs_encodes_query() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/jobs"))
            .and(query_param("page", "1"))
            .and(query_param("search", "rust dev"))
            .and(query_param("status", "failed"))
            .and(query_param("sort", "asc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [job_json("1", "Rust Dev")],
                "pagination": { "page": 1, "pages": 1, "limit": 20, "total": 1 }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (query, _) = ListQuery::default().apply(&QueryPatch {
            search: Some("rust dev".into()),
            status: Some(StatusFilter::Only(JobStatus::Failed)),
            sort: Some(SortDirection::Asc),
            ..Default::default()
        });

        let page = api_for(&mock_server).list_jobs(&query).await.unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].title, "Rust Dev");
        assert_eq!(page.pagination.total, 1);
    }

    #[tokio::test]
    async fn get_job_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/jobs/nope"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let result = api_for(&mock_server).get_job("nope").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn bulk_retry_posts_ids() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/jobs/bulk/retry"))
            .and(body_json(serde_json::json!({ "ids": ["a", "b"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "queued": 2 })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let ids = vec!["a".to_string(), "b".to_string()];
        let response = api_for(&mock_server).bulk_retry(&ids).await.unwrap();

        assert_eq!(response.queued, 2);
    }

    #[tokio::test]
    async fn upload_sends_jobs_and_source() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/imports/upload"))
            .and(body_json(serde_json::json!({
                "jobs": [{ "title": "Backend Engineer", "company": "Acme" }],
                "source": "csv-upload"
            })))
            .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({ "queued": 1 })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = UploadRequest {
            jobs: vec![crate::models::ImportJobPayload {
                title: Some("Backend Engineer".into()),
                company: Some("Acme".into()),
                ..Default::default()
            }],
            source: "csv-upload".into(),
        };

        let ack = api_for(&mock_server).upload_jobs(&request).await.unwrap();

        assert_eq!(ack.queued, 1);
    }

    #[tokio::test]
    async fn delete_job_returns_count() {
        let mock_server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/jobs/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Job deleted", "deleted": 1
            })))
            .mount(&mock_server)
            .await;

        let response = api_for(&mock_server).delete_job("42").await.unwrap();

        assert_eq!(response.deleted, 1);
    }

    #[tokio::test]
    async fn import_logs_request_page() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/import-logs"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [],
                "pagination": { "page": 2, "pages": 2, "limit": 10, "total": 12 }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let page = api_for(&mock_server).list_import_logs(2).await.unwrap();

        assert_eq!(page.pagination.page, 2);
        assert!(page.data.is_empty());
    }

    #[tokio::test]
    async fn dashboard_parses_queue_counts() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "summary": { "totalJobs": 120, "failedJobs": 3, "retryingJobs": 1 },
                "queue": { "waiting": 4, "active": 1, "completed": 90, "failed": 3, "delayed": 0, "paused": 0 },
                "recentImports": []
            })))
            .mount(&mock_server)
            .await;

        let dashboard = api_for(&mock_server).dashboard().await.unwrap();

        assert_eq!(dashboard.summary.total_jobs, 120);
        assert_eq!(dashboard.queue.waiting, 4);
    }
}
