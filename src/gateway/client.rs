//! HTTP client for the import API with uniform error translation and safe logging.

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_TYPE, PRAGMA, USER_AGENT};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::config::ConsoleConfig;
use crate::error::AppError;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// User agent string for all API requests.
const CLIENT_USER_AGENT: &str = "ImportConsole/0.1.0";

/// Query parameter keys (case-insensitive) that should have their values redacted.
const SENSITIVE_QUERY_PARAMS: &[&str] = &[
    "token",
    "access_token",
    "sid",
    "session",
    "session_id",
    "authorization",
];

// ─────────────────────────────────────────────────────────────────────────────
// LoggingMode
// ─────────────────────────────────────────────────────────────────────────────

/// Controls how URLs are sanitized for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggingMode {
    /// Log only the path component. Strips scheme, host, query, and fragment.
    /// Example: `/api/jobs`
    #[default]
    PathOnly,

    /// Log path and query parameters, but redact sensitive values.
    /// Example: `/api/jobs?page=2&search=rust&token=***`
    PathAndQueryRedacted,
}

// ─────────────────────────────────────────────────────────────────────────────
// URL Sanitization
// ─────────────────────────────────────────────────────────────────────────────

/// Determines if a query parameter key is sensitive and should be redacted.
fn is_sensitive_param(key: &str) -> bool {
    let key_lower = key.to_ascii_lowercase();
    SENSITIVE_QUERY_PARAMS
        .iter()
        .any(|&sensitive| key_lower == sensitive)
}

/// Sanitizes a URL for safe logging based on the specified mode.
///
/// The result never contains the scheme, host, or fragment.
pub fn sanitize_url_for_logs(url: &Url, mode: LoggingMode) -> String {
    let path = url.path();

    match mode {
        LoggingMode::PathOnly => path.to_string(),
        LoggingMode::PathAndQueryRedacted => {
            let query_pairs: Vec<_> = url.query_pairs().collect();
            if query_pairs.is_empty() {
                return path.to_string();
            }

            let redacted_pairs: Vec<String> = query_pairs
                .into_iter()
                .map(|(key, value)| {
                    if is_sensitive_param(&key) {
                        format!("{}=***", key)
                    } else {
                        format!("{}={}", key, value)
                    }
                })
                .collect();

            format!("{}?{}", path, redacted_pairs.join("&"))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GatewayClient
// ─────────────────────────────────────────────────────────────────────────────

/// Stateless, freely shareable HTTP wrapper around the import API.
///
/// Every request carries the session cookie jar and a JSON content type.
/// GET requests ask intermediaries to revalidate.
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
    logging_mode: LoggingMode,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url.as_str())
            .field("logging_mode", &self.logging_mode)
            .finish()
    }
}

impl GatewayClient {
    /// Creates a client for the configured API base URL.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the base URL does not parse, or
    /// `AppError::Internal` if the HTTP client fails to initialize.
    pub fn new(config: &ConsoleConfig) -> Result<Self, AppError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| AppError::Config(format!("Invalid api_base_url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "api_base_url cannot be a base: {}",
                config.api_base_url
            )));
        }

        Ok(Self {
            http: build_http_client(config.request_timeout())?,
            base_url,
            logging_mode: config.logging_mode,
        })
    }

    /// Updates the logging mode for URL sanitization.
    pub fn with_logging_mode(mut self, mode: LoggingMode) -> Self {
        self.logging_mode = mode;
        self
    }

    /// Builds a URL from path segments (each percent-encoded on its own) and
    /// query parameters. Parameters with empty values are dropped.
    pub fn build_url(&self, segments: &[&str], params: &[(&str, String)]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| AppError::Internal("Base URL cannot hold a path".to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }

        let non_empty: Vec<&(&str, String)> =
            params.iter().filter(|(_, value)| !value.is_empty()).collect();
        if !non_empty.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in non_empty {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Typed GET.
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<T, AppError> {
        let url = self.build_url(segments, params)?;
        let response = self.execute(Method::GET, url, None).await?;
        decode_json(response).await
    }

    /// Typed POST with a JSON body.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, AppError> {
        let url = self.build_url(segments, &[])?;
        let response = self.execute(Method::POST, url, Some(encode_json(body)?)).await?;
        decode_json(response).await
    }

    /// Typed PUT with a JSON body.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, AppError> {
        let url = self.build_url(segments, &[])?;
        let response = self.execute(Method::PUT, url, Some(encode_json(body)?)).await?;
        decode_json(response).await
    }

    /// Typed DELETE.
    pub async fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, AppError> {
        let url = self.build_url(segments, &[])?;
        let response = self.execute(Method::DELETE, url, None).await?;
        decode_json(response).await
    }

    /// Executes a request with timing, logging, and error translation.
    ///
    /// Never logs bodies or the cookie jar; URLs are sanitized first.
    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response, AppError> {
        let start = Instant::now();
        let sanitized_url = sanitize_url_for_logs(&url, self.logging_mode);

        let mut request = self.http.request(method.clone(), url.as_str());
        if method == Method::GET {
            request = request
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }
        if let Some(body_bytes) = body {
            request = request.body(body_bytes);
        }

        let result = request.send().await;
        let duration_ms = start.elapsed().as_millis();

        let response = match result {
            Ok(response) => response,
            Err(_) => {
                // The raw reqwest error may embed the full URL.
                warn!(
                    "[GATEWAY] {} {} FAILED {}ms",
                    method, sanitized_url, duration_ms
                );
                return Err(AppError::ConnectionFailed(
                    "Connection to the import API failed".to_string(),
                ));
            }
        };

        let status = response.status();
        info!(
            "[GATEWAY] {} {} {} {}ms",
            method,
            sanitized_url,
            status.as_u16(),
            duration_ms
        );

        if status.is_success() {
            Ok(response)
        } else {
            Err(translate_error_response(response, &sanitized_url).await)
        }
    }
}

/// Maps a non-2xx response onto the error taxonomy. The body text, when
/// present, becomes the message.
async fn translate_error_response(response: reqwest::Response, path: &str) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let body = body.trim();

    if status == reqwest::StatusCode::NOT_FOUND {
        let message = if body.is_empty() {
            format!("Resource not found: {}", path)
        } else {
            body.to_string()
        };
        return AppError::NotFound(message);
    }

    let message = if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body.to_string()
    };

    AppError::Api {
        status: status.as_u16(),
        message,
    }
}

fn encode_json<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>, AppError> {
    serde_json::to_vec(body)
        .map_err(|e| AppError::Internal(format!("Failed to serialize request body: {}", e)))
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AppError> {
    response
        .json::<T>()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to parse API response: {}", e)))
}

/// Builds the configured HTTP client.
fn build_http_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .cookie_store(true)
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
