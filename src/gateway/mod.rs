//! Remote gateway: HTTP transport and typed import-API endpoints.
//!
//! - **Uniform error translation** from transport and non-2xx responses
//! - **Safe logging** that never records bodies or cookies
//! - **Stateless** and freely reentrant; share it behind an `Arc`

pub mod api;
pub mod client;

pub use api::{GatewayFuture, JobsApi, JobsGateway};
pub use client::{sanitize_url_for_logs, GatewayClient, LoggingMode};
