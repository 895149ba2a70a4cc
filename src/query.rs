//! Query service client
//!
//! Sends domain-tagged questions to the remote answering service.

mod config;
mod error;
mod http;
mod types;

pub use config::QueryConfig;
pub use error::{QueryError, QueryErrorKind};
pub use http::HttpQueryService;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Request/response boundary to the answering service
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Ask one question. No retries.
    async fn ask(&self, request: &QueryRequest) -> Result<Answer, QueryError>;

    /// Liveness probe. Never fails; any error maps to `false`.
    async fn check_health(&self) -> bool;

    /// Full health body, when the service returns one
    async fn health_report(&self) -> Option<HealthReport> {
        None
    }
}

#[async_trait]
impl<T: QueryService + ?Sized> QueryService for Arc<T> {
    async fn ask(&self, request: &QueryRequest) -> Result<Answer, QueryError> {
        (**self).ask(request).await
    }

    async fn check_health(&self) -> bool {
        (**self).check_health().await
    }

    async fn health_report(&self) -> Option<HealthReport> {
        (**self).health_report().await
    }
}

/// Logging wrapper for query services
pub struct LoggingQueryService<Q> {
    inner: Q,
}

impl<Q: QueryService> LoggingQueryService<Q> {
    pub fn new(inner: Q) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<Q: QueryService> QueryService for LoggingQueryService<Q> {
    async fn ask(&self, request: &QueryRequest) -> Result<Answer, QueryError> {
        let start = std::time::Instant::now();
        let result = self.inner.ask(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(answer) => {
                tracing::info!(
                    domain = %request.domain,
                    duration_ms = %duration.as_millis(),
                    table = matches!(answer, Answer::Table(_)),
                    "Query answered"
                );
            }
            Err(e) => {
                tracing::error!(
                    domain = %request.domain,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    error = %e.message,
                    "Query failed"
                );
            }
        }

        result
    }

    async fn check_health(&self) -> bool {
        let healthy = self.inner.check_health().await;
        if !healthy {
            tracing::warn!("Answering service health check failed");
        }
        healthy
    }

    async fn health_report(&self) -> Option<HealthReport> {
        self.inner.health_report().await
    }
}
