//! HTTP implementation of the query service

use super::{Answer, HealthReport, QueryConfig, QueryError, QueryRequest, QueryResponse, QueryService};
use async_trait::async_trait;
use reqwest::Client;

/// Talks to the answering service over `POST /chat` and `GET /health`
#[derive(Debug, Clone)]
pub struct HttpQueryService {
    client: Client,
    config: QueryConfig,
}

impl HttpQueryService {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: QueryConfig) -> Result<Self, QueryError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| QueryError::network(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl QueryService for HttpQueryService {
    async fn ask(&self, request: &QueryRequest) -> Result<Answer, QueryError> {
        let response = self
            .client
            .post(self.config.endpoint("chat"))
            .json(request)
            .send()
            .await
            .map_err(|e| QueryError::from_reqwest(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| QueryError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(QueryError::status(status.as_u16(), &body));
        }

        let parsed: QueryResponse = serde_json::from_str(&body)
            .map_err(|e| QueryError::decode(format!("Failed to parse response: {e}")))?;

        Ok(parsed.response)
    }

    async fn check_health(&self) -> bool {
        match self.client.get(self.config.endpoint("health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Health probe transport failure");
                false
            }
        }
    }

    async fn health_report(&self) -> Option<HealthReport> {
        let response = self
            .client
            .get(self.config.endpoint("health"))
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.json::<HealthReport>().await.ok()
    }
}
