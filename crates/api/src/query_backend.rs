//! HTTP client for the query backend that executes public panel queries.
//!
//! Forwards a [`MetricRequest`] to `POST {base_url}/api/ds/query` together
//! with the synthesized identity. The identity is checked against every
//! query before anything leaves the process.

use std::time::Duration;

use async_trait::async_trait;
use pubdash_core::error::CoreError;
use pubdash_core::identity::ScopedIdentity;
use pubdash_core::metric_request::MetricRequest;
use pubdash_core::query_execution::QueryExecutor;
use serde::Serialize;

/// Header carrying the org the scoped identity belongs to.
pub const ORG_ID_HEADER: &str = "x-org-id";

/// Errors from the query backend client.
#[derive(Debug, thiserror::Error)]
pub enum QueryBackendError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Query backend error ({status}): {body}")]
    ApiError { status: u16, body: String },
}

impl From<QueryBackendError> for CoreError {
    fn from(err: QueryBackendError) -> Self {
        CoreError::QueryExecution(err.to_string())
    }
}

#[derive(Serialize)]
struct QueryBody<'a> {
    from: &'a str,
    to: &'a str,
    queries: &'a [pubdash_core::dashboard::Query],
    identity: &'a ScopedIdentity,
}

/// [`QueryExecutor`] backed by an HTTP query backend.
pub struct HttpQueryExecutor {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQueryExecutor {
    /// Build a client for `base_url` with a per-request `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post_query(
        &self,
        request: &MetricRequest,
        identity: &ScopedIdentity,
    ) -> Result<serde_json::Value, QueryBackendError> {
        let body = QueryBody {
            from: &request.from,
            to: &request.to,
            queries: &request.queries,
            identity,
        };

        let response = self
            .client
            .post(format!("{}/api/ds/query", self.base_url))
            .header(ORG_ID_HEADER, identity.org_id.to_string())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(QueryBackendError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl QueryExecutor for HttpQueryExecutor {
    async fn execute(
        &self,
        request: &MetricRequest,
        identity: &ScopedIdentity,
    ) -> Result<serde_json::Value, CoreError> {
        identity.ensure_can_query(&request.queries)?;

        // Text and row panels have nothing to run.
        if request.queries.is_empty() {
            return Ok(serde_json::json!({ "results": {} }));
        }

        tracing::debug!(
            org_id = identity.org_id,
            query_count = request.queries.len(),
            "Forwarding public panel queries",
        );

        Ok(self.post_query(request, identity).await?)
    }
}
