//! Query-execution collaborator.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::identity::ScopedIdentity;
use crate::metric_request::MetricRequest;

/// Runs a public [`MetricRequest`] on behalf of a [`ScopedIdentity`].
///
/// Implementations must refuse any query whose datasource the identity does
/// not cover (see [`ScopedIdentity::ensure_can_query`]).
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(
        &self,
        request: &MetricRequest,
        identity: &ScopedIdentity,
    ) -> Result<serde_json::Value, CoreError>;
}
