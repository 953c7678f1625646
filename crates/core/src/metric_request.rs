//! Assembly of the request handed to the query-execution collaborator.

use serde::Serialize;

use crate::dashboard::Query;
use crate::error::CoreError;
use crate::identity::{synthesize_identity, ScopedIdentity};
use crate::panel_queries::extract_queries;
use crate::service::PublicDashboardService;
use crate::time_window::resolve_time_window;
use crate::types::PanelId;

/// Queries of one panel plus the effective time window. Built per request
/// and discarded after execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRequest {
    pub from: String,
    pub to: String,
    pub queries: Vec<Query>,
}

impl PublicDashboardService {
    /// Resolve the token, extract the panel's queries, and pair them with an
    /// identity scoped to exactly the datasources those queries reference.
    ///
    /// Any failing step short-circuits; no partial request is returned.
    pub async fn build_metric_request(
        &self,
        access_token: &str,
        panel_id: PanelId,
    ) -> Result<(MetricRequest, ScopedIdentity), CoreError> {
        let (config, dashboard) = self.resolve(access_token).await?;
        let queries = extract_queries(&dashboard, panel_id)?;
        let window = resolve_time_window(&config, &dashboard);
        let identity = synthesize_identity(dashboard.org_id, &queries);

        tracing::debug!(
            dashboard_uid = %dashboard.uid,
            panel_id,
            query_count = queries.len(),
            "Built public dashboard metric request",
        );

        let request = MetricRequest {
            from: window.from,
            to: window.to,
            queries,
        };
        Ok((request, identity))
    }
}
