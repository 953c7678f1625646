use std::sync::Arc;

use pubdash_core::query_execution::QueryExecutor;
use pubdash_core::service::PublicDashboardService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Token resolution, config lifecycle and metric request assembly.
    pub service: Arc<PublicDashboardService>,
    /// Collaborator that runs scoped public queries.
    pub query_executor: Arc<dyn QueryExecutor>,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
}
