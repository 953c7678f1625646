use crate::dashboard::{DocumentError, PanelError};
use crate::types::PanelId;

/// Errors produced by the public dashboard pipeline.
///
/// `NotFound` deliberately carries no detail: a missing token, a missing
/// dashboard and a disabled share must be indistinguishable to callers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Public dashboard not found")]
    NotFound,

    #[error("Panel {panel_id} not found in public dashboard")]
    PanelNotFound { panel_id: PanelId },

    #[error("Dashboard identifier not set")]
    MissingDashboardRef,

    #[error("Generated access token collides with an existing share")]
    DuplicateToken,

    #[error("Randomness source unavailable: {0}")]
    RandomnessUnavailable(String),

    #[error("Datasource {datasource_uid} is not covered by the request identity")]
    DatasourceNotPermitted { datasource_uid: String },

    #[error(transparent)]
    InvalidDocument(#[from] DocumentError),

    /// The requested panel exists but its queries failed validation.
    #[error(transparent)]
    InvalidPanel(#[from] PanelError),

    #[error("Query execution failed: {0}")]
    QueryExecution(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Failures reported by a [`crate::store::PublicDashboardStore`].
///
/// The pipeline never interprets `Backend`; it is handed back to the caller
/// as-is.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The access token unique constraint rejected an insert.
    #[error("Access token already exists")]
    DuplicateToken,

    /// An update targeted a share that does not exist.
    #[error("Public dashboard config not found")]
    RowNotFound,

    /// Stored `time_settings` are neither empty nor a complete range.
    #[error("Stored time settings are invalid: {0}")]
    InvalidTimeSettings(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wrap any backend error (e.g. `sqlx::Error`) without interpreting it.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}
