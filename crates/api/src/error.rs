use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pubdash_core::error::{CoreError, StoreError};
use serde_json::json;

/// Message returned for every failed public lookup, whatever the cause.
pub const NOT_AVAILABLE_MESSAGE: &str = "Public dashboard not available";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds the role check failure.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `pubdash_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The caller is authenticated but lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a [`CoreError`] into an HTTP status, error code, and message.
///
/// - `NotFound` and `PanelNotFound` share one response so callers cannot
///   tell which check failed.
/// - Storage, generation and unreadable panel failures map to 500 with a
///   sanitized message.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound | CoreError::PanelNotFound { .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            NOT_AVAILABLE_MESSAGE.to_string(),
        ),
        CoreError::MissingDashboardRef => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            err.to_string(),
        ),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::DatasourceNotPermitted { datasource_uid } => {
            tracing::warn!(%datasource_uid, "Public query outside the synthesized scope");
            (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Query not permitted".to_string(),
            )
        }
        CoreError::Storage(StoreError::RowNotFound) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Public dashboard config not found".to_string(),
        ),
        CoreError::QueryExecution(msg) => {
            tracing::error!(error = %msg, "Query backend failure");
            (
                StatusCode::BAD_GATEWAY,
                "QUERY_FAILED",
                "Query backend request failed".to_string(),
            )
        }
        CoreError::DuplicateToken
        | CoreError::RandomnessUnavailable(_)
        | CoreError::InvalidDocument(_)
        | CoreError::InvalidPanel(_)
        | CoreError::Storage(_) => {
            tracing::error!(error = %err, "Internal core error");
            internal()
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
