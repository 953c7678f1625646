//! Handlers for public dashboard viewing, panel queries and share config.
//!
//! The viewer endpoints are anonymous: the access token in the path is the
//! only credential, and every failure to resolve it answers the same 404.
//! The config endpoints require an `editor` or `admin` JWT via
//! [`RequireEditor`]; org and user always come from the token.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pubdash_core::public_dashboard::{
    PublicDashboardConfig, PublicDashboardInput, SavePublicDashboardConfig,
};
use pubdash_core::types::PanelId;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Dashboard payload served to anonymous viewers.
#[derive(Debug, Serialize)]
pub struct PublicDashboardResponse {
    pub uid: String,
    pub title: String,
    /// The dashboard document with `time` replaced by the effective window.
    pub dashboard: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Public (token-authenticated) handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/public/dashboards/{access_token}
pub async fn get_public_dashboard(
    State(state): State<AppState>,
    Path(access_token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let dashboard = state.service.get_public_dashboard(&access_token).await?;

    Ok(Json(DataResponse {
        data: PublicDashboardResponse {
            uid: dashboard.uid,
            title: dashboard.title,
            dashboard: dashboard.data,
        },
    }))
}

/// POST /api/v1/public/dashboards/{access_token}/panels/{panel_id}/query
///
/// Runs the panel's stored queries over the share's effective window. The
/// request body is not read, so a viewer cannot widen the time range or
/// substitute queries.
pub async fn query_public_panel(
    State(state): State<AppState>,
    Path((access_token, panel_id)): Path<(String, PanelId)>,
) -> AppResult<impl IntoResponse> {
    let (request, identity) = state
        .service
        .build_metric_request(&access_token, panel_id)
        .await?;

    let result = state.query_executor.execute(&request, &identity).await?;

    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// Owner handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/dashboards/uid/{dashboard_uid}/public-config
///
/// Returns `data: null` when the dashboard has never been shared.
pub async fn get_public_config(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(dashboard_uid): Path<String>,
) -> AppResult<Json<DataResponse<Option<PublicDashboardConfig>>>> {
    let config = state
        .service
        .get_config(user.org_id, &dashboard_uid)
        .await?;

    Ok(Json(DataResponse { data: config }))
}

/// POST /api/v1/dashboards/uid/{dashboard_uid}/public-config
///
/// Creates the share when the body carries no `uid` (201), otherwise
/// updates `isEnabled` and `timeSettings` of the existing one (200).
pub async fn save_public_config(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(dashboard_uid): Path<String>,
    Json(input): Json<PublicDashboardInput>,
) -> AppResult<impl IntoResponse> {
    let creating = input.uid.as_deref().is_none_or(str::is_empty);

    let saved = state
        .service
        .save_config(SavePublicDashboardConfig {
            dashboard_uid,
            org_id: user.org_id,
            user_id: user.user_id,
            config: input,
        })
        .await?;

    let status = if creating {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: saved })))
}
