//! Route definitions for public dashboards and their share config.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::public_dashboard;
use crate::state::AppState;

/// Anonymous viewer routes, mounted at `/public/dashboards`.
///
/// ```text
/// GET    /{access_token}                          -> get_public_dashboard
/// POST   /{access_token}/panels/{panel_id}/query  -> query_public_panel
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{access_token}",
            get(public_dashboard::get_public_dashboard),
        )
        .route(
            "/{access_token}/panels/{panel_id}/query",
            post(public_dashboard::query_public_panel),
        )
}

/// Owner routes, mounted at `/dashboards/uid`.
///
/// ```text
/// GET    /{dashboard_uid}/public-config  -> get_public_config
/// POST   /{dashboard_uid}/public-config  -> save_public_config
/// ```
pub fn config_router() -> Router<AppState> {
    Router::new().route(
        "/{dashboard_uid}/public-config",
        get(public_dashboard::get_public_config).post(public_dashboard::save_public_config),
    )
}
