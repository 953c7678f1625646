pub mod health;
pub mod public_dashboard;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /public/dashboards/{access_token}                         view shared dashboard (anonymous)
/// /public/dashboards/{access_token}/panels/{panel_id}/query run panel queries (POST, anonymous)
///
/// /dashboards/uid/{dashboard_uid}/public-config             get, save share config (editor)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/public/dashboards", public_dashboard::public_router())
        .nest("/dashboards/uid", public_dashboard::config_router())
}
