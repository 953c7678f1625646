//! Shared fixtures for API integration tests.
//!
//! Tests drive the production router (same middleware stack as `main.rs`)
//! over an in-memory store and a recording query executor, so no database
//! or query backend is needed.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use pubdash_api::auth::jwt::{generate_access_token, JwtConfig};
use pubdash_api::config::ServerConfig;
use pubdash_api::router::build_app_router;
use pubdash_api::state::AppState;
use pubdash_core::dashboard::Dashboard;
use pubdash_core::error::CoreError;
use pubdash_core::identity::ScopedIdentity;
use pubdash_core::memory_store::InMemoryPublicDashboardStore;
use pubdash_core::metric_request::MetricRequest;
use pubdash_core::public_dashboard::{PublicDashboardConfig, TimeSettings};
use pubdash_core::query_execution::QueryExecutor;
use pubdash_core::service::PublicDashboardService;
use pubdash_core::store::PublicDashboardStore;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const TOKEN: &str = "0123456789abcdef0123456789abcdef";
pub const OTHER_TOKEN: &str = "fedcba9876543210fedcba9876543210";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        query_backend_url: "http://127.0.0.1:9".to_string(),
        query_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Records every executed request and answers with a fixed payload.
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<(MetricRequest, ScopedIdentity)>>,
}

impl RecordingExecutor {
    pub fn calls(&self) -> Vec<(MetricRequest, ScopedIdentity)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryExecutor for RecordingExecutor {
    async fn execute(
        &self,
        request: &MetricRequest,
        identity: &ScopedIdentity,
    ) -> Result<Value, CoreError> {
        identity.ensure_can_query(&request.queries)?;
        self.calls
            .lock()
            .unwrap()
            .push((request.clone(), identity.clone()));
        Ok(json!({ "results": { "A": { "status": 200 } } }))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Org 1 dashboard `dash-1`: panel 7 queries `ds-A` and `ds-B`, panel 8
/// queries `ds-C` through the panel datasource, panel 9 is a text panel.
pub fn scenario_dashboard() -> Dashboard {
    Dashboard::new(
        "dash-1",
        1,
        "Service Overview",
        json!({
            "time": { "from": "now-24h", "to": "now" },
            "panels": [
                { "id": 7, "type": "timeseries", "targets": [
                    { "refId": "A", "datasource": { "uid": "ds-A", "type": "prometheus" }, "expr": "up" },
                    { "refId": "B", "datasource": { "uid": "ds-B", "type": "loki" }, "expr": "{job=\"api\"}" }
                ]},
                { "id": 8, "type": "stat", "datasource": { "uid": "ds-C" }, "targets": [{ "refId": "A" }] },
                { "id": 9, "type": "text" }
            ]
        }),
    )
    .expect("fixture dashboard parses")
}

/// A share of `dash-1` in org 1.
pub fn share(token: &str, is_enabled: bool, time_settings: Option<TimeSettings>) -> PublicDashboardConfig {
    PublicDashboardConfig {
        uid: "pd-seed".into(),
        dashboard_uid: "dash-1".into(),
        org_id: 1,
        is_enabled,
        time_settings,
        access_token: token.into(),
        created_by: 1,
        created_at: Utc::now(),
        updated_by: None,
        updated_at: None,
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryPublicDashboardStore>,
    pub executor: Arc<RecordingExecutor>,
}

/// Build the full application router over an empty store that only knows
/// [`scenario_dashboard`].
pub async fn build_test_app() -> TestApp {
    let store = Arc::new(InMemoryPublicDashboardStore::new());
    store.add_dashboard(scenario_dashboard()).await;
    let executor = Arc::new(RecordingExecutor::default());

    let config = test_config();
    let state = AppState {
        service: Arc::new(PublicDashboardService::new(store.clone())),
        query_executor: executor.clone(),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        executor,
    }
}

/// Like [`build_test_app`], with `config` already stored.
pub async fn build_shared_app(config: PublicDashboardConfig) -> TestApp {
    let app = build_test_app().await;
    app.store.insert(config).await.expect("seed config");
    app
}

/// A valid owner JWT for org 1.
pub fn bearer(role: &str) -> String {
    bearer_in_org(1, role)
}

pub fn bearer_in_org(org_id: i64, role: &str) -> String {
    let token = generate_access_token(42, org_id, role, &test_config().jwt)
        .expect("token generation should succeed");
    format!("Bearer {token}")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, auth: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(auth), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, auth: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(auth), Some(body)).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
