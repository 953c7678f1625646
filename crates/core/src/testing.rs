//! Shared fixtures for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::access_token::AccessTokenGenerator;
use crate::dashboard::Dashboard;
use crate::error::{CoreError, StoreError};
use crate::memory_store::InMemoryPublicDashboardStore;
use crate::public_dashboard::{PublicDashboardConfig, PublicDashboardUpdate, TimeSettings};
use crate::service::PublicDashboardService;
use crate::store::{PublicDashboardStore, StoredDashboard, StoredShare};
use crate::types::OrgId;

pub const TOKEN: &str = "0123456789abcdef0123456789abcdef";

/// Org 1 dashboard `dash-1`: panel 7 queries `ds-A` and `ds-B`, panel 8
/// queries `ds-C`, panel 9 is a text panel.
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

pub fn config(
    token: &str,
    is_enabled: bool,
    time_settings: Option<TimeSettings>,
) -> PublicDashboardConfig {
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

/// A service over an in-memory store holding [`scenario_dashboard`] and
/// `config`.
pub async fn seeded_service(
    config: PublicDashboardConfig,
) -> (PublicDashboardService, Arc<InMemoryPublicDashboardStore>) {
    let store = Arc::new(InMemoryPublicDashboardStore::new());
    store.add_dashboard(scenario_dashboard()).await;
    store.insert(config).await.expect("seed config");
    (PublicDashboardService::new(store.clone()), store)
}

/// Hands out a fixed sequence of tokens; `None` simulates an unavailable
/// randomness source.
pub struct SequenceTokens(Mutex<VecDeque<Option<String>>>);

impl SequenceTokens {
    pub fn new(tokens: &[Option<&str>]) -> Self {
        Self(Mutex::new(
            tokens.iter().map(|t| t.map(str::to_owned)).collect(),
        ))
    }
}

impl AccessTokenGenerator for SequenceTokens {
    fn generate(&self) -> Result<String, CoreError> {
        match self.0.lock().unwrap().pop_front() {
            Some(Some(token)) => Ok(token),
            _ => Err(CoreError::RandomnessUnavailable("exhausted".into())),
        }
    }
}

/// Answers every token lookup with the same raw records, whatever their
/// contents. Writes are refused.
pub struct FixedLookupStore {
    share: Option<StoredShare>,
    dashboard: Option<StoredDashboard>,
}

impl FixedLookupStore {
    pub fn new(share: Option<StoredShare>, dashboard: Option<StoredDashboard>) -> Self {
        Self { share, dashboard }
    }
}

#[async_trait]
impl PublicDashboardStore for FixedLookupStore {
    async fn get_by_token(
        &self,
        _access_token: &str,
    ) -> Result<(Option<StoredShare>, Option<StoredDashboard>), StoreError> {
        Ok((self.share.clone(), self.dashboard.clone()))
    }

    async fn get_config(
        &self,
        _org_id: OrgId,
        _dashboard_uid: &str,
    ) -> Result<Option<PublicDashboardConfig>, StoreError> {
        Ok(None)
    }

    async fn generate_uid(&self) -> Result<String, StoreError> {
        Ok("pd-fixed".into())
    }

    async fn insert(
        &self,
        _config: PublicDashboardConfig,
    ) -> Result<PublicDashboardConfig, StoreError> {
        Err(StoreError::RowNotFound)
    }

    async fn update(
        &self,
        _update: PublicDashboardUpdate,
    ) -> Result<PublicDashboardConfig, StoreError> {
        Err(StoreError::RowNotFound)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
