//! In-memory [`PublicDashboardStore`] for tests and local harnesses.
//!
//! Mirrors the constraints of the relational store: unique access tokens,
//! one share per dashboard, updates matched on uid + org + dashboard.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::access_token::tokens_match;
use crate::dashboard::Dashboard;
use crate::error::StoreError;
use crate::public_dashboard::{PublicDashboardConfig, PublicDashboardUpdate};
use crate::store::{PublicDashboardStore, StoredDashboard, StoredShare};
use crate::types::OrgId;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MemoryStoreError(String);

#[derive(Default)]
struct Inner {
    configs: HashMap<String, PublicDashboardConfig>,
    dashboards: HashMap<(OrgId, String), StoredDashboard>,
    next_uid: u64,
    unavailable: bool,
}

impl Inner {
    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::backend(MemoryStoreError(
                "store unavailable".into(),
            )));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryPublicDashboardStore {
    inner: RwLock<Inner>,
}

impl InMemoryPublicDashboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dashboard so shares can resolve to it.
    pub async fn add_dashboard(&self, dashboard: Dashboard) {
        self.add_stored_dashboard(dashboard.into()).await;
    }

    /// Register a dashboard row as-is, without parsing its document.
    pub async fn add_stored_dashboard(&self, dashboard: StoredDashboard) {
        let key = (dashboard.org_id, dashboard.uid.clone());
        self.inner.write().await.dashboards.insert(key, dashboard);
    }

    /// Drop a dashboard while leaving any share pointing at it in place.
    pub async fn remove_dashboard(&self, org_id: OrgId, uid: &str) -> Option<StoredDashboard> {
        self.inner
            .write()
            .await
            .dashboards
            .remove(&(org_id, uid.to_string()))
    }

    /// Make every subsequent call fail with a backend error.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.inner.write().await.unavailable = unavailable;
    }

    pub async fn configs(&self) -> Vec<PublicDashboardConfig> {
        self.inner.read().await.configs.values().cloned().collect()
    }
}

#[async_trait]
impl PublicDashboardStore for InMemoryPublicDashboardStore {
    async fn get_by_token(
        &self,
        access_token: &str,
    ) -> Result<(Option<StoredShare>, Option<StoredDashboard>), StoreError> {
        let inner = self.inner.read().await;
        inner.check_available()?;

        let config = inner
            .configs
            .values()
            .find(|c| tokens_match(&c.access_token, access_token))
            .cloned();
        let dashboard = config.as_ref().and_then(|c| {
            inner
                .dashboards
                .get(&(c.org_id, c.dashboard_uid.clone()))
                .cloned()
        });
        Ok((config.map(StoredShare::from), dashboard))
    }

    async fn get_config(
        &self,
        org_id: OrgId,
        dashboard_uid: &str,
    ) -> Result<Option<PublicDashboardConfig>, StoreError> {
        let inner = self.inner.read().await;
        inner.check_available()?;

        Ok(inner
            .configs
            .values()
            .find(|c| c.org_id == org_id && c.dashboard_uid == dashboard_uid)
            .cloned())
    }

    async fn generate_uid(&self) -> Result<String, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check_available()?;

        inner.next_uid += 1;
        Ok(format!("pd-{}", inner.next_uid))
    }

    async fn insert(
        &self,
        config: PublicDashboardConfig,
    ) -> Result<PublicDashboardConfig, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check_available()?;

        if inner
            .configs
            .values()
            .any(|c| c.access_token == config.access_token)
        {
            return Err(StoreError::DuplicateToken);
        }
        if inner.configs.contains_key(&config.uid)
            || inner
                .configs
                .values()
                .any(|c| c.org_id == config.org_id && c.dashboard_uid == config.dashboard_uid)
        {
            return Err(StoreError::backend(MemoryStoreError(format!(
                "dashboard {} already has a public config",
                config.dashboard_uid
            ))));
        }

        inner.configs.insert(config.uid.clone(), config.clone());
        Ok(config)
    }

    async fn update(
        &self,
        update: PublicDashboardUpdate,
    ) -> Result<PublicDashboardConfig, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check_available()?;

        let config = inner
            .configs
            .get_mut(&update.uid)
            .filter(|c| c.org_id == update.org_id && c.dashboard_uid == update.dashboard_uid)
            .ok_or(StoreError::RowNotFound)?;

        config.is_enabled = update.is_enabled;
        config.time_settings = update.time_settings;
        config.updated_by = Some(update.updated_by);
        config.updated_at = Some(update.updated_at);
        Ok(config.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.read().await.check_available()
    }
}
