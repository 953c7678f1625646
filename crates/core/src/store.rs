//! Storage collaborator for public dashboard configs and their dashboards.
//!
//! Each call is treated as one atomic unit; the pipeline adds no locking or
//! multi-step transactions on top.

use async_trait::async_trait;
use serde_json::Value;

use crate::dashboard::{Dashboard, DocumentError};
use crate::error::StoreError;
use crate::public_dashboard::{PublicDashboardConfig, PublicDashboardUpdate, TimeSettings};
use crate::types::{DbId, OrgId, Timestamp};

// ---------------------------------------------------------------------------
// Stored records
// ---------------------------------------------------------------------------

/// A share exactly as storage holds it, JSON columns still undecoded.
///
/// Token lookups hand these back so the resolver can settle existence and
/// enablement before trusting any stored JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredShare {
    pub uid: String,
    pub dashboard_uid: String,
    pub org_id: OrgId,
    pub is_enabled: bool,
    pub time_settings: Option<Value>,
    pub access_token: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_by: Option<DbId>,
    pub updated_at: Option<Timestamp>,
}

impl StoredShare {
    /// Decode the stored columns into a [`PublicDashboardConfig`].
    pub fn into_config(self) -> Result<PublicDashboardConfig, StoreError> {
        Ok(PublicDashboardConfig {
            time_settings: TimeSettings::from_stored(self.time_settings)?,
            uid: self.uid,
            dashboard_uid: self.dashboard_uid,
            org_id: self.org_id,
            is_enabled: self.is_enabled,
            access_token: self.access_token,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_by: self.updated_by,
            updated_at: self.updated_at,
        })
    }
}

impl From<PublicDashboardConfig> for StoredShare {
    fn from(config: PublicDashboardConfig) -> Self {
        Self {
            time_settings: config.time_settings.as_ref().map(TimeSettings::to_stored),
            uid: config.uid,
            dashboard_uid: config.dashboard_uid,
            org_id: config.org_id,
            is_enabled: config.is_enabled,
            access_token: config.access_token,
            created_by: config.created_by,
            created_at: config.created_at,
            updated_by: config.updated_by,
            updated_at: config.updated_at,
        }
    }
}

/// A dashboard row with its document not yet parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDashboard {
    pub uid: String,
    pub org_id: OrgId,
    pub title: String,
    pub data: Value,
}

impl StoredDashboard {
    pub fn parse(self) -> Result<Dashboard, DocumentError> {
        Dashboard::new(self.uid, self.org_id, self.title, self.data)
    }
}

impl From<Dashboard> for StoredDashboard {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            uid: dashboard.uid,
            org_id: dashboard.org_id,
            title: dashboard.title,
            data: dashboard.data,
        }
    }
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PublicDashboardStore: Send + Sync {
    /// Look up a share by access token, along with the dashboard it points at.
    ///
    /// Either side may be absent: a share can outlive its dashboard. Neither
    /// side is decoded here.
    async fn get_by_token(
        &self,
        access_token: &str,
    ) -> Result<(Option<StoredShare>, Option<StoredDashboard>), StoreError>;

    /// The share of one dashboard, enabled or not.
    async fn get_config(
        &self,
        org_id: OrgId,
        dashboard_uid: &str,
    ) -> Result<Option<PublicDashboardConfig>, StoreError>;

    /// A fresh, unused share uid.
    async fn generate_uid(&self) -> Result<String, StoreError>;

    /// Persist a new share. A token collision is [`StoreError::DuplicateToken`].
    async fn insert(
        &self,
        config: PublicDashboardConfig,
    ) -> Result<PublicDashboardConfig, StoreError>;

    /// Apply `update` to the share it selects. A missing row is
    /// [`StoreError::RowNotFound`].
    async fn update(
        &self,
        update: PublicDashboardUpdate,
    ) -> Result<PublicDashboardConfig, StoreError>;

    /// Cheap reachability probe for health reporting.
    async fn ping(&self) -> Result<(), StoreError>;
}
