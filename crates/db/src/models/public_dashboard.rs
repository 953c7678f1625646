//! Public dashboard config row model.

use pubdash_core::error::StoreError;
use pubdash_core::public_dashboard::PublicDashboardConfig;
use pubdash_core::store::StoredShare;
use pubdash_core::types::{DbId, OrgId, Timestamp};
use sqlx::FromRow;

/// Column list for `public_dashboards` queries.
pub const COLUMNS: &str = "\
    uid, dashboard_uid, org_id, is_enabled, time_settings, access_token, \
    created_by, created_at, updated_by, updated_at";

/// A row from the `public_dashboards` table.
#[derive(Debug, Clone, FromRow)]
pub struct PublicDashboardRow {
    pub uid: String,
    pub dashboard_uid: String,
    pub org_id: OrgId,
    pub is_enabled: bool,
    pub time_settings: Option<serde_json::Value>,
    pub access_token: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_by: Option<DbId>,
    pub updated_at: Option<Timestamp>,
}

impl From<PublicDashboardRow> for StoredShare {
    fn from(row: PublicDashboardRow) -> Self {
        StoredShare {
            uid: row.uid,
            dashboard_uid: row.dashboard_uid,
            org_id: row.org_id,
            is_enabled: row.is_enabled,
            time_settings: row.time_settings,
            access_token: row.access_token,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_by: row.updated_by,
            updated_at: row.updated_at,
        }
    }
}

impl TryFrom<PublicDashboardRow> for PublicDashboardConfig {
    type Error = StoreError;

    /// `NULL` and `{}` both mean "no override".
    fn try_from(row: PublicDashboardRow) -> Result<Self, Self::Error> {
        StoredShare::from(row).into_config()
    }
}
