//! Dashboard row model.

use pubdash_core::store::StoredDashboard;
use pubdash_core::types::{DbId, OrgId};
use sqlx::FromRow;

/// A row from the `dashboards` table.
#[derive(Debug, Clone, FromRow)]
pub struct DashboardRow {
    pub id: DbId,
    pub uid: String,
    pub org_id: OrgId,
    pub title: String,
    pub data: serde_json::Value,
}

/// The document is left unparsed; the resolver parses it only for enabled
/// shares.
impl From<DashboardRow> for StoredDashboard {
    fn from(row: DashboardRow) -> Self {
        StoredDashboard {
            uid: row.uid,
            org_id: row.org_id,
            title: row.title,
            data: row.data,
        }
    }
}
