//! Read-only repository for the `dashboards` table.

use pubdash_core::types::OrgId;
use sqlx::PgPool;

use crate::models::dashboard::DashboardRow;

/// Column list for `dashboards` queries.
const COLUMNS: &str = "id, uid, org_id, title, data";

pub struct DashboardRepo;

impl DashboardRepo {
    /// Find a dashboard by uid within one org.
    pub async fn find_by_uid(
        pool: &PgPool,
        org_id: OrgId,
        uid: &str,
    ) -> Result<Option<DashboardRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dashboards WHERE org_id = $1 AND uid = $2");
        sqlx::query_as::<_, DashboardRow>(&query)
            .bind(org_id)
            .bind(uid)
            .fetch_optional(pool)
            .await
    }
}
