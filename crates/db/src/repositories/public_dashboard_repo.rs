//! Repository for the `public_dashboards` table.

use pubdash_core::public_dashboard::{PublicDashboardConfig, PublicDashboardUpdate};
use pubdash_core::types::OrgId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::public_dashboard::{PublicDashboardRow, COLUMNS};

/// Provides lookups and writes for public dashboard configs.
pub struct PublicDashboardRepo;

impl PublicDashboardRepo {
    /// Find a config by its access token, enabled or not.
    pub async fn find_by_access_token(
        pool: &PgPool,
        access_token: &str,
    ) -> Result<Option<PublicDashboardRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM public_dashboards WHERE access_token = $1");
        sqlx::query_as::<_, PublicDashboardRow>(&query)
            .bind(access_token)
            .fetch_optional(pool)
            .await
    }

    /// Find the config of one dashboard.
    pub async fn find_by_dashboard(
        pool: &PgPool,
        org_id: OrgId,
        dashboard_uid: &str,
    ) -> Result<Option<PublicDashboardRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM public_dashboards WHERE org_id = $1 AND dashboard_uid = $2"
        );
        sqlx::query_as::<_, PublicDashboardRow>(&query)
            .bind(org_id)
            .bind(dashboard_uid)
            .fetch_optional(pool)
            .await
    }

    /// Whether a config with `uid` exists.
    pub async fn uid_exists(pool: &PgPool, uid: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM public_dashboards WHERE uid = $1)",
        )
        .bind(uid)
        .fetch_one(pool)
        .await
    }

    /// Insert a fully formed config. Token collisions surface as a unique
    /// violation on `uq_public_dashboards_access_token`.
    pub async fn create(
        pool: &PgPool,
        config: &PublicDashboardConfig,
    ) -> Result<PublicDashboardRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO public_dashboards \
                (uid, dashboard_uid, org_id, is_enabled, time_settings, access_token, \
                 created_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PublicDashboardRow>(&query)
            .bind(&config.uid)
            .bind(&config.dashboard_uid)
            .bind(config.org_id)
            .bind(config.is_enabled)
            .bind(config.time_settings.as_ref().map(Json))
            .bind(&config.access_token)
            .bind(config.created_by)
            .bind(config.created_at)
            .fetch_one(pool)
            .await
    }

    /// Apply an update to the row matching uid, org and dashboard.
    ///
    /// Only `is_enabled`, `time_settings` and the update stamps are written.
    /// Returns `None` if no row matches.
    pub async fn update(
        pool: &PgPool,
        update: &PublicDashboardUpdate,
    ) -> Result<Option<PublicDashboardRow>, sqlx::Error> {
        let query = format!(
            "UPDATE public_dashboards \
             SET is_enabled = $4, time_settings = $5, updated_by = $6, updated_at = $7 \
             WHERE uid = $1 AND org_id = $2 AND dashboard_uid = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PublicDashboardRow>(&query)
            .bind(&update.uid)
            .bind(update.org_id)
            .bind(&update.dashboard_uid)
            .bind(update.is_enabled)
            .bind(update.time_settings.as_ref().map(Json))
            .bind(update.updated_by)
            .bind(update.updated_at)
            .fetch_optional(pool)
            .await
    }
}
