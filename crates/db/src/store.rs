//! sqlx-backed [`PublicDashboardStore`].

use async_trait::async_trait;
use pubdash_core::error::StoreError;
use pubdash_core::public_dashboard::{PublicDashboardConfig, PublicDashboardUpdate};
use pubdash_core::store::{PublicDashboardStore, StoredDashboard, StoredShare};
use pubdash_core::types::OrgId;
use rand::Rng;

use crate::repositories::{DashboardRepo, PublicDashboardRepo};
use crate::DbPool;

/// Length of generated config uids (alphanumeric characters).
pub const UID_LENGTH: usize = 12;

/// Attempts at finding an unused uid before giving up.
const MAX_UID_ATTEMPTS: usize = 3;

/// Constraint whose violation means a generated token was already taken.
const ACCESS_TOKEN_CONSTRAINT: &str = "uq_public_dashboards_access_token";

#[derive(Debug, thiserror::Error)]
pub enum PgStoreError {
    #[error("Could not generate an unused public dashboard uid")]
    UidExhausted,
}

pub struct PgPublicDashboardStore {
    pool: DbPool,
}

impl PgPublicDashboardStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Map a sqlx error into a [`StoreError`], recognising token collisions
/// (PostgreSQL unique violation, code 23505, on the access token constraint).
fn classify_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some(ACCESS_TOKEN_CONSTRAINT)
        {
            return StoreError::DuplicateToken;
        }
    }
    StoreError::backend(err)
}

fn random_uid() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(UID_LENGTH)
        .map(char::from)
        .collect()
}

#[async_trait]
impl PublicDashboardStore for PgPublicDashboardStore {
    async fn get_by_token(
        &self,
        access_token: &str,
    ) -> Result<(Option<StoredShare>, Option<StoredDashboard>), StoreError> {
        let Some(row) = PublicDashboardRepo::find_by_access_token(&self.pool, access_token)
            .await
            .map_err(StoreError::backend)?
        else {
            return Ok((None, None));
        };
        let share = StoredShare::from(row);

        let dashboard = DashboardRepo::find_by_uid(&self.pool, share.org_id, &share.dashboard_uid)
            .await
            .map_err(StoreError::backend)?
            .map(StoredDashboard::from);

        Ok((Some(share), dashboard))
    }

    async fn get_config(
        &self,
        org_id: OrgId,
        dashboard_uid: &str,
    ) -> Result<Option<PublicDashboardConfig>, StoreError> {
        PublicDashboardRepo::find_by_dashboard(&self.pool, org_id, dashboard_uid)
            .await
            .map_err(StoreError::backend)?
            .map(PublicDashboardConfig::try_from)
            .transpose()
    }

    async fn generate_uid(&self) -> Result<String, StoreError> {
        for _ in 0..MAX_UID_ATTEMPTS {
            let uid = random_uid();
            let taken = PublicDashboardRepo::uid_exists(&self.pool, &uid)
                .await
                .map_err(StoreError::backend)?;
            if !taken {
                return Ok(uid);
            }
            tracing::debug!(%uid, "Generated public dashboard uid already taken");
        }
        Err(StoreError::backend(PgStoreError::UidExhausted))
    }

    async fn insert(
        &self,
        config: PublicDashboardConfig,
    ) -> Result<PublicDashboardConfig, StoreError> {
        let row = PublicDashboardRepo::create(&self.pool, &config)
            .await
            .map_err(classify_sqlx_error)?;
        PublicDashboardConfig::try_from(row)
    }

    async fn update(
        &self,
        update: PublicDashboardUpdate,
    ) -> Result<PublicDashboardConfig, StoreError> {
        let row = PublicDashboardRepo::update(&self.pool, &update)
            .await
            .map_err(StoreError::backend)?
            .ok_or(StoreError::RowNotFound)?;
        PublicDashboardConfig::try_from(row)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(StoreError::backend)
    }
}
