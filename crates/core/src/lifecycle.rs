//! Create-or-update of public dashboard configs.
//!
//! The presence of a config uid selects the path. Creation assigns the uid,
//! token and creation stamps; updates only ever carry `is_enabled` and
//! `time_settings`.

use chrono::Utc;

use crate::error::{CoreError, StoreError};
use crate::public_dashboard::{
    PublicDashboardConfig, PublicDashboardUpdate, SavePublicDashboardConfig,
};
use crate::service::PublicDashboardService;
use crate::types::OrgId;

/// Token generation or insert collision is retried once before surfacing.
pub const MAX_TOKEN_ATTEMPTS: u32 = 2;

impl PublicDashboardService {
    /// The share of a dashboard, for its owners. Disabled shares are returned.
    pub async fn get_config(
        &self,
        org_id: OrgId,
        dashboard_uid: &str,
    ) -> Result<Option<PublicDashboardConfig>, CoreError> {
        Ok(self.store.get_config(org_id, dashboard_uid).await?)
    }

    /// Persist a share, creating it when `dto.config.uid` is unset.
    pub async fn save_config(
        &self,
        dto: SavePublicDashboardConfig,
    ) -> Result<PublicDashboardConfig, CoreError> {
        if dto.dashboard_uid.trim().is_empty() {
            return Err(CoreError::MissingDashboardRef);
        }

        match dto.config.uid.clone().filter(|uid| !uid.is_empty()) {
            None => self.create_config(dto).await,
            Some(uid) => self.update_config(uid, dto).await,
        }
    }

    async fn create_config(
        &self,
        dto: SavePublicDashboardConfig,
    ) -> Result<PublicDashboardConfig, CoreError> {
        let uid = self.store.generate_uid().await?;

        let mut attempt = 0;
        loop {
            attempt += 1;

            let access_token = match self.tokens.generate() {
                Ok(token) => token,
                Err(CoreError::RandomnessUnavailable(reason)) if attempt < MAX_TOKEN_ATTEMPTS => {
                    tracing::warn!(%reason, attempt, "Access token generation failed, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            };

            let config = PublicDashboardConfig {
                uid: uid.clone(),
                dashboard_uid: dto.dashboard_uid.clone(),
                org_id: dto.org_id,
                is_enabled: dto.config.is_enabled,
                time_settings: dto.config.time_settings.clone(),
                access_token,
                created_by: dto.user_id,
                created_at: Utc::now(),
                updated_by: None,
                updated_at: None,
            };

            match self.store.insert(config).await {
                Ok(saved) => {
                    tracing::info!(
                        public_dashboard_uid = %saved.uid,
                        dashboard_uid = %saved.dashboard_uid,
                        org_id = saved.org_id,
                        user_id = dto.user_id,
                        is_enabled = saved.is_enabled,
                        "Public dashboard config created",
                    );
                    return Ok(saved);
                }
                Err(StoreError::DuplicateToken) if attempt < MAX_TOKEN_ATTEMPTS => {
                    tracing::warn!(attempt, "Access token collided on insert, retrying");
                }
                Err(StoreError::DuplicateToken) => return Err(CoreError::DuplicateToken),
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn update_config(
        &self,
        uid: String,
        dto: SavePublicDashboardConfig,
    ) -> Result<PublicDashboardConfig, CoreError> {
        let update = PublicDashboardUpdate {
            uid,
            org_id: dto.org_id,
            dashboard_uid: dto.dashboard_uid,
            is_enabled: dto.config.is_enabled,
            time_settings: dto.config.time_settings,
            updated_by: dto.user_id,
            updated_at: Utc::now(),
        };

        let saved = self.store.update(update).await?;
        tracing::info!(
            public_dashboard_uid = %saved.uid,
            dashboard_uid = %saved.dashboard_uid,
            org_id = saved.org_id,
            user_id = dto.user_id,
            is_enabled = saved.is_enabled,
            "Public dashboard config updated",
        );
        Ok(saved)
    }
}
