//! Token resolution: the single trust-establishing step of the pipeline.
//!
//! Every rejection returns the same [`CoreError::NotFound`]. The reason is
//! only visible to operators, through `debug` logs that never include the
//! token itself. Stored JSON (time settings, the dashboard document) is only
//! decoded once the share is known to exist and be enabled, so corrupt data
//! behind a disabled share is as invisible as the share itself.

use crate::access_token::{is_valid_access_token, tokens_match};
use crate::dashboard::Dashboard;
use crate::error::CoreError;
use crate::public_dashboard::PublicDashboardConfig;
use crate::service::PublicDashboardService;
use crate::time_window::resolve_time_window;

impl PublicDashboardService {
    /// Resolve `access_token` to its enabled share and the shared dashboard.
    pub async fn resolve(
        &self,
        access_token: &str,
    ) -> Result<(PublicDashboardConfig, Dashboard), CoreError> {
        if !is_valid_access_token(access_token) {
            tracing::debug!("Rejected malformed public dashboard access token");
            return Err(CoreError::NotFound);
        }

        let (share, dashboard) = self.store.get_by_token(access_token).await?;

        let Some(share) = share else {
            tracing::debug!("No public dashboard config matches access token");
            return Err(CoreError::NotFound);
        };

        if !tokens_match(&share.access_token, access_token) {
            tracing::warn!(
                public_dashboard_uid = %share.uid,
                "Storage returned a public dashboard config for a different token",
            );
            return Err(CoreError::NotFound);
        }

        let Some(dashboard) = dashboard else {
            tracing::debug!(
                public_dashboard_uid = %share.uid,
                dashboard_uid = %share.dashboard_uid,
                "Public dashboard config points at a missing dashboard",
            );
            return Err(CoreError::NotFound);
        };

        if dashboard.org_id != share.org_id || dashboard.uid != share.dashboard_uid {
            tracing::warn!(
                public_dashboard_uid = %share.uid,
                dashboard_uid = %share.dashboard_uid,
                "Public dashboard config and dashboard disagree on ownership",
            );
            return Err(CoreError::NotFound);
        }

        if !share.is_enabled {
            tracing::debug!(
                public_dashboard_uid = %share.uid,
                dashboard_uid = %share.dashboard_uid,
                "Public dashboard is disabled",
            );
            return Err(CoreError::NotFound);
        }

        let share_uid = share.uid.clone();
        let config = share.into_config().inspect_err(|e| {
            tracing::error!(
                public_dashboard_uid = %share_uid,
                error = %e,
                "Enabled public dashboard has unreadable time settings",
            );
        })?;
        let dashboard = dashboard.parse().inspect_err(|e| {
            tracing::error!(
                public_dashboard_uid = %config.uid,
                dashboard_uid = %config.dashboard_uid,
                error = %e,
                "Enabled public dashboard points at an unreadable document",
            );
        })?;

        Ok((config, dashboard))
    }

    /// The shared dashboard with its time range replaced by the effective
    /// window.
    pub async fn get_public_dashboard(&self, access_token: &str) -> Result<Dashboard, CoreError> {
        let (config, dashboard) = self.resolve(access_token).await?;
        let window = resolve_time_window(&config, &dashboard);
        Ok(dashboard.with_time_window(&window))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use std::sync::Arc;

    use serde_json::json;

    use crate::error::{CoreError, StoreError};
    use crate::public_dashboard::TimeSettings;
    use crate::service::PublicDashboardService;
    use crate::store::{StoredDashboard, StoredShare};
    use crate::testing::{config, scenario_dashboard, seeded_service, FixedLookupStore, TOKEN};

    fn unreadable_dashboard() -> StoredDashboard {
        StoredDashboard {
            uid: "dash-1".into(),
            org_id: 1,
            title: "Broken".into(),
            data: json!({ "panels": "not-a-list" }),
        }
    }

    fn share_with_partial_time(is_enabled: bool) -> StoredShare {
        let mut share = StoredShare::from(config(TOKEN, is_enabled, None));
        share.time_settings = Some(json!({ "from": "now-1h" }));
        share
    }

    fn fixed(share: StoredShare, dashboard: StoredDashboard) -> PublicDashboardService {
        PublicDashboardService::new(Arc::new(FixedLookupStore::new(Some(share), Some(dashboard))))
    }

    #[tokio::test]
    async fn resolves_enabled_share() {
        let (service, _) = seeded_service(config(TOKEN, true, None)).await;
        let (config, dashboard) = service.resolve(TOKEN).await.unwrap();
        assert_eq!(config.access_token, TOKEN);
        assert_eq!(dashboard.uid, "dash-1");
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let (service, _) = seeded_service(config(TOKEN, true, None)).await;
        let err = service
            .resolve("ffffffffffffffffffffffffffffffff")
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::NotFound);
    }

    #[tokio::test]
    async fn malformed_token_is_not_found() {
        let (service, _) = seeded_service(config(TOKEN, true, None)).await;
        assert_matches!(service.resolve("../etc").await, Err(CoreError::NotFound));
        assert_matches!(service.resolve("").await, Err(CoreError::NotFound));
    }

    #[tokio::test]
    async fn disabled_share_is_not_found() {
        let (service, store) = seeded_service(config(TOKEN, false, None)).await;
        assert_eq!(store.configs().await.len(), 1, "row exists");
        assert_matches!(service.resolve(TOKEN).await, Err(CoreError::NotFound));
    }

    #[tokio::test]
    async fn missing_dashboard_is_not_found() {
        let (service, store) = seeded_service(config(TOKEN, true, None)).await;
        store.remove_dashboard(1, "dash-1").await;
        assert_matches!(service.resolve(TOKEN).await, Err(CoreError::NotFound));
    }

    #[tokio::test]
    async fn disabled_share_hides_unreadable_stored_data() {
        let service = fixed(share_with_partial_time(false), unreadable_dashboard());
        assert_matches!(service.resolve(TOKEN).await, Err(CoreError::NotFound));
    }

    #[tokio::test]
    async fn enabled_share_with_unreadable_document_fails() {
        let share = StoredShare::from(config(TOKEN, true, None));
        let service = fixed(share, unreadable_dashboard());
        assert_matches!(
            service.resolve(TOKEN).await,
            Err(CoreError::InvalidDocument(_))
        );
    }

    #[tokio::test]
    async fn enabled_share_with_partial_time_settings_fails() {
        let service = fixed(
            share_with_partial_time(true),
            StoredDashboard::from(scenario_dashboard()),
        );
        assert_matches!(
            service.resolve(TOKEN).await,
            Err(CoreError::Storage(StoreError::InvalidTimeSettings(_)))
        );
    }

    #[tokio::test]
    async fn storage_failure_is_propagated() {
        let (service, store) = seeded_service(config(TOKEN, true, None)).await;
        store.set_unavailable(true).await;
        assert_matches!(
            service.resolve(TOKEN).await,
            Err(CoreError::Storage(StoreError::Backend(_)))
        );
    }

    #[tokio::test]
    async fn public_dashboard_carries_effective_time() {
        let settings = TimeSettings {
            from: "now-30m".into(),
            to: "now".into(),
        };
        let (service, _) = seeded_service(config(TOKEN, true, Some(settings))).await;
        let dashboard = service.get_public_dashboard(TOKEN).await.unwrap();
        assert_eq!(dashboard.data["time"]["from"], "now-30m");
        assert_eq!(dashboard.data["time"]["to"], "now");
        assert_eq!(dashboard.title, scenario_dashboard().title);
    }
}
