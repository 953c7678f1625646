//! Effective time window of a public query.
//!
//! The anonymous caller's requested range is never consulted: the share's
//! override wins, otherwise the dashboard's declared range applies.

use serde::Serialize;

use crate::dashboard::Dashboard;
use crate::public_dashboard::PublicDashboardConfig;

/// The `(from, to)` pair actually used for a public request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveTimeWindow {
    pub from: String,
    pub to: String,
}

/// Merge the share's time settings with the dashboard's own range.
pub fn resolve_time_window(
    config: &PublicDashboardConfig,
    dashboard: &Dashboard,
) -> EffectiveTimeWindow {
    match &config.time_settings {
        Some(settings) => EffectiveTimeWindow {
            from: settings.from.clone(),
            to: settings.to.clone(),
        },
        None => {
            let declared = &dashboard.document().time;
            EffectiveTimeWindow {
                from: declared.from.clone(),
                to: declared.to.clone(),
            }
        }
    }
}
