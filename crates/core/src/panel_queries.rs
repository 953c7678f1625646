//! Per-panel query extraction.

use crate::dashboard::{Dashboard, Query};
use crate::error::CoreError;
use crate::types::PanelId;

/// Return the queries `panel_id` issues, in declaration order.
///
/// A panel that exists but declares no targets yields an empty list. A panel
/// whose targets failed validation yields [`CoreError::InvalidPanel`]; no
/// partial query list is ever returned for it.
pub fn extract_queries(dashboard: &Dashboard, panel_id: PanelId) -> Result<Vec<Query>, CoreError> {
    match dashboard.document().queries.get(panel_id) {
        Some(Ok(queries)) => Ok(queries.to_vec()),
        Some(Err(e)) => {
            tracing::warn!(
                dashboard_uid = %dashboard.uid,
                panel_id,
                error = %e,
                "Refusing to run queries of an invalid panel",
            );
            Err(CoreError::InvalidPanel(e.clone()))
        }
        None => Err(CoreError::PanelNotFound { panel_id }),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::dashboard::PanelError;

    fn dashboard() -> Dashboard {
        Dashboard::new(
            "dash",
            1,
            "Ops",
            json!({
                "panels": [
                    { "id": 7, "targets": [
                        { "refId": "A", "datasource": { "uid": "ds-A" } },
                        { "refId": "B", "datasource": { "uid": "ds-B" } }
                    ]},
                    { "id": 8, "type": "text" },
                    { "id": 10, "targets": [{ "refId": "A" }] }
                ]
            }),
        )
        .unwrap()
    }

    #[test]
    fn returns_queries_in_order() {
        let queries = extract_queries(&dashboard(), 7).unwrap();
        let uids: Vec<_> = queries.iter().map(|q| q.datasource.uid.as_str()).collect();
        assert_eq!(uids, ["ds-A", "ds-B"]);
    }

    #[test]
    fn panel_without_targets_is_empty_not_missing() {
        assert!(extract_queries(&dashboard(), 8).unwrap().is_empty());
    }

    #[test]
    fn invalid_panel_fails_without_affecting_neighbours() {
        let dashboard = dashboard();
        let err = extract_queries(&dashboard, 10).unwrap_err();
        assert_matches!(
            err,
            CoreError::InvalidPanel(PanelError::MissingDatasource { panel_id: 10, index: 0 })
        );
        assert_eq!(extract_queries(&dashboard, 7).unwrap().len(), 2);
    }

    #[test]
    fn unknown_panel_is_panel_not_found() {
        let err = extract_queries(&dashboard(), 99).unwrap_err();
        assert_matches!(err, CoreError::PanelNotFound { panel_id: 99 });
    }
}
