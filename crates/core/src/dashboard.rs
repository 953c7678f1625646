//! Dashboard entity and its parsed query document.
//!
//! Dashboards are owned by an external service; this crate only reads them.
//! The loosely structured JSON document is parsed exactly once, when the
//! dashboard is constructed, into a typed [`PanelQueries`] index and the
//! declared [`TimeRange`]. Nothing downstream walks raw JSON.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::time_window::EffectiveTimeWindow;
use crate::types::{OrgId, PanelId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Range a dashboard declares when its document has no `time` block.
pub const DEFAULT_TIME_FROM: &str = "now-6h";
pub const DEFAULT_TIME_TO: &str = "now";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The document as a whole could not be read.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Invalid dashboard document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A panel whose queries cannot be trusted.
///
/// Only the affected panel becomes unusable; every other panel of the
/// document still resolves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    #[error("Panel {panel_id} appears more than once in the dashboard document")]
    DuplicatePanel { panel_id: PanelId },

    #[error("Query {index} of panel {panel_id} has no datasource uid")]
    MissingDatasource { panel_id: PanelId, index: usize },

    /// Uids are joined with commas in identity scopes, so they may not
    /// contain one.
    #[error("Panel {panel_id} references invalid datasource uid '{uid}'")]
    InvalidDatasourceUid { panel_id: PanelId, uid: String },
}

// ---------------------------------------------------------------------------
// Document types
// ---------------------------------------------------------------------------

/// A relative or absolute `(from, to)` pair as written in dashboard JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

impl Default for TimeRange {
    fn default() -> Self {
        Self {
            from: DEFAULT_TIME_FROM.to_string(),
            to: DEFAULT_TIME_TO.to_string(),
        }
    }
}

/// The datasource a query runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasourceRef {
    pub uid: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl DatasourceRef {
    /// Read a reference from either `{"uid": .., "type": ..}` or a bare uid
    /// string. Returns `None` when no non-empty uid is present.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(uid) if !uid.is_empty() => Some(Self {
                uid: uid.clone(),
                kind: None,
            }),
            Value::Object(obj) => {
                let uid = obj.get("uid")?.as_str().filter(|s| !s.is_empty())?;
                Some(Self {
                    uid: uid.to_string(),
                    kind: obj.get("type").and_then(Value::as_str).map(str::to_owned),
                })
            }
            _ => None,
        }
    }
}

/// One backend query issued by a panel.
///
/// Serializes as the original query model so the query backend receives the
/// target exactly as the dashboard declared it.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub ref_id: Option<String>,
    pub datasource: DatasourceRef,
    model: Map<String, Value>,
}

impl Query {
    pub fn model(&self) -> &Map<String, Value> {
        &self.model
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.model.serialize(serializer)
    }
}

/// Ordered queries of every addressable panel, keyed by panel id.
///
/// A panel whose targets failed validation is kept with its [`PanelError`]
/// so lookups can tell "broken" from "absent".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelQueries(PanelIndex);

type PanelIndex = BTreeMap<PanelId, Result<Vec<Query>, PanelError>>;

impl PanelQueries {
    /// Queries of `panel_id` in declaration order, or `None` if the panel is
    /// not part of the document.
    pub fn get(&self, panel_id: PanelId) -> Option<Result<&[Query], &PanelError>> {
        self.0.get(&panel_id).map(|entry| entry.as_deref())
    }
}

/// The parts of a dashboard document the public pipeline relies on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardDocument {
    pub time: TimeRange,
    pub queries: PanelQueries,
}

// -- raw shapes -------------------------------------------------------------

#[derive(Deserialize)]
struct RawDocument {
    time: Option<RawTime>,
    panels: Option<Vec<RawPanel>>,
}

#[derive(Deserialize)]
struct RawTime {
    from: Option<String>,
    to: Option<String>,
}

#[derive(Deserialize)]
struct RawPanel {
    id: Option<PanelId>,
    datasource: Option<Value>,
    targets: Option<Vec<Map<String, Value>>>,
    /// Children of a collapsed row.
    panels: Option<Vec<RawPanel>>,
}

impl DashboardDocument {
    /// Parse the document section of a dashboard.
    ///
    /// - Row panels are flattened: children of collapsed rows are addressable
    ///   by their own ids.
    /// - A target without a `datasource` inherits the panel's datasource.
    /// - Panels without an `id` are not addressable and are skipped.
    /// - A panel with an unusable target, or whose id is repeated, is
    ///   recorded as a [`PanelError`] instead of failing the document.
    pub fn parse(data: &Value) -> Result<Self, DocumentError> {
        let raw: RawDocument = serde_json::from_value(data.clone())?;

        let time = raw
            .time
            .map(|t| {
                let defaults = TimeRange::default();
                TimeRange {
                    from: t.from.unwrap_or(defaults.from),
                    to: t.to.unwrap_or(defaults.to),
                }
            })
            .unwrap_or_default();

        let mut index = BTreeMap::new();
        collect_panels(raw.panels.unwrap_or_default(), &mut index);

        Ok(Self {
            time,
            queries: PanelQueries(index),
        })
    }
}

fn collect_panels(panels: Vec<RawPanel>, index: &mut PanelIndex) {
    for panel in panels {
        if let Some(panel_id) = panel.id {
            let queries = panel_targets(panel_id, panel.datasource.as_ref(), panel.targets);
            if let Err(e) = &queries {
                tracing::debug!(panel_id, error = %e, "Dashboard panel has unusable queries");
            }
            match index.entry(panel_id) {
                Entry::Vacant(slot) => {
                    slot.insert(queries);
                }
                Entry::Occupied(mut slot) => {
                    slot.insert(Err(PanelError::DuplicatePanel { panel_id }));
                }
            }
        }
        if let Some(children) = panel.panels {
            collect_panels(children, index);
        }
    }
}

fn panel_targets(
    panel_id: PanelId,
    panel_datasource: Option<&Value>,
    targets: Option<Vec<Map<String, Value>>>,
) -> Result<Vec<Query>, PanelError> {
    targets
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, mut model)| {
            let declared = model.get("datasource").filter(|v| !v.is_null()).cloned();
            let source = match declared {
                Some(value) => value,
                None => {
                    let inherited = panel_datasource.cloned().unwrap_or(Value::Null);
                    model.insert("datasource".to_string(), inherited.clone());
                    inherited
                }
            };
            let datasource = DatasourceRef::from_value(&source)
                .ok_or(PanelError::MissingDatasource { panel_id, index })?;
            if datasource.uid.contains(',') {
                return Err(PanelError::InvalidDatasourceUid {
                    panel_id,
                    uid: datasource.uid,
                });
            }
            let ref_id = model.get("refId").and_then(Value::as_str).map(str::to_owned);
            Ok(Query {
                ref_id,
                datasource,
                model,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// A dashboard as read from storage, with its document already parsed.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub uid: String,
    pub org_id: OrgId,
    pub title: String,
    pub data: Value,
    document: DashboardDocument,
}

impl Dashboard {
    pub fn new(
        uid: impl Into<String>,
        org_id: OrgId,
        title: impl Into<String>,
        data: Value,
    ) -> Result<Self, DocumentError> {
        let document = DashboardDocument::parse(&data)?;
        Ok(Self {
            uid: uid.into(),
            org_id,
            title: title.into(),
            data,
            document,
        })
    }

    pub fn document(&self) -> &DashboardDocument {
        &self.document
    }

    /// Rewrite the document's `time.from` / `time.to` with `window`.
    pub fn with_time_window(mut self, window: &EffectiveTimeWindow) -> Self {
        if let Value::Object(root) = &mut self.data {
            let time = root
                .entry("time")
                .or_insert_with(|| Value::Object(Map::new()));
            if !time.is_object() {
                *time = Value::Object(Map::new());
            }
            if let Value::Object(t) = time {
                t.insert("from".to_string(), Value::String(window.from.clone()));
                t.insert("to".to_string(), Value::String(window.to.clone()));
            }
        }
        self.document.time = TimeRange {
            from: window.from.clone(),
            to: window.to.clone(),
        };
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
