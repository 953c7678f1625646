//! Public sharing configuration entity and save DTOs.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::{DbId, OrgId, Timestamp};

/// Time override stored on a share. When present it replaces the dashboard's
/// own time range for every public query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSettings {
    pub from: String,
    pub to: String,
}

impl TimeSettings {
    /// Decode the stored JSON column. `NULL` and `{}` both mean "no
    /// override"; anything else must be a complete range.
    pub fn from_stored(value: Option<Value>) -> Result<Option<Self>, serde_json::Error> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) if map.is_empty() => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some),
        }
    }

    pub fn to_stored(&self) -> Value {
        json!({ "from": self.from, "to": self.to })
    }
}

/// One dashboard's public-exposure settings.
///
/// `access_token` is assigned once at creation and never rewritten;
/// `dashboard_uid` and `org_id` are fixed for the lifetime of the share.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicDashboardConfig {
    pub uid: String,
    pub dashboard_uid: String,
    pub org_id: OrgId,
    pub is_enabled: bool,
    pub time_settings: Option<TimeSettings>,
    pub access_token: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_by: Option<DbId>,
    pub updated_at: Option<Timestamp>,
}

/// Config fields a caller may submit.
///
/// `uid` selects create (absent) or update (present). `access_token` is
/// accepted so round-tripped payloads deserialize, but it is never used.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicDashboardInput {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub time_settings: Option<TimeSettings>,
}

/// A save request. `dashboard_uid`, `org_id` and `user_id` come from the
/// authenticated boundary, not the request body.
#[derive(Debug, Clone)]
pub struct SavePublicDashboardConfig {
    pub dashboard_uid: String,
    pub org_id: OrgId,
    pub user_id: DbId,
    pub config: PublicDashboardInput,
}

/// The only mutation storage is ever asked to apply to an existing share.
///
/// `uid`, `org_id` and `dashboard_uid` select the row; there is no field for
/// the access token.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicDashboardUpdate {
    pub uid: String,
    pub org_id: OrgId,
    pub dashboard_uid: String,
    pub is_enabled: bool,
    pub time_settings: Option<TimeSettings>,
    pub updated_by: DbId,
    pub updated_at: Timestamp,
}
