//! Per-request anonymous identity scoped to the datasources a panel queries.
//!
//! The identity grants `datasources:query` and `datasources:read` on one
//! combined scope (`datasources:uid:<uid>,<uid>,...`) inside one org. The
//! downstream check evaluates datasource access as membership in that scope.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::dashboard::Query;
use crate::error::CoreError;
use crate::types::OrgId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const ACTION_DATASOURCES_QUERY: &str = "datasources:query";
pub const ACTION_DATASOURCES_READ: &str = "datasources:read";

/// Prefix of a datasource-uid scope; the remainder is a comma-joined uid list.
pub const DATASOURCE_UID_SCOPE_PREFIX: &str = "datasources:uid:";

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A throwaway principal built for exactly one public request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedIdentity {
    pub org_id: OrgId,
    /// Action name -> granted scopes.
    pub permissions: BTreeMap<String, Vec<String>>,
}

impl ScopedIdentity {
    /// Whether `action` is granted on the datasource `datasource_uid`.
    pub fn can(&self, action: &str, datasource_uid: &str) -> bool {
        self.permissions
            .get(action)
            .is_some_and(|scopes| scopes.iter().any(|s| scope_covers(s, datasource_uid)))
    }

    /// Fail if any query targets a datasource outside the granted scope.
    pub fn ensure_can_query(&self, queries: &[Query]) -> Result<(), CoreError> {
        match queries
            .iter()
            .find(|q| !self.can(ACTION_DATASOURCES_QUERY, &q.datasource.uid))
        {
            Some(q) => Err(CoreError::DatasourceNotPermitted {
                datasource_uid: q.datasource.uid.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn scope_covers(scope: &str, datasource_uid: &str) -> bool {
    scope
        .strip_prefix(DATASOURCE_UID_SCOPE_PREFIX)
        .is_some_and(|list| list.split(',').any(|uid| uid == datasource_uid))
}

/// Build the identity for `queries` in `org_id`.
///
/// Uids are deduplicated and sorted so the same query set always yields the
/// same scope string. No queries means no permissions.
pub fn synthesize_identity(org_id: OrgId, queries: &[Query]) -> ScopedIdentity {
    let uids: BTreeSet<&str> = queries.iter().map(|q| q.datasource.uid.as_str()).collect();

    let mut permissions = BTreeMap::new();
    if !uids.is_empty() {
        let scope = format!(
            "{DATASOURCE_UID_SCOPE_PREFIX}{}",
            uids.into_iter().collect::<Vec<_>>().join(",")
        );
        for action in [ACTION_DATASOURCES_QUERY, ACTION_DATASOURCES_READ] {
            permissions.insert(action.to_string(), vec![scope.clone()]);
        }
    }

    ScopedIdentity {
        org_id,
        permissions,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
