//! Transformed view of a role listing: role name to included permissions.
//!
//! The catalog preserves the order roles arrived in, because the listing is
//! the only ordering authority this tool has. A repeated role name (the API
//! contract says it cannot happen, but nothing enforces that) overwrites
//! the earlier permission list in place: last write wins, first-insertion
//! position kept.

use crate::catalog::identity::{PermissionId, RoleId};
use crate::catalog::model::RoleRecord;
use indexmap::IndexMap;
use serde::Serialize;

/// Ordered mapping from role name to that role's included permissions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionCatalog {
    roles: IndexMap<RoleId, Vec<PermissionId>>,
}

impl PermissionCatalog {
    /// Build a catalog from wire records, in response order.
    ///
    /// Records without a `name` are skipped rather than failing the whole
    /// listing; partial data is more useful than none. Absent permission
    /// lists become empty ones.
    pub fn from_records(records: Vec<RoleRecord>) -> Self {
        let mut roles = IndexMap::new();
        for record in records {
            let Some(name) = record.name else {
                log::debug!("skipping role record without a name");
                continue;
            };
            let permissions = record.included_permissions.unwrap_or_default();
            roles.insert(name, permissions);
        }
        Self { roles }
    }

    /// Permissions for a role, if the listing contained it.
    pub fn permissions(&self, role: &RoleId) -> Option<&[PermissionId]> {
        self.roles.get(role).map(Vec::as_slice)
    }

    /// Iterate roles in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&RoleId, &[PermissionId])> {
        self.roles.iter().map(|(role, perms)| (role, perms.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
