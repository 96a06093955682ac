use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully-qualified role name as issued by the IAM service
/// (e.g., `roles/compute.viewer`).
///
/// Catalog entries are keyed by this name so consumers can resolve a role
/// back against the service without re-deriving identifiers.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub String);

/// Single permission identifier inside a role
/// (e.g., `compute.instances.get`).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(pub String);

impl RoleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PermissionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_id_round_trips() {
        let id = RoleId("roles/compute.viewer".to_string());
        let serialized = serde_json::to_string(&id).unwrap();
        assert_eq!(serialized, "\"roles/compute.viewer\"");
        let parsed: RoleId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn permission_id_round_trips() {
        let id = PermissionId("compute.instances.get".to_string());
        let serialized = serde_json::to_string(&id).unwrap();
        assert_eq!(serialized, "\"compute.instances.get\"");
        let parsed: PermissionId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, id);
    }
}
