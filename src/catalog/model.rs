//! Deserializable representation of the `roles.list` response body.
//!
//! The types mirror the wire document so the fetcher and tests can reason
//! about the listing without ad-hoc JSON handling. Every field the service
//! may omit is an `Option`, which keeps "field absent" and "field empty"
//! apart at the type level; `PermissionCatalog` consumes these records when
//! the transformed view is required.

use crate::catalog::identity::{PermissionId, RoleId};
use serde::Deserialize;

/// Top-level `roles.list` response.
///
/// `roles` is `None` when the service returned no such field at all, which
/// callers treat differently from an empty listing. `next_page_token` is
/// carried so truncated listings can be surfaced; no continuation request
/// is ever issued.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleListing {
    #[serde(default)]
    pub roles: Option<Vec<RoleRecord>>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// One role record as returned on the wire.
///
/// The service omits `includedPermissions` for roles without any and only
/// populates it at `view=FULL`; `name` is nominally always present but the
/// contract does not guarantee it, so records without one are skippable
/// rather than fatal.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    #[serde(default)]
    pub name: Option<RoleId>,
    #[serde(default)]
    pub included_permissions: Option<Vec<PermissionId>>,
}

/// Parse a `roles.list` response body without further validation.
pub fn parse_role_listing(body: &str) -> Result<RoleListing, serde_json::Error> {
    serde_json::from_str(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_roles_are_distinct() {
        let absent = parse_role_listing("{}").unwrap();
        assert!(absent.roles.is_none());

        let empty = parse_role_listing(r#"{"roles":[]}"#).unwrap();
        assert_eq!(empty.roles.as_deref(), Some(&[][..]));
    }

    #[test]
    fn record_fields_are_optional() {
        let listing = parse_role_listing(
            r#"{"roles":[{"name":"roles/viewer"},{"includedPermissions":["a.get"]}]}"#,
        )
        .unwrap();
        let records = listing.roles.unwrap();
        assert_eq!(records[0].name.as_ref().unwrap().as_str(), "roles/viewer");
        assert!(records[0].included_permissions.is_none());
        assert!(records[1].name.is_none());
        assert_eq!(
            records[1].included_permissions.as_ref().unwrap()[0].as_str(),
            "a.get"
        );
    }

    #[test]
    fn page_token_is_captured() {
        let listing =
            parse_role_listing(r#"{"roles":[],"nextPageToken":"abc123"}"#).unwrap();
        assert_eq!(listing.next_page_token.as_deref(), Some("abc123"));
    }
}
