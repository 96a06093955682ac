//! Presentation layer for the two operations.
//!
//! Retrieval returns structured results; these formatters turn them into
//! the human-readable listing and the `--json` run summary. Keeping them
//! pure lets the suite assert on output without capturing stdout.

use crate::catalog::PermissionCatalog;
use crate::docs::DocLookup;
use crate::iam::FetchError;
use serde_json::{Value, json};
use std::fmt::Write;

/// Human-readable block for a documentation probe.
pub fn render_doc_lookup(resource_name: &str, lookup: &DocLookup) -> String {
    match lookup {
        DocLookup::Found(url) => {
            format!("Terraform documentation for {resource_name}:\n{url}\n")
        }
        DocLookup::NotFound { status } => {
            format!("No Terraform documentation found for {resource_name} (HTTP {status}).\n")
        }
        DocLookup::Unreachable { reason } => {
            format!("Documentation host unreachable for {resource_name}: {reason}\n")
        }
    }
}

/// Human-readable role → permissions listing.
pub fn render_catalog(catalog: &PermissionCatalog) -> String {
    if catalog.is_empty() {
        return "The IAM role catalog is empty.\n".to_string();
    }
    let mut out = String::new();
    for (role, permissions) in catalog.iter() {
        let _ = writeln!(out, "Role: {role}");
        for permission in permissions {
            let _ = writeln!(out, "  - {permission}");
        }
    }
    out
}

/// Machine-readable run summary for `--json`.
///
/// The exit code stays permissive, so scripts read per-operation status
/// from here instead.
pub fn render_summary(
    resource_name: &str,
    lookup: &DocLookup,
    catalog: &Result<PermissionCatalog, FetchError>,
) -> Value {
    let documentation = match lookup {
        DocLookup::Found(url) => json!({ "status": "found", "url": url.as_str() }),
        DocLookup::NotFound { status } => {
            json!({ "status": "not_found", "http_status": status })
        }
        DocLookup::Unreachable { reason } => {
            json!({ "status": "unreachable", "reason": reason })
        }
    };
    let catalog = match catalog {
        Ok(catalog) => json!({ "status": "ok", "roles": catalog }),
        Err(FetchError::Auth(err)) => {
            json!({ "status": "error", "kind": "auth", "message": err.to_string() })
        }
        Err(FetchError::Remote(err)) => {
            json!({ "status": "error", "kind": "remote", "message": err.to_string() })
        }
    };
    json!({
        "resource": resource_name,
        "documentation": documentation,
        "catalog": catalog,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_role_listing;
    use url::Url;

    fn sample_catalog() -> PermissionCatalog {
        let listing = parse_role_listing(
            r#"{"roles":[
                {"name":"roles/viewer","includedPermissions":["a.get","a.list"]},
                {"name":"roles/editor"}
            ]}"#,
        )
        .unwrap();
        PermissionCatalog::from_records(listing.roles.unwrap())
    }

    #[test]
    fn catalog_listing_uses_role_and_dash_lines() {
        let rendered = render_catalog(&sample_catalog());
        assert_eq!(
            rendered,
            "Role: roles/viewer\n  - a.get\n  - a.list\nRole: roles/editor\n"
        );
    }

    #[test]
    fn empty_catalog_renders_a_single_line() {
        let rendered = render_catalog(&PermissionCatalog::default());
        assert_eq!(rendered, "The IAM role catalog is empty.\n");
    }

    #[test]
    fn found_lookup_prints_the_url() {
        let url = Url::parse("https://example.test/docs/google_storage_bucket.html").unwrap();
        let rendered = render_doc_lookup("google_storage_bucket", &DocLookup::Found(url));
        assert!(rendered.contains("google_storage_bucket.html"));
        assert!(rendered.starts_with("Terraform documentation for google_storage_bucket"));
    }

    #[test]
    fn summary_carries_per_operation_status() {
        let lookup = DocLookup::NotFound { status: 404 };
        let summary = render_summary("google_thing", &lookup, &Ok(sample_catalog()));
        assert_eq!(summary["resource"], "google_thing");
        assert_eq!(summary["documentation"]["status"], "not_found");
        assert_eq!(summary["documentation"]["http_status"], 404);
        assert_eq!(summary["catalog"]["status"], "ok");
        assert_eq!(
            summary["catalog"]["roles"]["roles/viewer"][0],
            "a.get"
        );
    }
}
