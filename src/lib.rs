//! Shared library for the permscout CLI.
//!
//! The crate exposes the two independent operations the binaries compose:
//! documentation reachability probing (`docs`) and IAM permission catalog
//! retrieval (`auth`, `catalog`, `iam`). Public functions here form the
//! contract the binaries depend on: endpoint resolution with environment
//! overrides, HTTP agent construction, and URL assembly.

use anyhow::{Context, Result, bail};
use std::env;
use std::time::Duration;
use url::Url;

pub mod auth;
pub mod catalog;
pub mod docs;
pub mod iam;
pub mod report;
pub mod runtime;

pub use auth::{
    AccessToken, AmbientCredentials, AuthError, CLOUD_PLATFORM_SCOPE, CredentialProvider,
    StaticToken,
};
pub use catalog::{
    PermissionCatalog, PermissionId, RoleId, RoleListing, RoleRecord, parse_role_listing,
};
pub use docs::{DEFAULT_DOCS_BASE, DocError, DocLocator, DocLookup};
pub use iam::{DEFAULT_IAM_ENDPOINT, FetchError, PermissionCatalogFetcher, RemoteError};
pub use report::{render_catalog, render_doc_lookup, render_summary};

const DOCS_BASE_ENV: &str = "PERMSCOUT_DOCS_BASE";
const IAM_ENDPOINT_ENV: &str = "PERMSCOUT_IAM_ENDPOINT";
const METADATA_ENDPOINT_ENV: &str = "PERMSCOUT_METADATA_ENDPOINT";
const TIMEOUT_ENV: &str = "PERMSCOUT_TIMEOUT_SECS";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Reads an environment override, ignoring unset or blank values.
fn env_override(name: &str) -> Option<String> {
    let value = env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// Per-request timeout applied to every outbound call.
///
/// Neither remote service gets to block the CLI indefinitely. Defaults to
/// ten seconds; `PERMSCOUT_TIMEOUT_SECS` overrides it.
pub fn request_timeout() -> Duration {
    let secs = env_override(TIMEOUT_ENV)
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Blocking HTTP agent shared by both operations.
pub fn http_agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(timeout).build()
}

/// Resolve the documentation base URL.
///
/// Precedence matches the CLI contract: explicit flag, then
/// `PERMSCOUT_DOCS_BASE`, then the hashicorp/google registry default.
pub fn resolve_docs_base(cli_override: Option<&str>) -> Result<Url> {
    let raw = cli_override
        .map(str::to_string)
        .or_else(|| env_override(DOCS_BASE_ENV))
        .unwrap_or_else(|| DEFAULT_DOCS_BASE.to_string());
    parse_base_url(&raw)
}

/// Resolve the IAM endpoint root with the same precedence rules
/// (`PERMSCOUT_IAM_ENDPOINT`).
pub fn resolve_iam_endpoint(cli_override: Option<&str>) -> Result<Url> {
    let raw = cli_override
        .map(str::to_string)
        .or_else(|| env_override(IAM_ENDPOINT_ENV))
        .unwrap_or_else(|| DEFAULT_IAM_ENDPOINT.to_string());
    parse_base_url(&raw)
}

/// Resolve the metadata server root (`PERMSCOUT_METADATA_ENDPOINT`).
pub fn resolve_metadata_endpoint() -> Result<Url> {
    let raw = env_override(METADATA_ENDPOINT_ENV)
        .unwrap_or_else(|| auth::DEFAULT_METADATA_ENDPOINT.to_string());
    parse_base_url(&raw)
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("invalid base URL: {raw}"))?;
    if url.cannot_be_a_base() {
        bail!("base URL cannot carry path segments: {raw}");
    }
    Ok(url)
}

/// Append path segments to a base URL with standard percent-escaping.
///
/// A trailing empty segment on the base is dropped first so `…/docs/` and
/// `…/docs` produce the same result. Returns `None` for bases that cannot
/// carry segments (`mailto:` and friends), which the resolvers above
/// reject up front.
pub fn join_path_segments(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    {
        let mut parts = url.path_segments_mut().ok()?;
        parts.pop_if_empty();
        for segment in segments {
            parts.push(segment);
        }
    }
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_appends_escaped_segments() {
        let base = Url::parse("https://iam.googleapis.com").unwrap();
        let url = join_path_segments(&base, &["v1", "roles"]).unwrap();
        assert_eq!(url.as_str(), "https://iam.googleapis.com/v1/roles");
    }

    #[test]
    fn join_refuses_opaque_bases() {
        let base = Url::parse("mailto:ops@example.test").unwrap();
        assert!(join_path_segments(&base, &["v1"]).is_none());
    }

    #[test]
    fn base_urls_must_be_hierarchical() {
        assert!(parse_base_url("https://iam.googleapis.com").is_ok());
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("mailto:ops@example.test").is_err());
    }
}
