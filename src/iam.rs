//! Permission catalog retrieval against the IAM `roles.list` endpoint.
//!
//! One authorized GET per fetch, no retries, no pagination. The fetcher is
//! handed its credential provider at construction so tests can substitute a
//! fixed token without touching process environment state.

use crate::auth::{AuthError, CLOUD_PLATFORM_SCOPE, CredentialProvider};
use crate::catalog::{PermissionCatalog, parse_role_listing};
use crate::join_path_segments;
use thiserror::Error;
use url::Url;

/// Production IAM service root.
pub const DEFAULT_IAM_ENDPOINT: &str = "https://iam.googleapis.com";

const ROLES_SEGMENTS: &[&str] = &["v1", "roles"];

/// Failures of the remote listing call itself, after authentication.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("role listing returned HTTP {status}")]
    Status { status: u16 },
    #[error("role listing transport failure: {0}")]
    Transport(String),
    #[error("role listing response is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("role listing response has no roles field")]
    MissingRoles,
    #[error("IAM endpoint {0} cannot carry path segments")]
    BadEndpoint(Url),
}

/// Everything `fetch_all` can fail with.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Fetches the full role catalog in one call.
pub struct PermissionCatalogFetcher {
    agent: ureq::Agent,
    endpoint: Url,
    credentials: Box<dyn CredentialProvider>,
}

impl PermissionCatalogFetcher {
    pub fn new(
        endpoint: Url,
        agent: ureq::Agent,
        credentials: Box<dyn CredentialProvider>,
    ) -> Self {
        Self {
            agent,
            endpoint,
            credentials,
        }
    }

    /// Retrieve every role with its included permissions.
    ///
    /// `view=FULL` is always requested; without it the service omits
    /// `includedPermissions` entirely. A response with no `roles` field is
    /// an error, while a present-but-empty listing is an empty catalog.
    /// When the response carries a continuation token the catalog is
    /// incomplete; that is logged, not followed.
    pub fn fetch_all(&self) -> Result<PermissionCatalog, FetchError> {
        let token = self.credentials.access_token(CLOUD_PLATFORM_SCOPE)?;
        let url = join_path_segments(&self.endpoint, ROLES_SEGMENTS)
            .ok_or_else(|| RemoteError::BadEndpoint(self.endpoint.clone()))?;

        let response = self
            .agent
            .get(url.as_str())
            .query("view", "FULL")
            .set("Authorization", &format!("Bearer {}", token.secret()))
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(status, _) => RemoteError::Status { status },
                ureq::Error::Transport(transport) => {
                    RemoteError::Transport(transport.to_string())
                }
            })?;
        let body = response
            .into_string()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;

        let listing = parse_role_listing(&body).map_err(RemoteError::Malformed)?;
        if let Some(page_token) = &listing.next_page_token {
            log::warn!(
                "role listing is truncated (continuation token {page_token}); \
                 the catalog will be incomplete"
            );
        }
        let records = listing.roles.ok_or(RemoteError::MissingRoles)?;
        Ok(PermissionCatalog::from_records(records))
    }
}
