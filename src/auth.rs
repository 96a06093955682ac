//! Ambient credential discovery for the IAM API.
//!
//! The fetcher never touches the environment itself; it is handed a
//! `CredentialProvider` at construction. The production provider walks the
//! same ambient sources gcloud-based tooling uses: an explicit token in the
//! environment, the `gcloud` CLI, then the GCE metadata server. The first
//! source that yields a token wins; a source that is absent or misbehaving
//! falls through to the next with a debug-level note.

use crate::join_path_segments;
use crate::runtime::find_on_path;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::process::Command;
use thiserror::Error;
use url::Url;

/// The single OAuth scope every token is requested for.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Environment variable carrying an explicit access token. The Terraform
/// Google provider honors the same variable.
pub const ENV_TOKEN_VAR: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Metadata server root used when no override is supplied.
pub const DEFAULT_METADATA_ENDPOINT: &str = "http://metadata.google.internal/computeMetadata/v1";

const METADATA_TOKEN_SEGMENTS: &[&str] = &["instance", "service-accounts", "default", "token"];

/// Bearer token issued by an ambient source.
///
/// The secret never appears in `Debug` output; only the transport layer
/// reads it, via `secret()`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{ENV_TOKEN_VAR} is not set")]
    EnvTokenUnset,
    #[error("no gcloud executable on PATH")]
    GcloudNotFound,
    #[error("gcloud auth print-access-token failed: {0}")]
    GcloudFailed(String),
    #[error("metadata server token request failed: {0}")]
    MetadataUnavailable(String),
    #[error("metadata server returned an unusable token response: {0}")]
    MetadataMalformed(String),
    #[error(
        "no ambient credential source yielded a token \
         (tried {ENV_TOKEN_VAR}, gcloud, metadata server)"
    )]
    NoAmbientSource,
}

/// Capability handed to the catalog fetcher at construction.
///
/// Tests substitute `StaticToken`; production wiring uses
/// `AmbientCredentials`.
pub trait CredentialProvider {
    fn access_token(&self, scope: &str) -> Result<AccessToken, AuthError>;
}

/// Provider that always returns one fixed token. Backs `role-dump --token`
/// and the test suite.
pub struct StaticToken(AccessToken);

impl StaticToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(AccessToken::new(secret))
    }
}

impl CredentialProvider for StaticToken {
    fn access_token(&self, _scope: &str) -> Result<AccessToken, AuthError> {
        Ok(self.0.clone())
    }
}

/// Ambient source chain: environment token, gcloud, metadata server.
pub struct AmbientCredentials {
    agent: ureq::Agent,
    metadata_endpoint: Url,
}

impl AmbientCredentials {
    /// The metadata endpoint is taken explicitly; binaries resolve it with
    /// `resolve_metadata_endpoint`, tests point it at a mock server.
    pub fn new(agent: ureq::Agent, metadata_endpoint: Url) -> Self {
        Self {
            agent,
            metadata_endpoint,
        }
    }

    fn from_env() -> Result<AccessToken, AuthError> {
        let raw = env::var(ENV_TOKEN_VAR).map_err(|_| AuthError::EnvTokenUnset)?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AuthError::EnvTokenUnset);
        }
        Ok(AccessToken::new(trimmed))
    }

    fn from_gcloud() -> Result<AccessToken, AuthError> {
        let gcloud = find_on_path("gcloud").ok_or(AuthError::GcloudNotFound)?;
        let output = Command::new(&gcloud)
            .args(["auth", "print-access-token"])
            .output()
            .map_err(|err| AuthError::GcloudFailed(err.to_string()))?;
        if !output.status.success() {
            return Err(AuthError::GcloudFailed(format!(
                "exit status {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(AuthError::GcloudFailed(
                "printed an empty token".to_string(),
            ));
        }
        Ok(AccessToken::new(token))
    }

    fn from_metadata(&self, scope: &str) -> Result<AccessToken, AuthError> {
        let url = join_path_segments(&self.metadata_endpoint, METADATA_TOKEN_SEGMENTS)
            .ok_or_else(|| {
                AuthError::MetadataUnavailable(format!(
                    "endpoint {} cannot carry path segments",
                    self.metadata_endpoint
                ))
            })?;
        let response = self
            .agent
            .get(url.as_str())
            .query("scopes", scope)
            .set("Metadata-Flavor", "Google")
            .call()
            .map_err(|err| AuthError::MetadataUnavailable(err.to_string()))?;
        let body = response
            .into_string()
            .map_err(|err| AuthError::MetadataUnavailable(err.to_string()))?;
        let token: MetadataToken = serde_json::from_str(&body)
            .map_err(|err| AuthError::MetadataMalformed(err.to_string()))?;
        if token.access_token.is_empty() {
            return Err(AuthError::MetadataMalformed(
                "empty access_token field".to_string(),
            ));
        }
        Ok(AccessToken::new(token.access_token))
    }
}

impl CredentialProvider for AmbientCredentials {
    fn access_token(&self, scope: &str) -> Result<AccessToken, AuthError> {
        match Self::from_env() {
            Ok(token) => return Ok(token),
            Err(err) => log::debug!("env credential source unavailable: {err}"),
        }
        match Self::from_gcloud() {
            Ok(token) => return Ok(token),
            Err(err) => log::debug!("gcloud credential source unavailable: {err}"),
        }
        match self.from_metadata(scope) {
            Ok(token) => return Ok(token),
            Err(err) => log::debug!("metadata credential source unavailable: {err}"),
        }
        Err(AuthError::NoAmbientSource)
    }
}

/// Token document served by the metadata endpoint.
#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_agent;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn ambient(server: &MockServer) -> AmbientCredentials {
        AmbientCredentials::new(
            http_agent(Duration::from_secs(1)),
            Url::parse(&server.base_url()).unwrap(),
        )
    }

    #[test]
    fn debug_output_redacts_the_secret() {
        let token = AccessToken::new("ya29.very-secret");
        assert_eq!(format!("{token:?}"), "AccessToken(..)");
    }

    #[test]
    fn static_provider_returns_its_token() {
        let provider = StaticToken::new("fixed");
        let token = provider.access_token(CLOUD_PLATFORM_SCOPE).unwrap();
        assert_eq!(token.secret(), "fixed");
    }

    #[test]
    fn metadata_source_parses_token_and_sends_flavor_header() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/instance/service-accounts/default/token")
                .header("Metadata-Flavor", "Google")
                .query_param("scopes", CLOUD_PLATFORM_SCOPE);
            then.status(200).json_body(serde_json::json!({
                "access_token": "ya29.metadata",
                "expires_in": 3599,
                "token_type": "Bearer"
            }));
        });

        let token = ambient(&server)
            .from_metadata(CLOUD_PLATFORM_SCOPE)
            .unwrap();
        mock.assert();
        assert_eq!(token.secret(), "ya29.metadata");
    }

    #[test]
    fn metadata_error_status_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/instance/service-accounts/default/token");
            then.status(403);
        });

        let err = ambient(&server)
            .from_metadata(CLOUD_PLATFORM_SCOPE)
            .unwrap_err();
        assert!(matches!(err, AuthError::MetadataUnavailable(_)));
    }

    #[test]
    fn metadata_garbage_body_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/instance/service-accounts/default/token");
            then.status(200).body("not json");
        });

        let err = ambient(&server)
            .from_metadata(CLOUD_PLATFORM_SCOPE)
            .unwrap_err();
        assert!(matches!(err, AuthError::MetadataMalformed(_)));
    }
}
