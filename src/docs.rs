//! Terraform registry documentation probe.
//!
//! Builds the documentation URL for a named resource and checks the page
//! for reachability with a single unauthenticated GET. Only the response
//! status matters; the body is never read. The URL is derived
//! deterministically from the base, so callers can report it even when the
//! probe says the page does not exist.

use crate::join_path_segments;
use thiserror::Error;
use url::Url;

/// Resource documentation root for the hashicorp/google provider.
pub const DEFAULT_DOCS_BASE: &str =
    "https://registry.terraform.io/providers/hashicorp/google/latest/docs/resources";

/// Outcome of one documentation probe.
///
/// Transport failures get their own variant instead of collapsing into
/// `NotFound`, so operators can tell a missing page from an unreachable
/// registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocLookup {
    /// The page answered 2xx; the URL is confirmed live.
    Found(Url),
    /// The host answered with a non-success status.
    NotFound { status: u16 },
    /// The request never completed (DNS, refused, timeout).
    Unreachable { reason: String },
}

#[derive(Debug, Error)]
pub enum DocError {
    #[error("resource name must not be empty")]
    EmptyResourceName,
    #[error("documentation base URL cannot carry path segments: {0}")]
    BaseNotHierarchical(Url),
}

/// Locator for resource documentation pages.
pub struct DocLocator {
    base: Url,
    agent: ureq::Agent,
}

impl DocLocator {
    /// Create a locator over `base`, which must be a hierarchical URL.
    pub fn new(base: Url, agent: ureq::Agent) -> Result<Self, DocError> {
        if base.cannot_be_a_base() {
            return Err(DocError::BaseNotHierarchical(base));
        }
        Ok(Self { base, agent })
    }

    /// Documentation URL for a resource: `<base>/<name>.html`.
    ///
    /// The name lands in the URL as exactly one percent-escaped path
    /// segment, so reserved characters cannot splice extra segments into
    /// the path.
    pub fn doc_url(&self, resource_name: &str) -> Result<Url, DocError> {
        let name = resource_name.trim();
        if name.is_empty() {
            return Err(DocError::EmptyResourceName);
        }
        join_path_segments(&self.base, &[&format!("{name}.html")])
            .ok_or_else(|| DocError::BaseNotHierarchical(self.base.clone()))
    }

    /// Probe the documentation page for a resource.
    ///
    /// Issues exactly one GET with no retries. All three outcomes are
    /// successful probes from the caller's perspective; `Err` is reserved
    /// for caller mistakes (an empty name).
    pub fn locate(&self, resource_name: &str) -> Result<DocLookup, DocError> {
        let url = self.doc_url(resource_name)?;
        match self.agent.get(url.as_str()).call() {
            Ok(_) => Ok(DocLookup::Found(url)),
            Err(ureq::Error::Status(status, _)) => Ok(DocLookup::NotFound { status }),
            Err(ureq::Error::Transport(transport)) => Ok(DocLookup::Unreachable {
                reason: transport.to_string(),
            }),
        }
    }
}
