// crates/wiki-validation-core/src/target.rs
// ============================================================================
// Module: Fetch Targets
// Description: Closed set of page targets and their URL resolution.
// Purpose: Map URL paths and document references onto request URLs.
// Dependencies: url, wiki-validation-config
// ============================================================================

//! ## Overview
//! A [`Target`] is either a URL path taken from configuration or a document
//! reference taken from an archive. Resolution to a concrete [`Url`] happens at
//! request time against a [`ServerEndpoint`].
//! Invariants:
//! - Absolute `http://`/`https://` paths resolve unchanged.
//! - Other paths are appended verbatim to the base address.
//! - Document targets resolve to `<base><view route>/<space>/<page>` with both
//!   trailing segments percent-encoded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;
use url::Url;
use wiki_validation_config::ServerConfig;

use crate::reference::DocumentReference;

// ============================================================================
// SECTION: Server Endpoint
// ============================================================================

/// Base address and view route of the wiki under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    /// Base address without trailing slash.
    base_address: String,
    /// View route without trailing slash.
    view_path: String,
}

impl ServerEndpoint {
    /// Creates an endpoint, trimming trailing slashes from both parts.
    #[must_use]
    pub fn new(base_address: &str, view_path: &str) -> Self {
        Self {
            base_address: base_address.trim_end_matches('/').to_string(),
            view_path: view_path.trim_end_matches('/').to_string(),
        }
    }

    /// Creates an endpoint from validated server configuration.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.base_address(), &config.view_path)
    }

    /// Returns the base address.
    #[must_use]
    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    /// Returns the view route.
    #[must_use]
    pub fn view_path(&self) -> &str {
        &self.view_path
    }
}

// ============================================================================
// SECTION: Target
// ============================================================================

/// Page fetched and validated by a single test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Absolute URL or server-relative path.
    UrlPath(String),
    /// Document from the wiki archive.
    Document(DocumentReference),
}

impl Target {
    /// Creates a URL path target.
    #[must_use]
    pub fn url_path(path: impl Into<String>) -> Self {
        Self::UrlPath(path.into())
    }

    /// Creates a document target.
    #[must_use]
    pub const fn document(reference: DocumentReference) -> Self {
        Self::Document(reference)
    }

    /// Resolves the target into the request URL.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::InvalidUrl`] when the resolved text is not a URL.
    pub fn resolve(&self, endpoint: &ServerEndpoint) -> Result<Url, TargetError> {
        match self {
            Self::UrlPath(path) => {
                if has_absolute_scheme(path) {
                    parse_url(path)
                } else {
                    parse_url(&format!("{}{path}", endpoint.base_address()))
                }
            }
            Self::Document(reference) => {
                let view = format!("{}{}", endpoint.base_address(), endpoint.view_path());
                let mut url = parse_url(&view)?;
                {
                    let mut segments = url.path_segments_mut().map_err(|()| {
                        TargetError::InvalidUrl {
                            input: view.clone(),
                            reason: "url cannot carry path segments".to_string(),
                        }
                    })?;
                    segments.pop_if_empty().push(reference.last_space()).push(reference.name());
                }
                Ok(url)
            }
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UrlPath(path) => f.write_str(path),
            Self::Document(reference) => write!(f, "{reference}"),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while resolving targets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    /// Resolved text is not a valid URL.
    #[error("invalid target url {input}: {reason}")]
    InvalidUrl {
        /// Text that failed to parse.
        input: String,
        /// Parser diagnostic.
        reason: String,
    },
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when the path already names an absolute http(s) URL.
fn has_absolute_scheme(path: &str) -> bool {
    ["http://", "https://"].iter().any(|prefix| {
        path.get(..prefix.len()).is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Parses a URL, keeping the input for diagnostics.
fn parse_url(input: &str) -> Result<Url, TargetError> {
    Url::parse(input).map_err(|err| TargetError::InvalidUrl {
        input: input.to_string(),
        reason: err.to_string(),
    })
}
