// crates/wiki-validation-core/src/client.rs
// ============================================================================
// Module: Page Client
// Description: Blocking HTTP client fetching wiki pages for validation.
// Purpose: Execute authenticated GET requests and return raw page bodies.
// Dependencies: hyper, reqwest, url, wiki-validation-config
// ============================================================================

//! ## Overview
//! [`PageClient`] resolves a [`Target`] against the configured server and
//! issues a single GET request. The administrator client sends HTTP Basic
//! credentials on every request; the guest client sends none.
//! Invariants:
//! - Redirects are followed up to the configured limit.
//! - Only status 200 yields a body; other statuses fail with the status line,
//!   keeping the reason phrase the server actually sent.
//! - Response bodies are capped at the configured size.
//! - No retries; the response is released when the fetch returns.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::io::Read;
use std::time::Duration;

use hyper::ext::ReasonPhrase;
use reqwest::StatusCode;
use reqwest::Version;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use serde::Serialize;
use thiserror::Error;
use wiki_validation_config::HttpConfig;
use wiki_validation_config::ValidationConfig;

use crate::target::ServerEndpoint;
use crate::target::Target;
use crate::target::TargetError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors returned by page fetches.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Target could not be resolved into a URL.
    #[error("invalid target: {0}")]
    Target(#[from] TargetError),
    /// HTTP client could not be constructed.
    #[error("http client build failed: {0}")]
    ClientBuild(String),
    /// Request or body transfer failed.
    #[error("http request failed: {0}")]
    Http(String),
    /// Server answered with a status other than 200.
    #[error("Method failed: {status_line} expected:<200> but was:<{status}>")]
    UnexpectedStatus {
        /// Status line, for example `HTTP/1.1 404 Not Found`.
        status_line: String,
        /// Numeric status code.
        status: u16,
    },
    /// Response body exceeded the configured cap.
    #[error("response exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Observed size in bytes.
        actual_bytes: usize,
    },
}

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// Which identity a client fetches pages as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientRole {
    /// Authenticated administrator.
    Admin,
    /// Anonymous visitor.
    Guest,
}

impl ClientRole {
    /// Returns a stable label for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Guest => "guest",
        }
    }
}

/// HTTP Basic credential pair.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// User name.
    username: String,
    /// Password.
    password: String,
}

impl BasicCredentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the user name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// SECTION: Page Client
// ============================================================================

/// Blocking HTTP client bound to one server and one identity.
///
/// # Invariants
/// - `credentials` is set exactly when `role` is [`ClientRole::Admin`].
#[derive(Debug, Clone)]
pub struct PageClient {
    /// Underlying HTTP client.
    client: Client,
    /// Server the targets resolve against.
    endpoint: ServerEndpoint,
    /// Identity used for requests.
    role: ClientRole,
    /// Credentials sent with every request, if any.
    credentials: Option<BasicCredentials>,
    /// Maximum accepted body size in bytes.
    max_response_bytes: usize,
}

impl PageClient {
    /// Builds the administrator client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] when the HTTP client cannot be built.
    pub fn admin(config: &ValidationConfig) -> Result<Self, FetchError> {
        let credentials = BasicCredentials::new(
            config.server.admin.username.clone(),
            config.server.admin.password.clone(),
        );
        Self::new(ServerEndpoint::from_config(&config.server), &config.http, Some(credentials))
    }

    /// Builds the guest client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] when the HTTP client cannot be built.
    pub fn guest(config: &ValidationConfig) -> Result<Self, FetchError> {
        Self::new(ServerEndpoint::from_config(&config.server), &config.http, None)
    }

    /// Builds a client; credentials select the administrator role.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] when the HTTP client cannot be built.
    pub fn new(
        endpoint: ServerEndpoint,
        http: &HttpConfig,
        credentials: Option<BasicCredentials>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .redirect(Policy::limited(http.max_redirects))
            .timeout(Duration::from_millis(http.timeout_ms))
            .user_agent(http.user_agent.clone())
            .build()
            .map_err(|err| FetchError::ClientBuild(err.to_string()))?;
        let role = if credentials.is_some() { ClientRole::Admin } else { ClientRole::Guest };
        Ok(Self {
            client,
            endpoint,
            role,
            credentials,
            max_response_bytes: http.max_response_bytes,
        })
    }

    /// Returns the identity used by this client.
    #[must_use]
    pub const fn role(&self) -> ClientRole {
        self.role
    }

    /// Returns the server endpoint targets resolve against.
    #[must_use]
    pub const fn endpoint(&self) -> &ServerEndpoint {
        &self.endpoint
    }

    /// Fetches the target and returns the raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when resolution or transfer fails, when the
    /// status is not 200, or when the body exceeds the size cap.
    pub fn fetch(&self, target: &Target) -> Result<Vec<u8>, FetchError> {
        let url = target.resolve(&self.endpoint)?;
        let mut request = self.client.get(url.as_str());
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }
        let response = request.send().map_err(|err| FetchError::Http(err.to_string()))?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus {
                status_line: status_line(&response),
                status: status.as_u16(),
            });
        }
        read_body_limited(response, self.max_response_bytes)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the protocol label used in status lines.
fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_09 {
        "HTTP/0.9"
    } else if version == Version::HTTP_10 {
        "HTTP/1.0"
    } else if version == Version::HTTP_11 {
        "HTTP/1.1"
    } else if version == Version::HTTP_2 {
        "HTTP/2.0"
    } else if version == Version::HTTP_3 {
        "HTTP/3.0"
    } else {
        "HTTP"
    }
}

/// Rebuilds the response status line.
///
/// Non-standard reason phrases are kept by hyper as a response extension; the
/// canonical phrase is used otherwise, and no phrase when the code has none.
fn status_line(response: &Response) -> String {
    let status = response.status();
    let version = version_label(response.version());
    let reason = response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
        .or_else(|| status.canonical_reason().map(str::to_string));
    match reason {
        Some(reason) => format!("{version} {} {reason}", status.as_str()),
        None => format!("{version} {}", status.as_str()),
    }
}

/// Reads the response body while enforcing a byte limit.
fn read_body_limited(response: Response, max_bytes: usize) -> Result<Vec<u8>, FetchError> {
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| FetchError::Http("response size limit exceeds u64".to_string()))?;
    if let Some(length) = response.content_length()
        && length > max_bytes_u64
    {
        return Err(FetchError::TooLarge {
            max_bytes,
            actual_bytes: usize::try_from(length).unwrap_or(usize::MAX),
        });
    }
    let mut body = Vec::new();
    response
        .take(max_bytes_u64.saturating_add(1))
        .read_to_end(&mut body)
        .map_err(|err| FetchError::Http(err.to_string()))?;
    if body.len() > max_bytes {
        return Err(FetchError::TooLarge {
            max_bytes,
            actual_bytes: body.len(),
        });
    }
    Ok(body)
}
