// crates/wiki-validation-config/src/config.rs
// ============================================================================
// Module: Wiki Validation Configuration
// Description: Configuration loading and validation for the page harness.
// Purpose: Provide strict config parsing from TOML files or property maps.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits,
//! or assembled from a flat property map using the historical property keys.
//! Missing URL lists or archive locations are reported as explicit
//! [`ConfigError::MissingProperty`] errors instead of surfacing later as empty
//! iterations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::filter::DocumentFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "wiki-validation.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "WIKI_VALIDATION_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

/// Default server base address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
/// Default route under which documents are viewed.
pub const DEFAULT_VIEW_PATH: &str = "/xwiki/bin/view";
/// Wiki identifier prefixed to archive document names.
pub const DEFAULT_WIKI: &str = "xwiki";
/// Default administrator user name.
pub const DEFAULT_ADMIN_USERNAME: &str = "Admin";
/// Default administrator password.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";
/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Default maximum number of redirects followed per request.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
/// Default maximum response body size in bytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;
/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = "wiki-validation/0.1";

/// Property holding whitespace-separated URLs fetched as the administrator.
pub const ADMIN_URLS_PROPERTY: &str = "urlsToTestAsAdmin";
/// Property holding whitespace-separated URLs fetched as a guest.
pub const GUEST_URLS_PROPERTY: &str = "urlsToTestAsGuest";
/// Property holding the local artifact repository root.
pub const LOCAL_REPOSITORY_PROPERTY: &str = "localRepository";
/// Property holding the archive path relative to the local repository.
pub const ARCHIVE_RELATIVE_PATH_PROPERTY: &str = "pathToXWikiXar";
/// Property holding a complete archive path (takes precedence).
pub const ARCHIVE_PATH_PROPERTY: &str = "archivePath";
/// Property holding the optional document inclusion pattern.
pub const DOCUMENTS_PATTERN_PROPERTY: &str = "documentsToTest";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Page validation harness configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Target server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// HTTP client limits.
    #[serde(default)]
    pub http: HttpConfig,
    /// Test target sources.
    pub targets: TargetsConfig,
}

impl ValidationConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Builds configuration from a flat property map.
    ///
    /// Server and HTTP settings take their defaults; the URL lists and the
    /// archive location must be present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingProperty`] when a required key is absent
    /// and [`ConfigError::Invalid`] when validation fails.
    pub fn from_properties(properties: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let admin_urls = required_property(properties, ADMIN_URLS_PROPERTY)?;
        let guest_urls = required_property(properties, GUEST_URLS_PROPERTY)?;
        let archive_path = archive_path_from_properties(properties)?.ok_or_else(|| {
            ConfigError::MissingProperty(ARCHIVE_RELATIVE_PATH_PROPERTY.to_string())
        })?;
        let config = Self {
            server: ServerConfig::default(),
            http: HttpConfig::default(),
            targets: TargetsConfig {
                admin_urls,
                guest_urls,
                archive_path,
                documents_pattern: pattern_from_properties(properties),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Overlays target settings found in a property map.
    ///
    /// Only keys present in `properties` replace the loaded values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the merged configuration is invalid.
    pub fn apply_properties(
        &mut self,
        properties: &BTreeMap<String, String>,
    ) -> Result<(), ConfigError> {
        if let Some(admin_urls) = properties.get(ADMIN_URLS_PROPERTY) {
            self.targets.admin_urls.clone_from(admin_urls);
        }
        if let Some(guest_urls) = properties.get(GUEST_URLS_PROPERTY) {
            self.targets.guest_urls.clone_from(guest_urls);
        }
        if let Some(archive_path) = archive_path_from_properties(properties)? {
            self.targets.archive_path = archive_path;
        }
        if properties.contains_key(DOCUMENTS_PATTERN_PROPERTY) {
            self.targets.documents_pattern = pattern_from_properties(properties);
        }
        self.validate()
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.http.validate()?;
        self.targets.validate()
    }
}

/// Target server configuration.
///
/// # Invariants
/// - `base_url` is an absolute `http` or `https` URL.
/// - `view_path` starts with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Base address prefixed to server-relative paths.
    pub base_url: String,
    /// Route under which document view pages are served.
    pub view_path: String,
    /// Wiki identifier used for archive documents.
    pub default_wiki: String,
    /// Credentials sent by the administrator client.
    pub admin: AdminCredentials,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            view_path: DEFAULT_VIEW_PATH.to_string(),
            default_wiki: DEFAULT_WIKI.to_string(),
            admin: AdminCredentials::default(),
        }
    }
}

impl ServerConfig {
    /// Returns the base address without a trailing slash.
    #[must_use]
    pub fn base_address(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validates server settings.
    fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|err| ConfigError::Invalid(format!("server.base_url is invalid: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(
                "server.base_url must use http or https".to_string(),
            ));
        }
        if url.host_str().is_none() {
            return Err(ConfigError::Invalid("server.base_url requires a host".to_string()));
        }
        if !self.view_path.starts_with('/') {
            return Err(ConfigError::Invalid("server.view_path must start with '/'".to_string()));
        }
        if self.default_wiki.trim().is_empty() {
            return Err(ConfigError::Invalid("server.default_wiki must be set".to_string()));
        }
        if self.admin.username.trim().is_empty() {
            return Err(ConfigError::Invalid("server.admin.username must be set".to_string()));
        }
        Ok(())
    }
}

/// HTTP Basic credentials for the administrator client.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdminCredentials {
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// HTTP client limits.
///
/// # Invariants
/// - `timeout_ms` and `max_response_bytes` are greater than zero.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum redirects followed per request.
    pub max_redirects: usize,
    /// Maximum response body size in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    /// Validates HTTP limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("http.timeout_ms must be greater than zero".to_string()));
        }
        if self.max_response_bytes == 0 {
            return Err(ConfigError::Invalid(
                "http.max_response_bytes must be greater than zero".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("http.user_agent must be set".to_string()));
        }
        Ok(())
    }
}

/// Sources of test targets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetsConfig {
    /// Whitespace-separated URLs fetched with administrator credentials.
    pub admin_urls: String,
    /// Whitespace-separated URLs fetched without credentials.
    pub guest_urls: String,
    /// Path to the wiki archive whose documents are validated.
    pub archive_path: PathBuf,
    /// Optional whole-name pattern selecting archive documents.
    #[serde(default)]
    pub documents_pattern: Option<String>,
}

impl TargetsConfig {
    /// Returns the administrator URL list in configured order.
    #[must_use]
    pub fn admin_url_list(&self) -> Vec<String> {
        split_url_list(&self.admin_urls)
    }

    /// Returns the guest URL list in configured order.
    #[must_use]
    pub fn guest_url_list(&self) -> Vec<String> {
        split_url_list(&self.guest_urls)
    }

    /// Compiles the document filter when a non-blank pattern is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the pattern does not compile.
    pub fn document_filter(&self) -> Result<Option<DocumentFilter>, ConfigError> {
        self.documents_pattern
            .as_deref()
            .filter(|pattern| !pattern.trim().is_empty())
            .map(DocumentFilter::new)
            .transpose()
    }

    /// Validates target sources.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.archive_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("targets.archive_path must be set".to_string()));
        }
        self.document_filter()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Required property was not supplied.
    #[error("missing config property: {0}")]
    MissingProperty(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Splits a whitespace-separated URL list, dropping empty tokens.
#[must_use]
pub fn split_url_list(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Reads a property that must be present.
fn required_property(
    properties: &BTreeMap<String, String>,
    key: &str,
) -> Result<String, ConfigError> {
    properties.get(key).cloned().ok_or_else(|| ConfigError::MissingProperty(key.to_string()))
}

/// Resolves the archive location from property keys, if any are present.
fn archive_path_from_properties(
    properties: &BTreeMap<String, String>,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = properties.get(ARCHIVE_PATH_PROPERTY) {
        return Ok(Some(PathBuf::from(path)));
    }
    let Some(relative) = properties.get(ARCHIVE_RELATIVE_PATH_PROPERTY) else {
        return Ok(None);
    };
    let repository = required_property(properties, LOCAL_REPOSITORY_PROPERTY)?;
    Ok(Some(PathBuf::from(format!("{repository}/{relative}"))))
}

/// Reads the document pattern property; blank values mean no filter.
fn pattern_from_properties(properties: &BTreeMap<String, String>) -> Option<String> {
    properties
        .get(DOCUMENTS_PATTERN_PROPERTY)
        .filter(|pattern| !pattern.trim().is_empty())
        .cloned()
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}
