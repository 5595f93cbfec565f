// crates/wiki-validation-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Validation Tests
// Description: TOML loading, defaults, and fail-closed validation.
// Purpose: Ensure invalid configuration is rejected before any fetch happens.
// Dependencies: wiki-validation-config, tempfile
// ============================================================================

//! ## Overview
//! Exercises [`wiki_validation_config::ValidationConfig::load`] and
//! [`wiki_validation_config::ValidationConfig::from_toml_str`].

#![allow(dead_code, reason = "Common module may have unused helpers.")]
#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::path::PathBuf;

use wiki_validation_config::ConfigError;
use wiki_validation_config::DEFAULT_BASE_URL;
use wiki_validation_config::DEFAULT_VIEW_PATH;
use wiki_validation_config::MAX_CONFIG_FILE_SIZE;
use wiki_validation_config::ValidationConfig;

use crate::common::MINIMAL_TARGETS;
use crate::common::write_config;

// ============================================================================
// SECTION: Defaults
// ============================================================================

#[test]
fn minimal_config_uses_server_and_http_defaults() {
    let (_dir, path) = write_config(MINIMAL_TARGETS);
    let config = ValidationConfig::load(Some(&path)).expect("load");

    assert_eq!(config.server.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.server.view_path, DEFAULT_VIEW_PATH);
    assert_eq!(config.server.default_wiki, "xwiki");
    assert_eq!(config.server.admin.username, "Admin");
    assert_eq!(config.server.admin.password, "admin");
    assert_eq!(config.http.timeout_ms, 30_000);
    assert_eq!(config.targets.archive_path, PathBuf::from("/tmp/xwiki.xar"));
    assert_eq!(config.targets.documents_pattern, None);
    assert_eq!(config.targets.admin_url_list(), vec!["/xwiki/bin/view/Main/"]);
    assert_eq!(
        config.targets.guest_url_list(),
        vec!["/xwiki/bin/view/Main/", "/xwiki/bin/login/XWiki/XWikiLogin"]
    );
}

#[test]
fn full_config_overrides_defaults() {
    let content = r#"
[server]
base_url = "http://wiki.internal:9090/"
view_path = "/bin/view"
default_wiki = "dev"

[server.admin]
username = "superadmin"
password = "secret"

[http]
timeout_ms = 500
max_redirects = 2
max_response_bytes = 1024
user_agent = "checker"

[targets]
admin_urls = ""
guest_urls = ""
archive_path = "ui.xar"
documents_pattern = "Main\\..*"
"#;
    let config = ValidationConfig::from_toml_str(content).expect("parse");
    assert_eq!(config.server.base_address(), "http://wiki.internal:9090");
    assert_eq!(config.server.default_wiki, "dev");
    assert_eq!(config.server.admin.username, "superadmin");
    assert_eq!(config.http.max_redirects, 2);
    assert!(config.targets.admin_url_list().is_empty());
    let filter = config.targets.document_filter().expect("filter").expect("pattern set");
    assert!(filter.matches("Main.WebHome"));
}

#[test]
fn admin_password_is_redacted_in_debug_output() {
    let config = ValidationConfig::from_toml_str(MINIMAL_TARGETS).expect("parse");
    let rendered = format!("{:?}", config.server.admin);
    assert!(rendered.contains("Admin"));
    assert!(!rendered.contains("\"admin\""));
}

// ============================================================================
// SECTION: Failures
// ============================================================================

#[test]
fn missing_targets_table_is_a_parse_error() {
    let err = ValidationConfig::from_toml_str("[server]\nbase_url = \"http://x\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn missing_admin_urls_is_a_parse_error() {
    let content = "[targets]\nguest_urls = \"\"\narchive_path = \"a.xar\"\n";
    let err = ValidationConfig::from_toml_str(content).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(message) if message.contains("admin_urls")));
}

#[test]
fn unknown_fields_are_rejected() {
    let content = format!("{MINIMAL_TARGETS}\n[extra]\nkey = 1\n");
    let err = ValidationConfig::from_toml_str(&content).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn non_http_base_url_is_rejected() {
    let content = format!("[server]\nbase_url = \"ftp://127.0.0.1\"\n{MINIMAL_TARGETS}");
    let err = ValidationConfig::from_toml_str(&content).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("http or https")));
}

#[test]
fn relative_view_path_is_rejected() {
    let content = format!("[server]\nview_path = \"bin/view\"\n{MINIMAL_TARGETS}");
    let err = ValidationConfig::from_toml_str(&content).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("view_path")));
}

#[test]
fn zero_timeout_is_rejected() {
    let content = format!("[http]\ntimeout_ms = 0\n{MINIMAL_TARGETS}");
    let err = ValidationConfig::from_toml_str(&content).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("timeout_ms")));
}

#[test]
fn invalid_documents_pattern_is_rejected() {
    let content = format!("{MINIMAL_TARGETS}documents_pattern = \"[unclosed\"\n");
    let err = ValidationConfig::from_toml_str(&content).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("documents pattern")));
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = ValidationConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn oversized_config_file_is_rejected() {
    let padding = "#".repeat(MAX_CONFIG_FILE_SIZE + 1);
    let (_dir, path) = write_config(&padding);
    let err = ValidationConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("size limit")));
}

#[test]
fn non_utf8_config_file_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, [0xff, 0xfe, 0x00]).expect("write");
    let err = ValidationConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("utf-8")));
}
