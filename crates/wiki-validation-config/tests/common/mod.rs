// crates/wiki-validation-config/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for wiki-validation-config tests.
// Purpose: Provide config file and property map builders.
// Dependencies: tempfile
// ============================================================================

//! ## Overview
//! Helpers for writing temporary config files and building property maps.

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

use std::collections::BTreeMap;
use std::path::PathBuf;

use tempfile::TempDir;

/// Minimal valid targets table.
pub const MINIMAL_TARGETS: &str = r#"
[targets]
admin_urls = "/xwiki/bin/view/Main/"
guest_urls = "/xwiki/bin/view/Main/ /xwiki/bin/login/XWiki/XWikiLogin"
archive_path = "/tmp/xwiki.xar"
"#;

/// Writes `content` to a config file inside a fresh temp dir.
pub fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("wiki-validation.toml");
    std::fs::write(&path, content).expect("write config");
    (dir, path)
}

/// Builds a property map from key/value pairs.
pub fn properties(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
}
