// crates/wiki-validation-config/src/filter.rs
// ============================================================================
// Module: Document Filter
// Description: Inclusion pattern applied to archive document names.
// Purpose: Compile the configured pattern once with whole-name semantics.
// Dependencies: regex
// ============================================================================

//! ## Overview
//! [`DocumentFilter`] wraps the optional `documents_pattern` setting. A name is
//! kept only when the pattern matches the entire name, so `Main\..*` keeps
//! `Main.WebHome` but not `Sandbox.Main.Page`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;

use crate::config::ConfigError;

// ============================================================================
// SECTION: Document Filter
// ============================================================================

/// Compiled whole-name inclusion filter for document full names.
///
/// # Invariants
/// - The wrapped regex is anchored at both ends.
#[derive(Debug, Clone)]
pub struct DocumentFilter {
    /// Pattern as written in configuration.
    pattern: String,
    /// Anchored regex compiled from `pattern`.
    regex: Regex,
}

impl DocumentFilter {
    /// Compiles a filter from a configured pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the pattern is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|err| ConfigError::Invalid(format!("invalid documents pattern: {err}")))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Returns the pattern as configured (without anchors).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns true when the pattern matches the whole document name.
    #[must_use]
    pub fn matches(&self, full_name: &str) -> bool {
        self.regex.is_match(full_name)
    }
}
