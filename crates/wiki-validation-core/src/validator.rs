// crates/wiki-validation-core/src/validator.rs
// ============================================================================
// Module: Page Validators
// Description: Validator seam and reference implementations.
// Purpose: Check fetched page bodies and report issues by severity.
// Dependencies: roxmltree, serde
// ============================================================================

//! ## Overview
//! A [`Validator`] inspects a fetched page body and returns
//! [`ValidationIssue`]s. Rule sets live outside this crate; two reference
//! implementations ship here: [`WellFormedXmlValidator`] for XHTML
//! well-formedness and [`CallbackValidator`] for closure-backed checks.
//! Invariants:
//! - Validators never panic on malformed input; problems become issues.
//! - Only [`Severity::Error`] and [`Severity::Fatal`] fail a test case.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use roxmltree::Document;
use roxmltree::ParsingOptions;
use serde::Serialize;

// ============================================================================
// SECTION: Issues
// ============================================================================

/// Severity of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Reported but does not fail the case.
    Warning,
    /// Rule violation.
    Error,
    /// Document could not be checked at all.
    Fatal,
}

impl Severity {
    /// Returns a stable label for the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true when issues of this severity fail a test case.
    #[must_use]
    pub const fn fails_case(self) -> bool {
        matches!(self, Self::Error | Self::Fatal)
    }
}

/// Single problem reported by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Issue severity.
    pub severity: Severity,
    /// One-based line, when known.
    pub line: Option<u32>,
    /// One-based column, when known.
    pub column: Option<u32>,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    /// Creates an issue without position.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            line: None,
            column: None,
            message: message.into(),
        }
    }

    /// Creates an error issue.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Creates a warning issue.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Attaches a position to the issue.
    #[must_use]
    pub const fn at(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.severity.as_str())?;
        if let (Some(line), Some(column)) = (self.line, self.column) {
            write!(f, " {line}:{column}")?;
        }
        write!(f, " {}", self.message)
    }
}

// ============================================================================
// SECTION: Validator Trait
// ============================================================================

/// Checks fetched page bodies.
pub trait Validator: Send + Sync {
    /// Returns the validator name used in test case names.
    fn name(&self) -> &str;

    /// Validates a page body and returns every issue found.
    fn validate(&self, document: &[u8]) -> Vec<ValidationIssue>;
}

// ============================================================================
// SECTION: Well-Formed XML Validator
// ============================================================================

/// Reports XML well-formedness problems in XHTML pages.
///
/// Document type declarations are accepted; entities declared only in an
/// external DTD (such as `&nbsp;`) are reported, since they cannot be resolved
/// from the page alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct WellFormedXmlValidator;

impl WellFormedXmlValidator {
    /// Creates the validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Validator for WellFormedXmlValidator {
    fn name(&self) -> &str {
        "well-formed-xml"
    }

    fn validate(&self, document: &[u8]) -> Vec<ValidationIssue> {
        let text = match std::str::from_utf8(document) {
            Ok(text) => text,
            Err(err) => {
                return vec![ValidationIssue::new(
                    Severity::Fatal,
                    format!("document is not valid utf-8: {err}"),
                )];
            }
        };
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        match Document::parse_with_options(text, options) {
            Ok(_) => Vec::new(),
            Err(err) => {
                let position = err.pos();
                let issue = ValidationIssue::new(Severity::Fatal, err.to_string());
                vec![issue.at(position.row, position.col)]
            }
        }
    }
}

// ============================================================================
// SECTION: Callback Validator
// ============================================================================

/// Callback handler signature used by [`CallbackValidator`].
type ValidateHandler = dyn Fn(&[u8]) -> Vec<ValidationIssue> + Send + Sync;

/// Validator backed by a user-supplied function.
#[derive(Clone)]
pub struct CallbackValidator {
    /// Validator name.
    name: String,
    /// Handler invoked with each page body.
    handler: Arc<ValidateHandler>,
}

impl CallbackValidator {
    /// Creates a named validator from a handler function.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[u8]) -> Vec<ValidationIssue> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            handler: Arc::new(handler),
        }
    }
}

impl Validator for CallbackValidator {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, document: &[u8]) -> Vec<ValidationIssue> {
        (self.handler)(document)
    }
}
