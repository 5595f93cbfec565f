// crates/wiki-validation-core/src/case.rs
// ============================================================================
// Module: Validation Test Cases
// Description: Test case trait and the default fetch-then-validate case.
// Purpose: Bind one target, one client, and one validator into a runnable case.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`TestCase`] is created once and run once. [`ValidationTestCase`] fetches
//! its target, hands the body to its validator, and reports the outcome as a
//! [`CaseReport`]. Failures never panic; they are reported.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::client::ClientRole;
use crate::client::PageClient;
use crate::target::Target;
use crate::validator::ValidationIssue;
use crate::validator::Validator;

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Result of running a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Page fetched and validated without errors.
    Passed,
    /// Fetch failed or the validator reported errors.
    Failed,
}

impl CaseOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }
}

/// Report emitted by a finished test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    /// Test case name.
    pub name: String,
    /// Display form of the target.
    pub target: String,
    /// Identity the page was fetched as.
    pub role: ClientRole,
    /// Pass/fail outcome.
    pub outcome: CaseOutcome,
    /// Failure description, set when the case failed.
    pub message: Option<String>,
    /// All issues reported by the validator, including warnings.
    pub issues: Vec<ValidationIssue>,
    /// Wall-clock duration in milliseconds.
    pub elapsed_ms: u64,
}

impl CaseReport {
    /// Returns true when the case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == CaseOutcome::Passed
    }
}

// ============================================================================
// SECTION: Test Case Trait
// ============================================================================

/// Runnable, named test case.
pub trait TestCase {
    /// Returns the case name.
    fn name(&self) -> &str;

    /// Returns the page the case checks.
    fn target(&self) -> &Target;

    /// Runs the case once and reports the outcome.
    fn run(&self) -> CaseReport;
}

// ============================================================================
// SECTION: Validation Test Case
// ============================================================================

/// Fetches a page and fails on validator errors.
pub struct ValidationTestCase {
    /// Case name: validator name followed by the target.
    name: String,
    /// Page to fetch.
    target: Target,
    /// Client used for the fetch.
    client: Arc<PageClient>,
    /// Validator applied to the body.
    validator: Arc<dyn Validator>,
}

impl ValidationTestCase {
    /// Creates a case for `target`.
    #[must_use]
    pub fn new(target: Target, client: Arc<PageClient>, validator: Arc<dyn Validator>) -> Self {
        Self {
            name: format!("{} {target}", validator.name()),
            target,
            client,
            validator,
        }
    }
}

impl TestCase for ValidationTestCase {
    fn name(&self) -> &str {
        &self.name
    }

    fn target(&self) -> &Target {
        &self.target
    }

    fn run(&self) -> CaseReport {
        let started = Instant::now();
        let (outcome, message, issues) = match self.client.fetch(&self.target) {
            Err(err) => (CaseOutcome::Failed, Some(err.to_string()), Vec::new()),
            Ok(body) => {
                let issues = self.validator.validate(&body);
                let failing: Vec<String> = issues
                    .iter()
                    .filter(|issue| issue.severity.fails_case())
                    .map(ToString::to_string)
                    .collect();
                if failing.is_empty() {
                    (CaseOutcome::Passed, None, issues)
                } else {
                    let message = format!(
                        "{} reported {} error(s): {}",
                        self.validator.name(),
                        failing.len(),
                        failing.join("; ")
                    );
                    (CaseOutcome::Failed, Some(message), issues)
                }
            }
        };
        CaseReport {
            name: self.name.clone(),
            target: self.target.to_string(),
            role: self.client.role(),
            outcome,
            message,
            issues,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Default test case factory producing [`ValidationTestCase`]s.
#[must_use]
pub fn validation_test_case(
    target: Target,
    client: Arc<PageClient>,
    validator: Arc<dyn Validator>,
) -> Box<dyn TestCase> {
    Box::new(ValidationTestCase::new(target, client, validator))
}
