// crates/wiki-validation-core/src/suite.rs
// ============================================================================
// Module: Suite Assembly
// Description: Builds and runs the ordered page validation suite.
// Purpose: Turn configuration into test cases and execute them in order.
// Dependencies: thiserror, wiki-validation-config
// ============================================================================

//! ## Overview
//! [`build_suite`] creates the administrator and guest clients, asks the
//! validator factory for one shared validator, and creates one test case per
//! target through the injected test case factory.
//! Invariants:
//! - Groups are appended in order: admin URLs, archive documents, guest URLs.
//! - Archive documents are fetched with the administrator client.
//! - Every case shares the same validator instance.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;
use wiki_validation_config::ConfigError;
use wiki_validation_config::ValidationConfig;

use crate::archive::ArchiveError;
use crate::archive::read_archive_contents_for_wiki;
use crate::case::CaseReport;
use crate::case::TestCase;
use crate::client::FetchError;
use crate::client::PageClient;
use crate::reference::DocumentReference;
use crate::report::ReportError;
use crate::report::ReportSink;
use crate::target::Target;
use crate::validator::Validator;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors that abort suite construction.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// An HTTP client could not be built.
    #[error(transparent)]
    Client(#[from] FetchError),
    /// The archive could not be read.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Ordered, immutable collection of test cases.
pub struct Suite {
    /// Cases in execution order.
    cases: Vec<Box<dyn TestCase>>,
}

impl Suite {
    /// Returns the number of cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns true when the suite holds no cases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Returns the cases in execution order.
    #[must_use]
    pub fn cases(&self) -> &[Box<dyn TestCase>] {
        &self.cases
    }

    /// Returns the case names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.cases.iter().map(|case| case.name()).collect()
    }

    /// Runs every case in order, handing each report to `sink` as it finishes.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the sink rejects a report; remaining cases
    /// are not run.
    pub fn run(&self, sink: &dyn ReportSink) -> Result<SuiteReport, ReportError> {
        let mut cases = Vec::with_capacity(self.cases.len());
        for case in &self.cases {
            let report = case.run();
            sink.record(&report)?;
            cases.push(report);
        }
        Ok(SuiteReport {
            cases,
        })
    }
}

/// Reports of a finished suite run, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    /// Case reports in execution order.
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    /// Returns the number of passed cases.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|report| report.passed()).count()
    }

    /// Returns the number of failed cases.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.cases.len() - self.passed_count()
    }

    /// Returns true when every case passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(CaseReport::passed)
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Incremental suite builder sharing one validator across cases.
pub struct SuiteBuilder<F> {
    /// Validator shared by every case.
    validator: Arc<dyn Validator>,
    /// Test case factory.
    factory: F,
    /// Cases collected so far.
    cases: Vec<Box<dyn TestCase>>,
}

impl<F> SuiteBuilder<F>
where
    F: Fn(Target, Arc<PageClient>, Arc<dyn Validator>) -> Box<dyn TestCase>,
{
    /// Creates an empty builder.
    #[must_use]
    pub fn new(validator: Arc<dyn Validator>, factory: F) -> Self {
        Self {
            validator,
            factory,
            cases: Vec::new(),
        }
    }

    /// Appends one case per URL path, fetched with `client`.
    #[must_use]
    pub fn add_url_targets<I>(mut self, paths: I, client: &Arc<PageClient>) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        for path in paths {
            self.push(Target::url_path(path), client);
        }
        self
    }

    /// Appends one case per document, fetched with `client`.
    #[must_use]
    pub fn add_document_targets<I>(mut self, documents: I, client: &Arc<PageClient>) -> Self
    where
        I: IntoIterator<Item = DocumentReference>,
    {
        for document in documents {
            self.push(Target::document(document), client);
        }
        self
    }

    /// Finishes the suite.
    #[must_use]
    pub fn build(self) -> Suite {
        Suite {
            cases: self.cases,
        }
    }

    /// Creates a case through the factory and records it.
    fn push(&mut self, target: Target, client: &Arc<PageClient>) {
        let case = (self.factory)(target, Arc::clone(client), Arc::clone(&self.validator));
        self.cases.push(case);
    }
}

// ============================================================================
// SECTION: Assembly
// ============================================================================

/// Builds the suite described by `config`.
///
/// # Errors
///
/// Returns [`SuiteError`] when the configuration is invalid, a client cannot be
/// built, or the archive cannot be read.
pub fn build_suite<V, F>(
    config: &ValidationConfig,
    validator_factory: V,
    test_case_factory: F,
) -> Result<Suite, SuiteError>
where
    V: FnOnce() -> Arc<dyn Validator>,
    F: Fn(Target, Arc<PageClient>, Arc<dyn Validator>) -> Box<dyn TestCase>,
{
    config.validate()?;
    let admin = Arc::new(PageClient::admin(config)?);
    let guest = Arc::new(PageClient::guest(config)?);
    let filter = config.targets.document_filter()?;
    let documents = read_archive_contents_for_wiki(
        &config.targets.archive_path,
        filter.as_ref(),
        &config.server.default_wiki,
    )?;

    let suite = SuiteBuilder::new(validator_factory(), test_case_factory)
        .add_url_targets(config.targets.admin_url_list(), &admin)
        .add_document_targets(documents, &admin)
        .add_url_targets(config.targets.guest_url_list(), &guest)
        .build();
    Ok(suite)
}
