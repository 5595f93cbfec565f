// crates/wiki-validation-core/src/lib.rs
// ============================================================================
// Module: Wiki Validation Core Library
// Description: Page fetching, archive enumeration, and validation suite runtime.
// Purpose: Build and run one validation test case per wiki page.
// Dependencies: reqwest, roxmltree, serde_json, url, wiki-validation-config, zip
// ============================================================================

//! ## Overview
//! `wiki-validation-core` turns a [`wiki_validation_config::ValidationConfig`]
//! into an ordered [`Suite`] of test cases. Each case fetches one page from a
//! running wiki over HTTP and hands the body to a [`Validator`].
//! Invariants:
//! - Suite order is admin URLs, then archive documents, then guest URLs.
//! - Administrator requests carry HTTP Basic credentials; guest requests do not.
//! - Only status 200 passes a fetch; failures are reported, never panicked on.
//! - An archive without a table of contents contributes no cases.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod archive;
pub mod case;
pub mod client;
pub mod reference;
pub mod report;
pub mod suite;
pub mod target;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use archive::ArchiveError;
pub use archive::MAX_TABLE_OF_CONTENTS_BYTES;
pub use archive::TABLE_OF_CONTENTS_ENTRY;
pub use archive::parse_table_of_contents;
pub use archive::read_archive_contents;
pub use archive::read_archive_contents_for_wiki;
pub use case::CaseOutcome;
pub use case::CaseReport;
pub use case::TestCase;
pub use case::ValidationTestCase;
pub use case::validation_test_case;
pub use client::BasicCredentials;
pub use client::ClientRole;
pub use client::FetchError;
pub use client::PageClient;
pub use reference::DEFAULT_PAGE;
pub use reference::DEFAULT_SPACE;
pub use reference::DocumentReference;
pub use reference::ReferenceError;
pub use reference::resolve_document_reference;
pub use report::CallbackReportSink;
pub use report::LogReportSink;
pub use report::ReportError;
pub use report::ReportSink;
pub use suite::Suite;
pub use suite::SuiteBuilder;
pub use suite::SuiteError;
pub use suite::SuiteReport;
pub use suite::build_suite;
pub use target::ServerEndpoint;
pub use target::Target;
pub use target::TargetError;
pub use validator::CallbackValidator;
pub use validator::Severity;
pub use validator::ValidationIssue;
pub use validator::Validator;
pub use validator::WellFormedXmlValidator;
