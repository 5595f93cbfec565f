// crates/wiki-validation-core/src/report.rs
// ============================================================================
// Module: Report Sinks
// Description: Sink trait and reference implementations for case reports.
// Purpose: Emit one structured record per finished test case.
// Dependencies: serde_json, thiserror, std
// ============================================================================

//! ## Overview
//! [`ReportSink`] receives each [`CaseReport`] as soon as its case finishes.
//! [`LogReportSink`] writes one JSON object per line; [`CallbackReportSink`]
//! forwards reports to a user-supplied function.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use serde_json::json;
use thiserror::Error;

use crate::case::CaseReport;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors emitted by report sinks.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Log sink failed to write.
    #[error("report write failed: {0}")]
    LogWriteFailed(String),
    /// Callback sink rejected the report.
    #[error("report callback failed: {0}")]
    Callback(String),
}

// ============================================================================
// SECTION: Sink Trait
// ============================================================================

/// Receives finished case reports.
pub trait ReportSink: Send + Sync {
    /// Records a case report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the report cannot be recorded.
    fn record(&self, report: &CaseReport) -> Result<(), ReportError>;
}

// ============================================================================
// SECTION: Log Sink
// ============================================================================

/// JSON-lines report sink.
pub struct LogReportSink<W: Write + Send> {
    /// Output writer for report records.
    writer: Mutex<W>,
    /// Monotonic record counter.
    sequence: AtomicU64,
}

impl<W: Write + Send> LogReportSink<W> {
    /// Creates a log sink writing to `writer`.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            sequence: AtomicU64::new(0),
        }
    }
}

impl<W: Write + Send> ReportSink for LogReportSink<W> {
    fn record(&self, report: &CaseReport) -> Result<(), ReportError> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let record = json!({
            "sequence": sequence,
            "case": report.name,
            "target": report.target,
            "role": report.role,
            "outcome": report.outcome,
            "message": report.message,
            "issues": report.issues,
            "elapsed_ms": report.elapsed_ms,
        });
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| ReportError::LogWriteFailed("report writer mutex poisoned".to_string()))?;
        serde_json::to_writer(&mut *guard, &record)
            .map_err(|err| ReportError::LogWriteFailed(err.to_string()))?;
        guard.write_all(b"\n").map_err(|err| ReportError::LogWriteFailed(err.to_string()))?;
        guard.flush().map_err(|err| ReportError::LogWriteFailed(err.to_string()))?;
        drop(guard);
        Ok(())
    }
}

// ============================================================================
// SECTION: Callback Sink
// ============================================================================

/// Callback handler signature used by [`CallbackReportSink`].
type ReportHandler = dyn Fn(&CaseReport) -> Result<(), ReportError> + Send + Sync;

/// Report sink backed by a user-supplied function.
#[derive(Clone)]
pub struct CallbackReportSink {
    /// Handler invoked with each report.
    handler: Arc<ReportHandler>,
}

impl CallbackReportSink {
    /// Creates a callback sink from a handler function.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&CaseReport) -> Result<(), ReportError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }
}

impl ReportSink for CallbackReportSink {
    fn record(&self, report: &CaseReport) -> Result<(), ReportError> {
        (self.handler)(report)
    }
}
