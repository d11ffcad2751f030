// crates/readiness-core/src/runtime/audit.rs
// ============================================================================
// Module: Run Audit Events
// Description: Structured audit events emitted while a readiness run executes.
// Purpose: Provide a JSON-lines event contract without a logging framework.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! The runner reports progress as [`AuditEvent`] values handed to an
//! [`AuditSink`]. Events carry identifiers, statuses, and counts only; raw
//! evidence never appears in an audit line. Hosts choose the sink: the CLI
//! writes JSON lines to stderr or an append-only file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::BuildId;
use crate::core::Status;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit event envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Build identifier of the run.
    pub build_id: String,
    /// Event-specific fields.
    #[serde(flatten)]
    pub detail: AuditDetail,
}

/// Event-specific audit fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AuditDetail {
    /// A run is starting.
    RunStarted {
        /// Service under evaluation.
        service: String,
        /// Release version under evaluation.
        version: String,
        /// Registered check ids in order.
        checks: Vec<String>,
    },
    /// A check produced a result.
    CheckCompleted {
        /// Check identifier.
        check_id: String,
        /// Decided status.
        status: Status,
        /// Whether the check is required.
        required: bool,
        /// Evaluation duration.
        duration_ms: u64,
        /// Number of recorded reasons.
        reason_count: usize,
    },
    /// A check failed internally or panicked.
    CheckFailed {
        /// Check identifier.
        check_id: String,
        /// Failure description.
        cause: String,
    },
    /// Cancellation was requested.
    RunCancelled {
        /// Checks still outstanding when cancellation arrived.
        pending: Vec<String>,
        /// Grace period granted to in-flight checks.
        grace_period_ms: u64,
    },
    /// The report was assembled.
    RunCompleted {
        /// Overall verdict.
        overall_status: Status,
        /// Whether every check finished.
        complete: bool,
        /// RED checks.
        red: usize,
        /// YELLOW checks.
        yellow: usize,
        /// GREEN checks.
        green: usize,
    },
    /// A report artifact was persisted.
    ReportWritten {
        /// Written location.
        location: String,
        /// Digest of the written bytes.
        digest: String,
    },
}

impl AuditDetail {
    /// Stable event label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::RunStarted {
                ..
            } => "run_started",
            Self::CheckCompleted {
                ..
            } => "check_completed",
            Self::CheckFailed {
                ..
            } => "check_failed",
            Self::RunCancelled {
                ..
            } => "run_cancelled",
            Self::RunCompleted {
                ..
            } => "run_completed",
            Self::ReportWritten {
                ..
            } => "report_written",
        }
    }
}

impl AuditEvent {
    /// Creates an audit event with a consistent timestamp.
    #[must_use]
    pub fn new(build_id: &BuildId, detail: AuditDetail) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: detail.label(),
            timestamp_ms,
            build_id: build_id.to_string(),
            detail,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for run events.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &AuditEvent);
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &AuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
