// crates/readiness-core/src/core/result.rs
// ============================================================================
// Module: Check Results
// Description: Check outcomes, sub-check summaries, and timed check results.
// Purpose: Carry one check's decision, reasons, and evidence to the runner.
// Dependencies: crate::core::{evidence, identifiers, status, time}, serde
// ============================================================================

//! ## Overview
//! A check produces a [`CheckOutcome`]: status, summary, reasons, evidence.
//! The runner stamps timing and identity onto it to form the immutable
//! [`CheckResult`]. Construction normalizes the outcome so that non-GREEN
//! results always explain themselves and GREEN is never claimed without
//! evidence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::evidence::Evidence;
use crate::core::identifiers::CheckId;
use crate::core::identifiers::SubCheckId;
use crate::core::status::Status;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Reason Labels
// ============================================================================

/// Reason recorded when no evidence could be gathered.
pub const REASON_EVIDENCE_MISSING: &str = "evidence missing";
/// Reason recorded when a check did not finish before the run ended.
pub const REASON_EVALUATION_INCOMPLETE: &str = "evaluation incomplete";
/// Reason prefix recorded when evidence fails structural validation.
pub const REASON_INVALID_EVIDENCE: &str = "invalid evidence";

// ============================================================================
// SECTION: Sub-Check Summary
// ============================================================================

/// Folded view of one sub-check, retained on the parent result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubCheckSummary {
    /// Sub-check identifier.
    pub id: SubCheckId,
    /// Sub-check status before folding.
    pub status: Status,
    /// Whether policy marks the sub-check required.
    pub required: bool,
    /// Sub-check reasons (untagged).
    pub reasons: Vec<String>,
}

// ============================================================================
// SECTION: Check Outcome
// ============================================================================

/// Untimed decision produced by a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Decided status.
    pub status: Status,
    /// One-line summary.
    pub summary: String,
    /// Ordered reasons; required when the status is not GREEN.
    pub reasons: Vec<String>,
    /// Evidence gathered by the check.
    pub evidence: Vec<Evidence>,
    /// Sub-check summaries for multi-part checks.
    pub sub_checks: Vec<SubCheckSummary>,
}

impl CheckOutcome {
    /// GREEN outcome backed by evidence.
    #[must_use]
    pub fn green(summary: impl Into<String>, evidence: Vec<Evidence>) -> Self {
        Self {
            status: Status::Green,
            summary: summary.into(),
            reasons: Vec::new(),
            evidence,
            sub_checks: Vec::new(),
        }
    }

    /// YELLOW outcome with a single reason.
    #[must_use]
    pub fn yellow(reason: impl Into<String>, evidence: Vec<Evidence>) -> Self {
        Self::with_reason(Status::Yellow, reason.into(), evidence)
    }

    /// RED outcome with a single reason.
    #[must_use]
    pub fn red(reason: impl Into<String>, evidence: Vec<Evidence>) -> Self {
        Self::with_reason(Status::Red, reason.into(), evidence)
    }

    /// RED outcome for evidence that could not be obtained.
    #[must_use]
    pub fn evidence_missing(detail: impl AsRef<str>) -> Self {
        Self::red(format!("{REASON_EVIDENCE_MISSING}: {}", detail.as_ref()), Vec::new())
    }

    /// RED outcome for evidence that failed structural validation.
    #[must_use]
    pub fn invalid_evidence(detail: impl AsRef<str>, evidence: Vec<Evidence>) -> Self {
        Self::red(format!("{REASON_INVALID_EVIDENCE}: {}", detail.as_ref()), evidence)
    }

    /// Builds an outcome whose summary is its single reason.
    fn with_reason(status: Status, reason: String, evidence: Vec<Evidence>) -> Self {
        Self {
            status,
            summary: reason.clone(),
            reasons: vec![reason],
            evidence,
            sub_checks: Vec::new(),
        }
    }

    /// Downgrades a GREEN outcome to YELLOW when the backing evidence is stale.
    #[must_use]
    pub fn stale_if(self, stale: bool, reason: impl Into<String>) -> Self {
        if stale && self.status.is_green() {
            Self::yellow(reason, self.evidence)
        } else {
            self
        }
    }

    /// Enforces result invariants before the outcome is stamped.
    fn normalized(mut self) -> Self {
        if self.status.is_green() && self.evidence.is_empty() {
            self.status = Status::Red;
            self.summary = REASON_EVIDENCE_MISSING.to_string();
            self.reasons = vec![REASON_EVIDENCE_MISSING.to_string()];
        }
        if !self.status.is_green() && self.reasons.is_empty() {
            self.reasons.push(self.summary.clone());
        }
        self
    }
}

// ============================================================================
// SECTION: Timing
// ============================================================================

/// Wall-clock span of one check evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckTiming {
    /// Evaluation start.
    pub started_at: Timestamp,
    /// Evaluation end.
    pub ended_at: Timestamp,
}

impl CheckTiming {
    /// Creates a timing span.
    #[must_use]
    pub const fn new(started_at: Timestamp, ended_at: Timestamp) -> Self {
        Self {
            started_at,
            ended_at,
        }
    }

    /// Non-negative span length in milliseconds.
    #[must_use]
    pub fn duration_ms(self) -> u64 {
        u64::try_from(self.ended_at.age_of(self.started_at).as_millis()).unwrap_or(u64::MAX)
    }
}

// ============================================================================
// SECTION: Check Result
// ============================================================================

/// Immutable, timed result of one check.
///
/// # Invariants
/// - `reasons` is non-empty whenever `status` is not GREEN.
/// - `evidence` is empty only for non-GREEN results that explain the gap.
/// - `duration_ms` equals `ended_at - started_at` and is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// Check identifier.
    id: CheckId,
    /// Human-readable check name.
    name: String,
    /// Decided status.
    status: Status,
    /// Whether policy marks the check required.
    required: bool,
    /// One-line summary.
    summary: String,
    /// Ordered reasons.
    reasons: Vec<String>,
    /// Evidence owned by this result.
    evidence: Vec<Evidence>,
    /// Sub-check summaries for multi-part checks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sub_checks: Vec<SubCheckSummary>,
    /// Evaluation start.
    started_at: Timestamp,
    /// Evaluation end.
    ended_at: Timestamp,
    /// Evaluation duration.
    duration_ms: u64,
}

impl CheckResult {
    /// Stamps identity and timing onto a check outcome.
    #[must_use]
    pub fn from_outcome(
        id: CheckId,
        name: impl Into<String>,
        required: bool,
        outcome: CheckOutcome,
        timing: CheckTiming,
    ) -> Self {
        let outcome = outcome.normalized();
        Self {
            id,
            name: name.into(),
            status: outcome.status,
            required,
            summary: outcome.summary,
            reasons: outcome.reasons,
            evidence: outcome.evidence,
            sub_checks: outcome.sub_checks,
            started_at: timing.started_at,
            ended_at: timing.ended_at,
            duration_ms: timing.duration_ms(),
        }
    }

    /// RED result for a check that did not finish.
    #[must_use]
    pub fn incomplete(
        id: CheckId,
        name: impl Into<String>,
        required: bool,
        timing: CheckTiming,
    ) -> Self {
        Self::from_outcome(
            id,
            name,
            required,
            CheckOutcome::red(REASON_EVALUATION_INCOMPLETE, Vec::new()),
            timing,
        )
    }

    /// RED result for a check that failed internally.
    #[must_use]
    pub fn internal_failure(
        id: CheckId,
        name: impl Into<String>,
        required: bool,
        cause: &str,
        timing: CheckTiming,
    ) -> Self {
        Self::from_outcome(
            id,
            name,
            required,
            CheckOutcome::red(format!("check failed internally: {cause}"), Vec::new()),
            timing,
        )
    }

    /// Check identifier.
    #[must_use]
    pub const fn id(&self) -> &CheckId {
        &self.id
    }

    /// Human-readable check name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decided status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Whether policy marks the check required.
    #[must_use]
    pub const fn required(&self) -> bool {
        self.required
    }

    /// One-line summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Ordered reasons.
    #[must_use]
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    /// Evidence owned by this result.
    #[must_use]
    pub fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }

    /// Sub-check summaries.
    #[must_use]
    pub fn sub_checks(&self) -> &[SubCheckSummary] {
        &self.sub_checks
    }

    /// Evaluation start.
    #[must_use]
    pub const fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Evaluation end.
    #[must_use]
    pub const fn ended_at(&self) -> Timestamp {
        self.ended_at
    }

    /// Evaluation duration in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
