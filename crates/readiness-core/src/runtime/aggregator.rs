// crates/readiness-core/src/runtime/aggregator.rs
// ============================================================================
// Module: Sub-Check Aggregator
// Description: Folds named sub-check results into one check outcome.
// Purpose: Shared fold for multi-part checks (certification, pre-release).
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Multi-part checks evaluate each sub-check independently, then hand the
//! results to [`fold_sub_checks`] in policy-declared order. The fold status is
//! [`combine`] over `(status, required)`; reasons are tagged with their
//! sub-check id and concatenated in that same order, and evidence is the union
//! of all sub-evidence. Identical inputs yield identical reasons.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::CheckOutcome;
use crate::core::Evidence;
use crate::core::Status;
use crate::core::SubCheckId;
use crate::core::SubCheckSummary;
use crate::core::combine;
use crate::core::result::REASON_EVIDENCE_MISSING;

// ============================================================================
// SECTION: Sub-Check Result
// ============================================================================

/// Decision for one sub-check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCheckResult {
    /// Sub-check identifier.
    pub id: SubCheckId,
    /// Whether policy marks the sub-check required.
    pub required: bool,
    /// Sub-check status.
    pub status: Status,
    /// Ordered reasons; empty only when GREEN.
    pub reasons: Vec<String>,
    /// Evidence gathered for the sub-check.
    pub evidence: Vec<Evidence>,
}

impl SubCheckResult {
    /// GREEN sub-result.
    #[must_use]
    pub const fn green(id: SubCheckId, required: bool, evidence: Vec<Evidence>) -> Self {
        Self {
            id,
            required,
            status: Status::Green,
            reasons: Vec::new(),
            evidence,
        }
    }

    /// Non-GREEN sub-result with a single reason.
    #[must_use]
    pub fn flagged(
        id: SubCheckId,
        required: bool,
        status: Status,
        reason: impl Into<String>,
        evidence: Vec<Evidence>,
    ) -> Self {
        Self {
            id,
            required,
            status,
            reasons: vec![reason.into()],
            evidence,
        }
    }

    /// Sub-result for a sub-check with no evidence: RED if required, YELLOW if optional.
    #[must_use]
    pub fn missing(id: SubCheckId, required: bool, detail: impl AsRef<str>) -> Self {
        let (status, reason) = if required {
            (Status::Red, format!("{REASON_EVIDENCE_MISSING}: {}", detail.as_ref()))
        } else {
            (Status::Yellow, format!("{REASON_EVIDENCE_MISSING}, optional: {}", detail.as_ref()))
        };
        Self::flagged(id, required, status, reason, Vec::new())
    }

    /// Converts a single-outcome evaluation into a sub-result.
    #[must_use]
    pub fn from_outcome(id: SubCheckId, required: bool, outcome: CheckOutcome) -> Self {
        let mut reasons = outcome.reasons;
        if !outcome.status.is_green() && reasons.is_empty() {
            reasons.push(outcome.summary);
        }
        Self {
            id,
            required,
            status: outcome.status,
            reasons,
            evidence: outcome.evidence,
        }
    }
}

// ============================================================================
// SECTION: Fold
// ============================================================================

/// Folds sub-results, given in policy-declared order, into one outcome.
#[must_use]
pub fn fold_sub_checks(check_name: &str, results: Vec<SubCheckResult>) -> CheckOutcome {
    let status = combine(results.iter().map(|result| (result.status, result.required)));
    let total = results.len();
    let green = results.iter().filter(|result| result.status.is_green()).count();
    let summary = format!("{check_name}: {green}/{total} sub-checks GREEN");

    let mut reasons = Vec::new();
    let mut evidence = Vec::new();
    let mut sub_checks = Vec::with_capacity(total);
    for result in results {
        for reason in &result.reasons {
            reasons.push(format!("[{}] {reason}", result.id));
        }
        evidence.extend(result.evidence);
        sub_checks.push(SubCheckSummary {
            id: result.id,
            status: result.status,
            required: result.required,
            reasons: result.reasons,
        });
    }

    CheckOutcome {
        status,
        summary,
        reasons,
        evidence,
        sub_checks,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
