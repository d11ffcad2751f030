// crates/readiness-core/src/core/report.rs
// ============================================================================
// Module: Readiness Report
// Description: Immutable report assembled from all check results.
// Purpose: The single public data contract handed to reporters.
// Dependencies: crate::core::{identifiers, policy, release, result, status, time}, serde
// ============================================================================

//! ## Overview
//! [`ReadinessReport::assemble`] is the only constructor. The overall status,
//! counts, and blocking split are derived there from check statuses and policy
//! requiredness; there is no setter, so the verdict can never be hand-edited.
//! Reporters serialize the report and must not re-derive status.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::identifiers::BuildId;
use crate::core::identifiers::CheckId;
use crate::core::identifiers::CheckKind;
use crate::core::policy::Policy;
use crate::core::release::ReleaseIdentity;
use crate::core::result::CheckResult;
use crate::core::status::Status;
use crate::core::status::StatusCounts;
use crate::core::status::combine;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Report
// ============================================================================

/// Release readiness report.
///
/// # Invariants
/// - `overall_status == combine(check statuses, policy requiredness)`.
/// - `checks` preserves registration order and ids are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessReport {
    /// Release under evaluation.
    release: ReleaseIdentity,
    /// Overall verdict.
    overall_status: Status,
    /// Check results in registration order.
    checks: Vec<CheckResult>,
    /// Status tallies across checks.
    summary: StatusCounts,
    /// Required items that are not GREEN.
    blocking: Vec<String>,
    /// Optional items that are not GREEN.
    non_blocking: Vec<String>,
    /// Whether every check ran to completion.
    complete: bool,
    /// Report generation instant.
    generated_at: Timestamp,
    /// Build identifier of the run.
    build_id: BuildId,
}

impl ReadinessReport {
    /// Assembles a report, deriving the verdict from `checks` and `policy`.
    #[must_use]
    pub fn assemble(
        release: ReleaseIdentity,
        checks: Vec<CheckResult>,
        policy: &Policy,
        generated_at: Timestamp,
        build_id: BuildId,
        complete: bool,
    ) -> Self {
        let required = |id: &CheckId| is_required(policy, id);
        let overall_status =
            combine(checks.iter().map(|check| (check.status(), required(check.id()))));
        let summary = StatusCounts::tally(checks.iter().map(CheckResult::status));
        let mut blocking = Vec::new();
        let mut non_blocking = Vec::new();
        for check in &checks {
            let check_required = required(check.id());
            if !check.status().is_green() {
                let bucket = if check_required { &mut blocking } else { &mut non_blocking };
                bucket.push(check.id().to_string());
            }
            for sub_check in check.sub_checks() {
                if sub_check.status.is_green() {
                    continue;
                }
                let bucket = if check_required && sub_check.required {
                    &mut blocking
                } else {
                    &mut non_blocking
                };
                bucket.push(format!("{}/{}", check.id(), sub_check.id));
            }
        }
        Self {
            release,
            overall_status,
            checks,
            summary,
            blocking,
            non_blocking,
            complete,
            generated_at,
            build_id,
        }
    }

    /// Release under evaluation.
    #[must_use]
    pub const fn release(&self) -> &ReleaseIdentity {
        &self.release
    }

    /// Overall verdict.
    #[must_use]
    pub const fn overall_status(&self) -> Status {
        self.overall_status
    }

    /// Check results in registration order.
    #[must_use]
    pub fn checks(&self) -> &[CheckResult] {
        &self.checks
    }

    /// Looks up a check result by id.
    #[must_use]
    pub fn check(&self, id: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|check| check.id().as_str() == id)
    }

    /// Status tallies across checks.
    #[must_use]
    pub const fn summary(&self) -> StatusCounts {
        self.summary
    }

    /// Required items that are not GREEN.
    #[must_use]
    pub fn blocking(&self) -> &[String] {
        &self.blocking
    }

    /// Optional items that are not GREEN.
    #[must_use]
    pub fn non_blocking(&self) -> &[String] {
        &self.non_blocking
    }

    /// Whether every check ran to completion.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// Report generation instant.
    #[must_use]
    pub const fn generated_at(&self) -> Timestamp {
        self.generated_at
    }

    /// Build identifier of the run.
    #[must_use]
    pub const fn build_id(&self) -> &BuildId {
        &self.build_id
    }
}

/// Policy requiredness for a report entry; unknown ids are treated as required.
fn is_required(policy: &Policy, id: &CheckId) -> bool {
    CheckKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == id.as_str())
        .is_none_or(|kind| policy.is_required(kind))
}
