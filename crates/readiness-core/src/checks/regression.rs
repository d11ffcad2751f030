// crates/readiness-core/src/checks/regression.rs
// ============================================================================
// Module: Regression Test Check
// Description: Verifies the latest regression build for the release succeeded.
// Purpose: Gate on Jenkins regression results.
// Dependencies: crate::{checks::support, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Only builds whose parameters name this release are considered, and only
//! the latest of those decides. `SUCCESS` is GREEN, or YELLOW when older than
//! the freshness threshold; every other result is RED.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::checks::CheckInternalError;
use crate::checks::support::apply_staleness;
use crate::checks::support::build_evidence;
use crate::checks::support::latest_matching_build;
use crate::checks::support::staleness;
use crate::core::BuildMatch;
use crate::core::CheckKind;
use crate::core::CheckOutcome;
use crate::interfaces::BuildStatus;
use crate::runtime::ExecutionContext;

// ============================================================================
// SECTION: Check
// ============================================================================

/// Regression test check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegressionCheck;

impl RegressionCheck {
    /// Evaluates the latest matching regression build.
    ///
    /// # Errors
    ///
    /// Never fails; adapter failures become RED outcomes.
    pub async fn evaluate(
        self,
        ctx: &ExecutionContext,
    ) -> Result<CheckOutcome, CheckInternalError> {
        let kind = CheckKind::RegressionTest;
        let policy = ctx.policy().regression_test();
        let params = &policy.params;
        Ok(match evaluate_job(ctx, kind, &params.job, &params.matching, "regression").await {
            Ok(outcome) => outcome,
            Err(JobGap::Unreachable(detail)) => CheckOutcome::evidence_missing(detail),
            Err(JobGap::NoMatchingBuild(detail)) => CheckOutcome::red(detail, Vec::new()),
        })
    }
}

/// Why a job produced no build to judge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum JobGap {
    /// The build history could not be fetched.
    Unreachable(String),
    /// No build names this release.
    NoMatchingBuild(String),
}

impl JobGap {
    /// Human-readable detail.
    pub(crate) fn into_detail(self) -> String {
        match self {
            Self::Unreachable(detail) | Self::NoMatchingBuild(detail) => detail,
        }
    }
}

/// Decides a single Jenkins job result for the release.
///
/// Shared with multi-part checks whose sub-checks are backed by a job.
pub(crate) async fn evaluate_job(
    ctx: &ExecutionContext,
    kind: CheckKind,
    job: &str,
    matching: &BuildMatch,
    label: &str,
) -> Result<CheckOutcome, JobGap> {
    let builds = ctx
        .fetch(kind, ctx.adapters().jenkins.builds(job))
        .await
        .map_err(|err| JobGap::Unreachable(format!("jenkins job {job}: {err}")))?;
    let release = ctx.release();
    let build = latest_matching_build(&builds, matching, release).ok_or_else(|| {
        JobGap::NoMatchingBuild(format!(
            "no matching build for release {} in job {job}",
            release.version
        ))
    })?;
    let evidence = vec![build_evidence(build)];
    Ok(match build.status {
        BuildStatus::Success => {
            let outcome = CheckOutcome::green(
                format!("{label} build {job}#{} succeeded", build.number),
                evidence,
            );
            let threshold = ctx.policy().freshness_threshold(kind);
            let stale = staleness(
                &format!("build {job}#{}", build.number),
                ctx.evaluated_at(),
                build.timestamp,
                threshold,
            );
            apply_staleness(outcome, stale)
        }
        status => CheckOutcome::red(
            format!("{label} build {job}#{} finished {status}", build.number),
            evidence,
        ),
    })
}
