// crates/readiness-core/src/checks/certification.rs
// ============================================================================
// Module: Certification Check
// Description: Multi-part check over performance, security, and similar sign-offs.
// Purpose: Fold independently sourced sub-checks into one certification result.
// Dependencies: crate::{checks, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Each sub-check is backed by either a Jenkins job or a Confluence page and
//! is evaluated on its own. A sub-check with no evidence is RED when required
//! and YELLOW when optional. Results fold through the sub-check aggregator in
//! the order the policy declares them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::checks::CheckInternalError;
use crate::checks::regression::evaluate_job;
use crate::checks::support::apply_staleness;
use crate::checks::support::page_evidence;
use crate::checks::support::staleness;
use crate::core::BuildMatch;
use crate::core::CertificationSource;
use crate::core::CheckKind;
use crate::core::CheckOutcome;
use crate::core::SubCheckPolicy;
use crate::runtime::ExecutionContext;
use crate::runtime::SubCheckResult;
use crate::runtime::fold_sub_checks;

// ============================================================================
// SECTION: Check
// ============================================================================

/// Certification bundle check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CertificationCheck;

impl CertificationCheck {
    /// Evaluates every certification sub-check and folds the results.
    ///
    /// # Errors
    ///
    /// Never fails; adapter failures become missing-evidence sub-results.
    pub async fn evaluate(
        self,
        ctx: &ExecutionContext,
    ) -> Result<CheckOutcome, CheckInternalError> {
        let params = &ctx.policy().certification().params;
        let mut results = Vec::with_capacity(params.sub_checks.len());
        for sub_check in &params.sub_checks {
            results.push(evaluate_sub_check(ctx, sub_check, &params.matching).await);
        }
        Ok(fold_sub_checks(CheckKind::Certification.display_name(), results))
    }
}

/// Evaluates one certification sub-check.
async fn evaluate_sub_check(
    ctx: &ExecutionContext,
    sub_check: &SubCheckPolicy<CertificationSource>,
    matching: &BuildMatch,
) -> SubCheckResult {
    let kind = CheckKind::Certification;
    let id = sub_check.id.clone();
    let required = sub_check.required;
    match &sub_check.source {
        CertificationSource::JenkinsJob {
            job,
        } => match evaluate_job(ctx, kind, job, matching, sub_check.id.as_str()).await {
            Ok(outcome) => SubCheckResult::from_outcome(id, required, outcome),
            Err(gap) => SubCheckResult::missing(id, required, gap.into_detail()),
        },
        CertificationSource::ConfluencePage {
            page_id,
        } => match ctx.fetch(kind, ctx.adapters().confluence.page(page_id)).await {
            Ok(page) => {
                let stale = staleness(
                    &format!("page {page_id}"),
                    ctx.evaluated_at(),
                    page.updated_at,
                    ctx.policy().freshness_threshold(kind),
                );
                let outcome = CheckOutcome::green(
                    format!("certification page {} present", page.title),
                    vec![page_evidence(&page)],
                );
                SubCheckResult::from_outcome(id, required, apply_staleness(outcome, stale))
            }
            Err(err) => {
                SubCheckResult::missing(id, required, format!("confluence page {page_id}: {err}"))
            }
        },
    }
}
