// crates/readiness-core/src/checks/pre_release.rs
// ============================================================================
// Module: Pre-Release Readiness Check
// Description: Helm chart bump, install steps, and customer docs sub-checks.
// Purpose: Gate on release packaging and documentation being in place.
// Dependencies: crate::{checks, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Three sub-checks fold in fixed order: `helm_chart`, `install_steps`,
//! `customer_docs`.
//!
//! - `helm_chart`: the chart version at the release ref must be strictly
//!   greater than the previous release's, compared as dotted numbers, and the
//!   lint job must have a successful build for this release. A chart without a
//!   known previous version is RED: the bump cannot be shown.
//! - `install_steps`: the release page must exist; a stale page is YELLOW.
//! - `customer_docs`: satisfied by a merged docs pull request or a successful
//!   docs build, whichever is configured and passes first.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;

use crate::checks::CheckInternalError;
use crate::checks::regression::evaluate_job;
use crate::checks::support::apply_staleness;
use crate::checks::support::chart_evidence;
use crate::checks::support::page_evidence;
use crate::checks::support::pull_request_evidence;
use crate::checks::support::staleness;
use crate::core::BuildMatch;
use crate::core::CheckKind;
use crate::core::CheckOutcome;
use crate::core::CustomerDocsSource;
use crate::core::HelmChartSource;
use crate::core::InstallStepsSource;
use crate::core::Status;
use crate::core::SubCheckPolicy;
use crate::runtime::ExecutionContext;
use crate::runtime::SubCheckResult;
use crate::runtime::fold_sub_checks;

/// Check kind used for timeouts and freshness.
const KIND: CheckKind = CheckKind::PreRelease;

// ============================================================================
// SECTION: Check
// ============================================================================

/// Pre-release readiness check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreReleaseCheck;

impl PreReleaseCheck {
    /// Evaluates the three pre-release sub-checks and folds the results.
    ///
    /// # Errors
    ///
    /// Never fails; adapter failures become missing-evidence sub-results.
    pub async fn evaluate(
        self,
        ctx: &ExecutionContext,
    ) -> Result<CheckOutcome, CheckInternalError> {
        let params = &ctx.policy().pre_release().params;
        let results = vec![
            helm_chart(ctx, &params.helm_chart, &params.matching).await,
            install_steps(ctx, &params.install_steps).await,
            customer_docs(ctx, &params.customer_docs, &params.matching).await,
        ];
        Ok(fold_sub_checks(KIND.display_name(), results))
    }
}

// ============================================================================
// SECTION: Helm Chart
// ============================================================================

/// Chart version bump plus lint build.
async fn helm_chart(
    ctx: &ExecutionContext,
    policy: &SubCheckPolicy<HelmChartSource>,
    matching: &BuildMatch,
) -> SubCheckResult {
    let id = policy.id.clone();
    let required = policy.required;
    let source = &policy.source;
    let release = ctx.release();
    let reference = release.commit.as_deref().unwrap_or(&release.version);
    let chart = match ctx
        .fetch(KIND, ctx.adapters().github.chart(&source.repository, &source.chart_path, reference))
        .await
    {
        Ok(chart) => chart,
        Err(err) => {
            return SubCheckResult::missing(
                id,
                required,
                format!("helm chart {}:{}: {err}", source.repository, source.chart_path),
            );
        }
    };
    let mut evidence = vec![chart_evidence(&chart)];

    let Some(previous) = chart.previous_version.as_deref() else {
        return SubCheckResult::flagged(
            id,
            required,
            Status::Red,
            format!(
                "previous chart version unknown, version bump of {} not established",
                chart.version
            ),
            evidence,
        );
    };
    match compare_versions(&chart.version, previous) {
        Some(Ordering::Greater) => {}
        Some(_) => {
            return SubCheckResult::flagged(
                id,
                required,
                Status::Red,
                format!("chart version {} not bumped from {previous}", chart.version),
                evidence,
            );
        }
        None => {
            return SubCheckResult::flagged(
                id,
                required,
                Status::Red,
                format!("chart version {} cannot be compared with {previous}", chart.version),
                evidence,
            );
        }
    }

    match evaluate_job(ctx, KIND, &source.lint_job, matching, "helm lint").await {
        Ok(lint) => {
            let mut result = SubCheckResult::from_outcome(id, required, lint);
            evidence.append(&mut result.evidence);
            result.evidence = evidence;
            result
        }
        Err(gap) => {
            let mut result = SubCheckResult::missing(id, required, gap.into_detail());
            result.evidence = evidence;
            result
        }
    }
}

/// Compares dotted numeric versions; pre-release and build suffixes are ignored.
///
/// Returns `None` when either side does not parse.
fn compare_versions(current: &str, previous: &str) -> Option<Ordering> {
    let mut current = parse_version(current)?;
    let mut previous = parse_version(previous)?;
    let width = current.len().max(previous.len());
    current.resize(width, 0);
    previous.resize(width, 0);
    Some(current.cmp(&previous))
}

/// Parses `v1.2.3-rc.1` style versions into numeric components.
fn parse_version(version: &str) -> Option<Vec<u64>> {
    let trimmed = version.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    let core = trimmed.split(['-', '+']).next()?;
    core.split('.').map(|part| part.parse::<u64>().ok()).collect()
}

// ============================================================================
// SECTION: Install Steps
// ============================================================================

/// Release install steps page.
async fn install_steps(
    ctx: &ExecutionContext,
    policy: &SubCheckPolicy<InstallStepsSource>,
) -> SubCheckResult {
    let page_id = policy.source.page_id.as_str();
    match ctx.fetch(KIND, ctx.adapters().confluence.page(page_id)).await {
        Ok(page) => {
            let stale = staleness(
                &format!("page {page_id}"),
                ctx.evaluated_at(),
                page.updated_at,
                ctx.policy().freshness_threshold(KIND),
            );
            let outcome = CheckOutcome::green(
                format!("install steps page {} present", page.title),
                vec![page_evidence(&page)],
            );
            SubCheckResult::from_outcome(
                policy.id.clone(),
                policy.required,
                apply_staleness(outcome, stale),
            )
        }
        Err(err) => SubCheckResult::missing(
            policy.id.clone(),
            policy.required,
            format!("confluence page {page_id}: {err}"),
        ),
    }
}

// ============================================================================
// SECTION: Customer Docs
// ============================================================================

/// Merged docs pull request or successful docs build.
async fn customer_docs(
    ctx: &ExecutionContext,
    policy: &SubCheckPolicy<CustomerDocsSource>,
    matching: &BuildMatch,
) -> SubCheckResult {
    let id = policy.id.clone();
    let required = policy.required;
    let source = &policy.source;
    let mut evidence = Vec::new();
    let mut failures = Vec::new();
    let mut gaps = Vec::new();

    if let (Some(repository), Some(number)) = (&source.repository, source.pull_request) {
        match ctx.fetch(KIND, ctx.adapters().github.pull_request(repository, number)).await {
            Ok(pull) => {
                let item = pull_request_evidence(&pull, ctx.evaluated_at());
                if pull.merged {
                    return SubCheckResult::green(id, required, vec![item]);
                }
                evidence.push(item);
                failures.push(format!("docs pull request {repository}#{number} is not merged"));
            }
            Err(err) => gaps.push(format!("docs pull request {repository}#{number}: {err}")),
        }
    }

    if let Some(job) = &source.docs_job {
        match evaluate_job(ctx, KIND, job, matching, "docs").await {
            Ok(outcome) if outcome.status != Status::Red => {
                let mut result = SubCheckResult::from_outcome(id, required, outcome);
                evidence.append(&mut result.evidence);
                result.evidence = evidence;
                return result;
            }
            Ok(mut outcome) => {
                evidence.append(&mut outcome.evidence);
                failures.append(&mut outcome.reasons);
            }
            Err(gap) => gaps.push(gap.into_detail()),
        }
    }

    if evidence.is_empty() {
        return SubCheckResult::missing(id, required, gaps.join("; "));
    }
    let mut reasons = failures;
    reasons.extend(gaps);
    SubCheckResult {
        id,
        required,
        status: Status::Red,
        reasons,
        evidence,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::compare_versions;

    #[test]
    fn versions_compare_numerically() {
        assert_eq!(compare_versions("1.10.0", "1.9.3"), Some(Ordering::Greater));
        assert_eq!(compare_versions("v2.0", "2.0.0"), Some(Ordering::Equal));
        assert_eq!(compare_versions("1.4.0-rc.1", "1.3.9"), Some(Ordering::Greater));
        assert_eq!(compare_versions("1.2.0", "1.3.0"), Some(Ordering::Less));
    }

    #[test]
    fn unparsable_versions_do_not_compare() {
        assert_eq!(compare_versions("latest", "1.0.0"), None);
        assert_eq!(compare_versions("1..0", "1.0.0"), None);
    }
}
