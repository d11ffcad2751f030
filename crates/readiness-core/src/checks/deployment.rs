// crates/readiness-core/src/checks/deployment.rs
// ============================================================================
// Module: Non-Prod Deployment Check
// Description: Verifies the release is deployed, synced, and healthy in non-prod.
// Purpose: Gate on ArgoCD application state.
// Dependencies: crate::{checks::support, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Order of evaluation:
//! 1. The application must exist.
//! 2. It must be `Synced` and running a revision that names this release.
//! 3. `Healthy` is GREEN (YELLOW when the state snapshot is stale).
//! 4. `Progressing`, `Degraded`, or `Suspended` is YELLOW while inside the
//!    degraded window and RED once the window has elapsed or the onset is
//!    unknown. Any other health is RED.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::checks::CheckInternalError;
use crate::checks::support::application_evidence;
use crate::checks::support::apply_staleness;
use crate::checks::support::describe_duration;
use crate::checks::support::staleness;
use crate::core::CheckKind;
use crate::core::CheckOutcome;
use crate::interfaces::AdapterError;
use crate::interfaces::HealthStatus;
use crate::interfaces::SyncStatus;
use crate::runtime::ExecutionContext;

// ============================================================================
// SECTION: Check
// ============================================================================

/// Non-prod deployment check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeploymentCheck;

impl DeploymentCheck {
    /// Evaluates the ArgoCD application for the release.
    ///
    /// # Errors
    ///
    /// Never fails; adapter failures become RED outcomes.
    pub async fn evaluate(
        self,
        ctx: &ExecutionContext,
    ) -> Result<CheckOutcome, CheckInternalError> {
        let kind = CheckKind::NonprodDeployment;
        let policy = ctx.policy().nonprod_deployment();
        let application = policy.params.application.as_str();
        let state =
            match ctx.fetch(kind, ctx.adapters().argocd.application(application)).await {
                Ok(state) => state,
                Err(AdapterError::NotFound(_)) => {
                    return Ok(CheckOutcome::red(
                        format!("application not found: {application}"),
                        Vec::new(),
                    ));
                }
                Err(err) => {
                    return Ok(CheckOutcome::evidence_missing(format!(
                        "argocd application {application}: {err}"
                    )));
                }
            };
        let evidence = vec![application_evidence(&state)];

        if state.sync_status != SyncStatus::Synced {
            return Ok(CheckOutcome::red(
                format!("application {application} is {}, expected Synced", state.sync_status),
                evidence,
            ));
        }
        let release = ctx.release();
        if !release.matches_revision(&state.revision) {
            return Ok(CheckOutcome::red(
                format!(
                    "deployed revision {} does not match release {}",
                    state.revision, release.version
                ),
                evidence,
            ));
        }

        let now = ctx.evaluated_at();
        let health = state.health_status;
        if health == HealthStatus::Healthy {
            let stale = staleness(
                "application state",
                now,
                state.retrieved_at,
                policy.freshness_threshold,
            );
            let summary = format!(
                "application {application} is Synced and Healthy at revision {}",
                state.revision
            );
            let outcome = CheckOutcome::green(summary, evidence);
            return Ok(apply_staleness(outcome, stale));
        }
        if !health.is_degraded() {
            return Ok(CheckOutcome::red(
                format!("application {application} health is {health}"),
                evidence,
            ));
        }
        let Some(since) = state.health_since else {
            return Ok(CheckOutcome::red(
                format!("application {application} is {health} with unknown onset"),
                evidence,
            ));
        };
        let window = policy.params.degraded_window;
        let degraded_for = now.age_of(since);
        if degraded_for <= window {
            Ok(CheckOutcome::yellow(
                format!(
                    "application {application} is {health} for {}, within allowed window {}",
                    describe_duration(degraded_for),
                    describe_duration(window)
                ),
                evidence,
            ))
        } else {
            Ok(CheckOutcome::red(
                format!(
                    "application {application} is {health} for {}, exceeding allowed window {}",
                    describe_duration(degraded_for),
                    describe_duration(window)
                ),
                evidence,
            ))
        }
    }
}
