// crates/readiness-core/src/checks/mod.rs
// ============================================================================
// Module: Readiness Checks
// Description: Closed set of release readiness checks and their registry.
// Purpose: Map each check kind to its decision function.
// Dependencies: crate::{core, runtime}, thiserror
// ============================================================================

//! ## Overview
//! Each check is a pure async function of the shared
//! [`ExecutionContext`](crate::runtime::ExecutionContext): it reads adapters,
//! decides a [`CheckOutcome`], and never touches another check's state. The
//! set is closed, so dispatch is a `match` over [`Check`] rather than a trait
//! object. Within a check, evaluation is ordered existence, then correctness,
//! then freshness: missing evidence is RED, wrong evidence is RED, old evidence
//! is YELLOW.
//!
//! Adapter failures are never errors here. They are recovered locally as
//! missing evidence. [`CheckInternalError`] is reserved for defects inside the
//! check itself.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod certification;
pub mod change_management;
pub mod deployment;
pub mod pre_release;
pub mod regression;
pub mod support;

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

pub use certification::CertificationCheck;
pub use change_management::ChangeManagementCheck;
pub use deployment::DeploymentCheck;
pub use pre_release::PreReleaseCheck;
pub use regression::RegressionCheck;

use crate::core::CheckKind;
use crate::core::CheckOutcome;
use crate::runtime::ExecutionContext;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Defect inside a check's own logic. The runner converts it to a RED result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CheckInternalError(pub String);

// ============================================================================
// SECTION: Check
// ============================================================================

/// One registered readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Non-prod deployment health.
    NonprodDeployment(DeploymentCheck),
    /// Regression suite result.
    RegressionTest(RegressionCheck),
    /// Certification bundle.
    Certification(CertificationCheck),
    /// Pre-release readiness bundle.
    PreRelease(PreReleaseCheck),
    /// Change-management record.
    ChangeManagement(ChangeManagementCheck),
}

impl Check {
    /// Returns the check for `kind`.
    #[must_use]
    pub const fn for_kind(kind: CheckKind) -> Self {
        match kind {
            CheckKind::NonprodDeployment => Self::NonprodDeployment(DeploymentCheck),
            CheckKind::RegressionTest => Self::RegressionTest(RegressionCheck),
            CheckKind::Certification => Self::Certification(CertificationCheck),
            CheckKind::PreRelease => Self::PreRelease(PreReleaseCheck),
            CheckKind::ChangeManagement => Self::ChangeManagement(ChangeManagementCheck),
        }
    }

    /// Kind of this check.
    #[must_use]
    pub const fn kind(self) -> CheckKind {
        match self {
            Self::NonprodDeployment(_) => CheckKind::NonprodDeployment,
            Self::RegressionTest(_) => CheckKind::RegressionTest,
            Self::Certification(_) => CheckKind::Certification,
            Self::PreRelease(_) => CheckKind::PreRelease,
            Self::ChangeManagement(_) => CheckKind::ChangeManagement,
        }
    }

    /// Evaluates the check against `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckInternalError`] only for defects in the check itself.
    pub async fn run(self, ctx: &ExecutionContext) -> Result<CheckOutcome, CheckInternalError> {
        match self {
            Self::NonprodDeployment(check) => check.evaluate(ctx).await,
            Self::RegressionTest(check) => check.evaluate(ctx).await,
            Self::Certification(check) => check.evaluate(ctx).await,
            Self::PreRelease(check) => check.evaluate(ctx).await,
            Self::ChangeManagement(check) => check.evaluate(ctx).await,
        }
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Ordered list of checks a run evaluates. Order is report order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRegistry {
    /// Registered checks in report order.
    checks: Vec<Check>,
}

impl CheckRegistry {
    /// Registry of every check in canonical order.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            checks: CheckKind::ALL.into_iter().map(Check::for_kind).collect(),
        }
    }

    /// Registry of an explicit subset, deduplicated, in the order given.
    #[must_use]
    pub fn with_kinds(kinds: &[CheckKind]) -> Self {
        let mut checks: Vec<Check> = Vec::with_capacity(kinds.len());
        for kind in kinds {
            if !checks.iter().any(|check| check.kind() == *kind) {
                checks.push(Check::for_kind(*kind));
            }
        }
        Self {
            checks,
        }
    }

    /// Registered checks in report order.
    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether no checks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
