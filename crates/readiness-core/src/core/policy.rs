// crates/readiness-core/src/core/policy.rs
// ============================================================================
// Module: Readiness Policy
// Description: Resolved, read-only policy for every check and sub-check.
// Purpose: Answer requiredness, freshness, timeout, and parameter lookups.
// Dependencies: crate::core::identifiers, thiserror
// ============================================================================

//! ## Overview
//! A [`Policy`] is resolved once per run and never re-read. It holds one typed
//! entry per [`CheckKind`], so lookups are total: a policy that exists is a
//! policy that covers every check. [`PolicyBuilder::build`] is the only way to
//! obtain one and fails fast when an entry is missing or malformed; the engine
//! never assumes a check is optional.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::time::Duration;

use thiserror::Error;

use crate::core::identifiers::CheckKind;
use crate::core::identifiers::SubCheckId;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default freshness threshold (24 hours).
pub const DEFAULT_FRESHNESS_THRESHOLD: Duration = Duration::from_secs(24 * 60 * 60);
/// Default per-check adapter timeout.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(30);
/// Default Jenkins parameter carrying the release version.
pub const DEFAULT_VERSION_PARAMETER: &str = "RELEASE_VERSION";
/// Default change-management task name for testing sign-off.
pub const DEFAULT_TESTING_TASK: &str = "testing";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Policy resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// A check has no policy entry.
    #[error("missing policy for check {0}")]
    MissingCheck(CheckKind),
    /// A policy entry is malformed.
    #[error("invalid policy for check {check}: {message}")]
    Invalid {
        /// Check whose entry is invalid.
        check: CheckKind,
        /// Validation failure detail.
        message: String,
    },
}

// ============================================================================
// SECTION: Shared Parameters
// ============================================================================

/// Per-check policy entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckPolicy<P> {
    /// Whether a RED result blocks the release.
    pub required: bool,
    /// Maximum evidence age before it is considered stale.
    pub freshness_threshold: Duration,
    /// Timeout applied to each adapter call made by the check.
    pub timeout: Duration,
    /// Check-specific parameters.
    pub params: P,
}

/// Policy for one sub-check of a multi-part check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCheckPolicy<S> {
    /// Sub-check identifier.
    pub id: SubCheckId,
    /// Whether a RED sub-result blocks the parent check.
    pub required: bool,
    /// Where the sub-check's evidence comes from.
    pub source: S,
}

/// Jenkins build parameters identifying builds of this release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMatch {
    /// Build parameter compared against the release version.
    pub version_parameter: String,
    /// Build parameter compared against the release commit.
    pub commit_parameter: Option<String>,
}

impl Default for BuildMatch {
    fn default() -> Self {
        Self {
            version_parameter: DEFAULT_VERSION_PARAMETER.to_string(),
            commit_parameter: None,
        }
    }
}

// ============================================================================
// SECTION: Check Parameters
// ============================================================================

/// Non-prod deployment parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentParams {
    /// ArgoCD application name.
    pub application: String,
    /// How long a degraded application is tolerated as YELLOW.
    pub degraded_window: Duration,
}

/// Regression test parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegressionParams {
    /// Jenkins job running the regression suite.
    pub job: String,
    /// Build parameter matching.
    pub matching: BuildMatch,
}

/// Evidence source for a certification sub-check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificationSource {
    /// Latest matching build of a Jenkins job.
    JenkinsJob {
        /// Jenkins job name.
        job: String,
    },
    /// Presence of a Confluence page.
    ConfluencePage {
        /// Confluence page identifier.
        page_id: String,
    },
}

/// Certification bundle parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificationParams {
    /// Sub-checks in policy-declared fold order.
    pub sub_checks: Vec<SubCheckPolicy<CertificationSource>>,
    /// Build parameter matching for Jenkins sources.
    pub matching: BuildMatch,
}

/// Helm chart sub-check source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelmChartSource {
    /// GitHub repository (`owner/name`) holding the chart.
    pub repository: String,
    /// Chart path inside the repository.
    pub chart_path: String,
    /// Jenkins job that lints and packages the chart.
    pub lint_job: String,
}

/// Release install steps sub-check source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallStepsSource {
    /// Confluence page identifier.
    pub page_id: String,
}

/// Customer docs sub-check source; at least one alternative must be set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDocsSource {
    /// GitHub repository (`owner/name`) holding the docs pull request.
    pub repository: Option<String>,
    /// Docs pull request number.
    pub pull_request: Option<u64>,
    /// Jenkins job building the docs.
    pub docs_job: Option<String>,
}

/// Pre-release readiness parameters. Sub-checks fold in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreReleaseParams {
    /// Helm chart version bump and lint evidence.
    pub helm_chart: SubCheckPolicy<HelmChartSource>,
    /// Release install steps page.
    pub install_steps: SubCheckPolicy<InstallStepsSource>,
    /// Customer-facing documentation.
    pub customer_docs: SubCheckPolicy<CustomerDocsSource>,
    /// Build parameter matching for Jenkins sources.
    pub matching: BuildMatch,
}

/// Change-management parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeManagementParams {
    /// Externally supplied change reference.
    pub reference: Option<String>,
    /// Minimum number of granted approvals.
    pub min_approvals: u32,
    /// Task name whose completion signals testing sign-off.
    pub testing_task: String,
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Resolved policy covering every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    /// Non-prod deployment policy.
    nonprod_deployment: CheckPolicy<DeploymentParams>,
    /// Regression test policy.
    regression_test: CheckPolicy<RegressionParams>,
    /// Certification bundle policy.
    certification: CheckPolicy<CertificationParams>,
    /// Pre-release readiness policy.
    pre_release: CheckPolicy<PreReleaseParams>,
    /// Change-management policy.
    change_management: CheckPolicy<ChangeManagementParams>,
}

impl Policy {
    /// Returns a builder with no entries set.
    #[must_use]
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    /// Whether a RED result for `kind` blocks the release.
    #[must_use]
    pub const fn is_required(&self, kind: CheckKind) -> bool {
        self.common(kind).0
    }

    /// Maximum evidence age for `kind`.
    #[must_use]
    pub const fn freshness_threshold(&self, kind: CheckKind) -> Duration {
        self.common(kind).1
    }

    /// Adapter call timeout for `kind`.
    #[must_use]
    pub const fn timeout(&self, kind: CheckKind) -> Duration {
        self.common(kind).2
    }

    /// Non-prod deployment entry.
    #[must_use]
    pub const fn nonprod_deployment(&self) -> &CheckPolicy<DeploymentParams> {
        &self.nonprod_deployment
    }

    /// Regression test entry.
    #[must_use]
    pub const fn regression_test(&self) -> &CheckPolicy<RegressionParams> {
        &self.regression_test
    }

    /// Certification bundle entry.
    #[must_use]
    pub const fn certification(&self) -> &CheckPolicy<CertificationParams> {
        &self.certification
    }

    /// Pre-release readiness entry.
    #[must_use]
    pub const fn pre_release(&self) -> &CheckPolicy<PreReleaseParams> {
        &self.pre_release
    }

    /// Change-management entry.
    #[must_use]
    pub const fn change_management(&self) -> &CheckPolicy<ChangeManagementParams> {
        &self.change_management
    }

    /// Returns `(required, freshness, timeout)` for a check.
    const fn common(&self, kind: CheckKind) -> (bool, Duration, Duration) {
        match kind {
            CheckKind::NonprodDeployment => common_of(&self.nonprod_deployment),
            CheckKind::RegressionTest => common_of(&self.regression_test),
            CheckKind::Certification => common_of(&self.certification),
            CheckKind::PreRelease => common_of(&self.pre_release),
            CheckKind::ChangeManagement => common_of(&self.change_management),
        }
    }
}

/// Projects the parameter-independent fields of an entry.
const fn common_of<P>(entry: &CheckPolicy<P>) -> (bool, Duration, Duration) {
    (entry.required, entry.freshness_threshold, entry.timeout)
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Collects policy entries and validates them into a [`Policy`].
#[derive(Debug, Clone, Default)]
pub struct PolicyBuilder {
    /// Non-prod deployment entry.
    nonprod_deployment: Option<CheckPolicy<DeploymentParams>>,
    /// Regression test entry.
    regression_test: Option<CheckPolicy<RegressionParams>>,
    /// Certification bundle entry.
    certification: Option<CheckPolicy<CertificationParams>>,
    /// Pre-release readiness entry.
    pre_release: Option<CheckPolicy<PreReleaseParams>>,
    /// Change-management entry.
    change_management: Option<CheckPolicy<ChangeManagementParams>>,
}

impl PolicyBuilder {
    /// Sets the non-prod deployment entry.
    #[must_use]
    pub fn nonprod_deployment(mut self, entry: CheckPolicy<DeploymentParams>) -> Self {
        self.nonprod_deployment = Some(entry);
        self
    }

    /// Sets the regression test entry.
    #[must_use]
    pub fn regression_test(mut self, entry: CheckPolicy<RegressionParams>) -> Self {
        self.regression_test = Some(entry);
        self
    }

    /// Sets the certification bundle entry.
    #[must_use]
    pub fn certification(mut self, entry: CheckPolicy<CertificationParams>) -> Self {
        self.certification = Some(entry);
        self
    }

    /// Sets the pre-release readiness entry.
    #[must_use]
    pub fn pre_release(mut self, entry: CheckPolicy<PreReleaseParams>) -> Self {
        self.pre_release = Some(entry);
        self
    }

    /// Sets the change-management entry.
    #[must_use]
    pub fn change_management(mut self, entry: CheckPolicy<ChangeManagementParams>) -> Self {
        self.change_management = Some(entry);
        self
    }

    /// Validates every entry and produces the policy.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::MissingCheck`] for the first absent entry in
    /// registration order, or [`PolicyError::Invalid`] for a malformed one.
    pub fn build(self) -> Result<Policy, PolicyError> {
        let nonprod_deployment = require(CheckKind::NonprodDeployment, self.nonprod_deployment)?;
        let regression_test = require(CheckKind::RegressionTest, self.regression_test)?;
        let certification = require(CheckKind::Certification, self.certification)?;
        let pre_release = require(CheckKind::PreRelease, self.pre_release)?;
        let change_management = require(CheckKind::ChangeManagement, self.change_management)?;
        Ok(Policy {
            nonprod_deployment,
            regression_test,
            certification,
            pre_release,
            change_management,
        })
    }
}

/// Ensures an entry is present and valid.
fn require<P: ValidateParams>(
    kind: CheckKind,
    entry: Option<CheckPolicy<P>>,
) -> Result<CheckPolicy<P>, PolicyError> {
    let entry = entry.ok_or(PolicyError::MissingCheck(kind))?;
    let invalid = |message: String| PolicyError::Invalid {
        check: kind,
        message,
    };
    if entry.timeout.is_zero() {
        return Err(invalid("timeout must be greater than zero".to_string()));
    }
    if entry.freshness_threshold.is_zero() {
        return Err(invalid("freshness threshold must be greater than zero".to_string()));
    }
    entry.params.validate().map_err(invalid)?;
    Ok(entry)
}

// ============================================================================
// SECTION: Parameter Validation
// ============================================================================

/// Structural validation of check-specific parameters.
trait ValidateParams {
    /// Returns a description of the first problem found.
    fn validate(&self) -> Result<(), String>;
}

/// Rejects blank strings.
fn non_blank(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() { Err(format!("{field} must be non-empty")) } else { Ok(()) }
}

impl ValidateParams for BuildMatch {
    fn validate(&self) -> Result<(), String> {
        non_blank("version_parameter", &self.version_parameter)?;
        if let Some(commit) = &self.commit_parameter {
            non_blank("commit_parameter", commit)?;
        }
        Ok(())
    }
}

impl ValidateParams for DeploymentParams {
    fn validate(&self) -> Result<(), String> {
        non_blank("application", &self.application)
    }
}

impl ValidateParams for RegressionParams {
    fn validate(&self) -> Result<(), String> {
        non_blank("job", &self.job)?;
        self.matching.validate()
    }
}

impl ValidateParams for CertificationParams {
    fn validate(&self) -> Result<(), String> {
        if self.sub_checks.is_empty() {
            return Err("at least one sub-check is required".to_string());
        }
        let mut seen = BTreeSet::new();
        for sub_check in &self.sub_checks {
            non_blank("sub_checks.id", sub_check.id.as_str())?;
            if !seen.insert(sub_check.id.as_str()) {
                return Err(format!("duplicate sub-check id {}", sub_check.id));
            }
            match &sub_check.source {
                CertificationSource::JenkinsJob {
                    job,
                } => non_blank("sub_checks.jenkins_job", job)?,
                CertificationSource::ConfluencePage {
                    page_id,
                } => non_blank("sub_checks.confluence_page", page_id)?,
            }
        }
        self.matching.validate()
    }
}

impl ValidateParams for PreReleaseParams {
    fn validate(&self) -> Result<(), String> {
        let chart = &self.helm_chart.source;
        non_blank("helm_chart.repository", &chart.repository)?;
        non_blank("helm_chart.chart_path", &chart.chart_path)?;
        non_blank("helm_chart.lint_job", &chart.lint_job)?;
        non_blank("install_steps.page_id", &self.install_steps.source.page_id)?;
        let docs = &self.customer_docs.source;
        match (&docs.repository, docs.pull_request) {
            (Some(repository), Some(_)) => non_blank("customer_docs.repository", repository)?,
            (None, None) => {}
            _ => {
                return Err(
                    "customer_docs.repository and customer_docs.pull_request must be set together"
                        .to_string(),
                );
            }
        }
        if let Some(job) = &docs.docs_job {
            non_blank("customer_docs.docs_job", job)?;
        }
        if docs.pull_request.is_none() && docs.docs_job.is_none() {
            return Err("customer_docs needs a pull request or a docs job".to_string());
        }
        self.matching.validate()
    }
}

impl ValidateParams for ChangeManagementParams {
    fn validate(&self) -> Result<(), String> {
        non_blank("testing_task", &self.testing_task)
    }
}
