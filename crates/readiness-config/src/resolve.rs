// crates/readiness-config/src/resolve.rs
// ============================================================================
// Module: Policy Resolution
// Description: Converts validated configuration into core runtime values.
// Purpose: Resolve policy once, before any check runs.
// Dependencies: readiness-core
// ============================================================================

//! ## Overview
//! The runner never reads configuration. Everything it needs is resolved here
//! into immutable core values: the [`Policy`], the [`ReleaseIdentity`], and the
//! [`RunnerConfig`]. Core policy validation runs again on the resolved entries
//! and its failures surface as [`ConfigError::Invalid`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use readiness_core::BuildMatch;
use readiness_core::CertificationParams;
use readiness_core::CertificationSource;
use readiness_core::ChangeManagementParams;
use readiness_core::CheckPolicy;
use readiness_core::CustomerDocsSource;
use readiness_core::DeploymentParams;
use readiness_core::HelmChartSource;
use readiness_core::InstallStepsSource;
use readiness_core::Policy;
use readiness_core::PreReleaseParams;
use readiness_core::RegressionParams;
use readiness_core::ReleaseIdentity;
use readiness_core::RunnerConfig;
use readiness_core::SubCheckId;
use readiness_core::SubCheckPolicy;

use crate::config::BuildMatchConfig;
use crate::config::CertificationConfig;
use crate::config::ChangeManagementConfig;
use crate::config::CheckConfig;
use crate::config::ConfigError;
use crate::config::DeploymentConfig;
use crate::config::PreReleaseConfig;
use crate::config::ReadinessConfig;
use crate::config::RegressionConfig;

// ============================================================================
// SECTION: Resolution
// ============================================================================

impl ReadinessConfig {
    /// Release identity under evaluation.
    #[must_use]
    pub fn release_identity(&self) -> ReleaseIdentity {
        ReleaseIdentity {
            service: self.release.service.trim().to_string(),
            version: self.release.version.trim().to_string(),
            commit: self.release.commit.as_ref().map(|commit| commit.trim().to_ascii_lowercase()),
        }
    }

    /// Runner limits.
    #[must_use]
    pub const fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            grace_period: Duration::from_millis(self.run.grace_period_ms),
            max_concurrency: self.run.max_concurrency,
        }
    }

    /// Resolves the policy, optionally overriding the change reference.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a check table is missing or the
    /// resolved entries fail policy validation.
    pub fn policy(&self, change_reference: Option<&str>) -> Result<Policy, ConfigError> {
        let checks = &self.checks;
        let missing =
            |check: &str| ConfigError::Invalid(format!("checks.{check} table is missing"));
        let deployment = checks
            .nonprod_deployment
            .as_ref()
            .ok_or_else(|| missing("nonprod_deployment"))?;
        let regression =
            checks.regression_test.as_ref().ok_or_else(|| missing("regression_test"))?;
        let certification =
            checks.certification.as_ref().ok_or_else(|| missing("certification"))?;
        let pre_release = checks.pre_release.as_ref().ok_or_else(|| missing("pre_release"))?;
        let change_management =
            checks.change_management.as_ref().ok_or_else(|| missing("change_management"))?;

        Policy::builder()
            .nonprod_deployment(entry(deployment, deployment_params)?)
            .regression_test(entry(regression, regression_params)?)
            .certification(entry(certification, certification_params)?)
            .pre_release(entry(pre_release, pre_release_params)?)
            .change_management(entry(change_management, |params| {
                change_management_params(params, change_reference)
            })?)
            .build()
            .map_err(|err| ConfigError::Invalid(err.to_string()))
    }
}

/// Resolves the common fields of a check table.
fn entry<C, P>(
    config: &CheckConfig<C>,
    params: impl FnOnce(&C) -> P,
) -> Result<CheckPolicy<P>, ConfigError> {
    let required = config.required.ok_or_else(|| {
        ConfigError::Invalid("every check must set required explicitly".to_string())
    })?;
    Ok(CheckPolicy {
        required,
        freshness_threshold: Duration::from_millis(config.freshness_threshold_ms),
        timeout: Duration::from_millis(config.timeout_ms),
        params: params(&config.params),
    })
}

/// Resolves build parameter names.
fn matching(config: &BuildMatchConfig) -> BuildMatch {
    BuildMatch {
        version_parameter: config.version_parameter.clone(),
        commit_parameter: config.commit_parameter.clone(),
    }
}

/// Resolves deployment parameters.
fn deployment_params(config: &DeploymentConfig) -> DeploymentParams {
    DeploymentParams {
        application: config.application.clone(),
        degraded_window: Duration::from_millis(config.degraded_window_ms),
    }
}

/// Resolves regression parameters.
fn regression_params(config: &RegressionConfig) -> RegressionParams {
    RegressionParams {
        job: config.job.clone(),
        matching: matching(&config.matching),
    }
}

/// Resolves certification sub-checks in declared order.
fn certification_params(config: &CertificationConfig) -> CertificationParams {
    let sub_checks = config
        .sub_checks
        .iter()
        .map(|sub_check| {
            let source = match (&sub_check.jenkins_job, &sub_check.confluence_page) {
                (Some(job), _) => CertificationSource::JenkinsJob {
                    job: job.clone(),
                },
                (None, page) => CertificationSource::ConfluencePage {
                    page_id: page.clone().unwrap_or_default(),
                },
            };
            SubCheckPolicy {
                id: SubCheckId::new(sub_check.id.trim()),
                required: sub_check.required,
                source,
            }
        })
        .collect();
    CertificationParams {
        sub_checks,
        matching: matching(&config.matching),
    }
}

/// Resolves pre-release sub-checks.
fn pre_release_params(config: &PreReleaseConfig) -> PreReleaseParams {
    let chart = &config.helm_chart;
    let install = &config.install_steps;
    let docs = &config.customer_docs;
    PreReleaseParams {
        helm_chart: SubCheckPolicy {
            id: SubCheckId::new("helm_chart"),
            required: chart.required,
            source: HelmChartSource {
                repository: chart.repository.clone(),
                chart_path: chart.chart_path.clone(),
                lint_job: chart.lint_job.clone(),
            },
        },
        install_steps: SubCheckPolicy {
            id: SubCheckId::new("install_steps"),
            required: install.required,
            source: InstallStepsSource {
                page_id: install.page_id.clone(),
            },
        },
        customer_docs: SubCheckPolicy {
            id: SubCheckId::new("customer_docs"),
            required: docs.required,
            source: CustomerDocsSource {
                repository: docs.repository.clone(),
                pull_request: docs.pull_request,
                docs_job: docs.docs_job.clone(),
            },
        },
        matching: matching(&config.matching),
    }
}

/// Resolves change-management parameters; a non-blank override wins.
fn change_management_params(
    config: &ChangeManagementConfig,
    override_reference: Option<&str>,
) -> ChangeManagementParams {
    let reference = override_reference
        .map(str::trim)
        .filter(|reference| !reference.is_empty())
        .map(str::to_string)
        .or_else(|| config.reference.clone());
    ChangeManagementParams {
        reference,
        min_approvals: config.min_approvals,
        testing_task: config.testing_task.clone(),
    }
}
