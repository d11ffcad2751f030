// crates/readiness-config/src/config.rs
// ============================================================================
// Module: Readiness Configuration
// Description: Configuration loading and validation for readiness runs.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every check table must be present and must state `required` explicitly; the
//! loader never assumes a check is optional. Unknown keys are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "readiness.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "READINESS_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of identifiers such as job names and page ids.
pub(crate) const MAX_NAME_LENGTH: usize = 256;
/// Default evidence freshness threshold (24 hours).
pub(crate) const DEFAULT_FRESHNESS_THRESHOLD_MS: u64 = 24 * 60 * 60 * 1000;
/// Default adapter call timeout.
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Maximum adapter call timeout.
pub(crate) const MAX_TIMEOUT_MS: u64 = 300_000;
/// Maximum freshness threshold (one year).
pub(crate) const MAX_FRESHNESS_THRESHOLD_MS: u64 = 365 * 24 * 60 * 60 * 1000;
/// Default cancellation grace period.
pub(crate) const DEFAULT_GRACE_PERIOD_MS: u64 = 5_000;
/// Maximum cancellation grace period.
pub(crate) const MAX_GRACE_PERIOD_MS: u64 = 60_000;
/// Default number of concurrently evaluated checks.
pub(crate) const DEFAULT_MAX_CONCURRENCY: usize = 5;
/// Maximum number of concurrently evaluated checks.
pub(crate) const MAX_CONCURRENCY: usize = 64;
/// Default evidence root directory.
pub(crate) const DEFAULT_EVIDENCE_ROOT: &str = "evidence";
/// Default maximum size of one evidence file.
pub(crate) const DEFAULT_EVIDENCE_MAX_BYTES: usize = 1024 * 1024;
/// Maximum allowed size of one evidence file.
pub(crate) const MAX_EVIDENCE_MAX_BYTES: usize = 16 * 1024 * 1024;
/// Maximum number of certification sub-checks.
pub(crate) const MAX_SUB_CHECKS: usize = 16;
/// Default Jenkins parameter carrying the release version.
pub(crate) const DEFAULT_VERSION_PARAMETER: &str = "RELEASE_VERSION";
/// Default change-management testing task name.
pub(crate) const DEFAULT_TESTING_TASK: &str = "testing";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Readiness run configuration (`readiness.toml`).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadinessConfig {
    /// Release under evaluation.
    pub release: ReleaseConfig,
    /// Runner limits and build identity.
    #[serde(default)]
    pub run: RunConfig,
    /// Snapshot evidence location and limits.
    #[serde(default)]
    pub evidence: EvidenceConfig,
    /// Audit event output.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Per-check policy tables.
    #[serde(default)]
    pub checks: ChecksConfig,
}

impl ReadinessConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.release.validate()?;
        self.run.validate()?;
        self.evidence.validate()?;
        self.audit.validate()?;
        self.checks.validate()
    }
}

/// Release identity configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Service name.
    pub service: String,
    /// Release version.
    pub version: String,
    /// Source commit, when pinned.
    #[serde(default)]
    pub commit: Option<String>,
}

impl ReleaseConfig {
    /// Validates release identity fields.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_name("release.service", &self.service)?;
        validate_name("release.version", &self.version)?;
        if let Some(commit) = &self.commit {
            validate_name("release.commit", commit)?;
            if !commit.chars().all(|ch| ch.is_ascii_hexdigit()) {
                return Err(ConfigError::Invalid("release.commit must be hexadecimal".to_string()));
            }
        }
        Ok(())
    }
}

/// Runner configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Build identifier stamped on the report; the CLI may override it.
    #[serde(default)]
    pub build_id: Option<String>,
    /// Grace period for in-flight checks after cancellation.
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,
    /// Maximum checks evaluated concurrently.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            build_id: None,
            grace_period_ms: DEFAULT_GRACE_PERIOD_MS,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl RunConfig {
    /// Validates runner limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(build_id) = &self.build_id {
            validate_name("run.build_id", build_id)?;
        }
        if self.grace_period_ms > MAX_GRACE_PERIOD_MS {
            return Err(ConfigError::Invalid(format!(
                "run.grace_period_ms must be at most {MAX_GRACE_PERIOD_MS}"
            )));
        }
        if self.max_concurrency == 0 || self.max_concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::Invalid(format!(
                "run.max_concurrency must be between 1 and {MAX_CONCURRENCY}"
            )));
        }
        Ok(())
    }
}

/// Snapshot evidence configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvidenceConfig {
    /// Evidence root directory, relative to the working directory.
    #[serde(default = "default_evidence_root")]
    pub root: String,
    /// Maximum size of one evidence file in bytes.
    #[serde(default = "default_evidence_max_bytes")]
    pub max_bytes: usize,
    /// Whether `.yaml` snapshots are accepted alongside `.json`.
    #[serde(default = "default_true")]
    pub allow_yaml: bool,
    /// ArgoCD UI base URL used to link application evidence.
    #[serde(default)]
    pub argocd_url: Option<String>,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_EVIDENCE_ROOT.to_string(),
            max_bytes: DEFAULT_EVIDENCE_MAX_BYTES,
            allow_yaml: true,
            argocd_url: None,
        }
    }
}

impl EvidenceConfig {
    /// Validates evidence limits.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("evidence.root", &self.root)?;
        if self.max_bytes == 0 || self.max_bytes > MAX_EVIDENCE_MAX_BYTES {
            return Err(ConfigError::Invalid(format!(
                "evidence.max_bytes must be between 1 and {MAX_EVIDENCE_MAX_BYTES}"
            )));
        }
        if let Some(url) = &self.argocd_url {
            let trimmed = url.trim();
            if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
                return Err(ConfigError::Invalid(
                    "evidence.argocd_url must include http:// or https://".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Audit output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Whether audit events are emitted at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Append-only JSON-lines file; stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl AuditConfig {
    /// Validates the audit path.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Check Tables
// ============================================================================

/// Per-check tables keyed by check id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChecksConfig {
    /// `[checks.nonprod_deployment]`.
    #[serde(default)]
    pub nonprod_deployment: Option<CheckConfig<DeploymentConfig>>,
    /// `[checks.regression_test]`.
    #[serde(default)]
    pub regression_test: Option<CheckConfig<RegressionConfig>>,
    /// `[checks.certification]`.
    #[serde(default)]
    pub certification: Option<CheckConfig<CertificationConfig>>,
    /// `[checks.pre_release]`.
    #[serde(default)]
    pub pre_release: Option<CheckConfig<PreReleaseConfig>>,
    /// `[checks.change_management]`.
    #[serde(default)]
    pub change_management: Option<CheckConfig<ChangeManagementConfig>>,
}

impl ChecksConfig {
    /// Validates every check table, failing on the first missing one.
    fn validate(&self) -> Result<(), ConfigError> {
        present("nonprod_deployment", self.nonprod_deployment.as_ref())?.validate(
            "nonprod_deployment",
            |params| params.validate(),
        )?;
        present("regression_test", self.regression_test.as_ref())?
            .validate("regression_test", |params| params.validate())?;
        present("certification", self.certification.as_ref())?
            .validate("certification", |params| params.validate())?;
        present("pre_release", self.pre_release.as_ref())?
            .validate("pre_release", |params| params.validate())?;
        present("change_management", self.change_management.as_ref())?
            .validate("change_management", |params| params.validate())
    }
}

/// Fails when a check table is absent.
fn present<'a, P>(
    check: &str,
    entry: Option<&'a CheckConfig<P>>,
) -> Result<&'a CheckConfig<P>, ConfigError> {
    entry.ok_or_else(|| ConfigError::Invalid(format!("checks.{check} table is missing")))
}

/// Common fields of one `[checks.<id>]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig<P> {
    /// Whether a RED result blocks the release; must be stated.
    #[serde(default)]
    pub required: Option<bool>,
    /// Maximum evidence age before it is stale.
    #[serde(default = "default_freshness_threshold_ms")]
    pub freshness_threshold_ms: u64,
    /// Timeout for each adapter call.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Check-specific parameters.
    pub params: P,
}

impl<P> CheckConfig<P> {
    /// Validates the common fields, then the parameters.
    fn validate(
        &self,
        check: &str,
        params: impl FnOnce(&P) -> Result<(), String>,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::Invalid(format!("checks.{check}.{message}"));
        if self.required.is_none() {
            return Err(invalid("required must be set explicitly".to_string()));
        }
        if self.freshness_threshold_ms == 0
            || self.freshness_threshold_ms > MAX_FRESHNESS_THRESHOLD_MS
        {
            return Err(invalid(format!(
                "freshness_threshold_ms must be between 1 and {MAX_FRESHNESS_THRESHOLD_MS}"
            )));
        }
        if self.timeout_ms == 0 || self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(invalid(format!("timeout_ms must be between 1 and {MAX_TIMEOUT_MS}")));
        }
        params(&self.params).map_err(|message| invalid(format!("params.{message}")))
    }
}

/// Jenkins build parameter names shared by job-backed checks.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildMatchConfig {
    /// Parameter carrying the release version.
    #[serde(default = "default_version_parameter")]
    pub version_parameter: String,
    /// Parameter carrying the release commit.
    #[serde(default)]
    pub commit_parameter: Option<String>,
}

impl Default for BuildMatchConfig {
    fn default() -> Self {
        Self {
            version_parameter: DEFAULT_VERSION_PARAMETER.to_string(),
            commit_parameter: None,
        }
    }
}

impl BuildMatchConfig {
    /// Validates parameter names.
    fn validate(&self) -> Result<(), String> {
        check_name("matching.version_parameter", &self.version_parameter)?;
        if let Some(commit) = &self.commit_parameter {
            check_name("matching.commit_parameter", commit)?;
        }
        Ok(())
    }
}

/// `[checks.nonprod_deployment.params]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
    /// ArgoCD application name.
    pub application: String,
    /// How long a degraded application is tolerated as YELLOW.
    #[serde(default)]
    pub degraded_window_ms: u64,
}

impl DeploymentConfig {
    /// Validates deployment parameters.
    fn validate(&self) -> Result<(), String> {
        check_name("application", &self.application)
    }
}

/// `[checks.regression_test.params]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegressionConfig {
    /// Jenkins regression job.
    pub job: String,
    /// Build parameter matching.
    #[serde(default)]
    pub matching: BuildMatchConfig,
}

impl RegressionConfig {
    /// Validates regression parameters.
    fn validate(&self) -> Result<(), String> {
        check_name("job", &self.job)?;
        self.matching.validate()
    }
}

/// `[checks.certification.params]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CertificationConfig {
    /// Sub-checks in fold order.
    pub sub_checks: Vec<CertificationSubCheckConfig>,
    /// Build parameter matching for Jenkins-backed sub-checks.
    #[serde(default)]
    pub matching: BuildMatchConfig,
}

impl CertificationConfig {
    /// Validates certification parameters.
    fn validate(&self) -> Result<(), String> {
        if self.sub_checks.is_empty() {
            return Err("sub_checks must contain at least one entry".to_string());
        }
        if self.sub_checks.len() > MAX_SUB_CHECKS {
            return Err(format!("sub_checks must contain at most {MAX_SUB_CHECKS} entries"));
        }
        for sub_check in &self.sub_checks {
            sub_check.validate()?;
        }
        self.matching.validate()
    }
}

/// One `[[checks.certification.params.sub_checks]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CertificationSubCheckConfig {
    /// Sub-check identifier (`perf`, `chaos`, `dr`, ...).
    pub id: String,
    /// Whether a RED sub-result blocks the certification check.
    #[serde(default = "default_true")]
    pub required: bool,
    /// Jenkins job source.
    #[serde(default)]
    pub jenkins_job: Option<String>,
    /// Confluence page source.
    #[serde(default)]
    pub confluence_page: Option<String>,
}

impl CertificationSubCheckConfig {
    /// Validates the sub-check and its single source.
    fn validate(&self) -> Result<(), String> {
        check_name("sub_checks.id", &self.id)?;
        match (&self.jenkins_job, &self.confluence_page) {
            (Some(job), None) => check_name("sub_checks.jenkins_job", job),
            (None, Some(page)) => check_name("sub_checks.confluence_page", page),
            _ => Err(format!(
                "sub_checks.{} must set exactly one of jenkins_job or confluence_page",
                self.id
            )),
        }
    }
}

/// `[checks.pre_release.params]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreReleaseConfig {
    /// Helm chart sub-check.
    pub helm_chart: HelmChartConfig,
    /// Install steps sub-check.
    pub install_steps: InstallStepsConfig,
    /// Customer docs sub-check.
    pub customer_docs: CustomerDocsConfig,
    /// Build parameter matching for Jenkins-backed sub-checks.
    #[serde(default)]
    pub matching: BuildMatchConfig,
}

impl PreReleaseConfig {
    /// Validates pre-release parameters.
    fn validate(&self) -> Result<(), String> {
        check_name("helm_chart.repository", &self.helm_chart.repository)?;
        check_name("helm_chart.chart_path", &self.helm_chart.chart_path)?;
        check_name("helm_chart.lint_job", &self.helm_chart.lint_job)?;
        check_name("install_steps.page_id", &self.install_steps.page_id)?;
        let docs = &self.customer_docs;
        if let Some(repository) = &docs.repository {
            check_name("customer_docs.repository", repository)?;
        }
        if let Some(job) = &docs.docs_job {
            check_name("customer_docs.docs_job", job)?;
        }
        if docs.repository.is_some() != docs.pull_request.is_some() {
            return Err(
                "customer_docs.repository and customer_docs.pull_request must be set together"
                    .to_string(),
            );
        }
        if docs.pull_request.is_none() && docs.docs_job.is_none() {
            return Err("customer_docs needs pull_request or docs_job".to_string());
        }
        self.matching.validate()
    }
}

/// Helm chart sub-check table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HelmChartConfig {
    /// Whether the sub-check blocks the pre-release check.
    #[serde(default = "default_true")]
    pub required: bool,
    /// GitHub repository holding the chart.
    pub repository: String,
    /// Chart path inside the repository.
    pub chart_path: String,
    /// Jenkins lint/package job.
    pub lint_job: String,
}

/// Install steps sub-check table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallStepsConfig {
    /// Whether the sub-check blocks the pre-release check.
    #[serde(default = "default_true")]
    pub required: bool,
    /// Confluence page id.
    pub page_id: String,
}

/// Customer docs sub-check table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomerDocsConfig {
    /// Whether the sub-check blocks the pre-release check.
    #[serde(default = "default_true")]
    pub required: bool,
    /// GitHub docs repository.
    #[serde(default)]
    pub repository: Option<String>,
    /// Docs pull request number.
    #[serde(default)]
    pub pull_request: Option<u64>,
    /// Jenkins docs build job.
    #[serde(default)]
    pub docs_job: Option<String>,
}

/// `[checks.change_management.params]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeManagementConfig {
    /// Change reference; the CLI `--cm-ref` flag overrides it.
    #[serde(default)]
    pub reference: Option<String>,
    /// Minimum number of granted approvals.
    #[serde(default)]
    pub min_approvals: u32,
    /// Task whose completion signals testing sign-off.
    #[serde(default = "default_testing_task")]
    pub testing_task: String,
}

impl ChangeManagementConfig {
    /// Validates change-management parameters.
    fn validate(&self) -> Result<(), String> {
        if let Some(reference) = &self.reference {
            check_name("reference", reference)?;
        }
        check_name("testing_task", &self.testing_task)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Serde default for boolean flags that are on unless stated.
const fn default_true() -> bool {
    true
}

/// Serde default for `freshness_threshold_ms`.
const fn default_freshness_threshold_ms() -> u64 {
    DEFAULT_FRESHNESS_THRESHOLD_MS
}

/// Serde default for `timeout_ms`.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Serde default for `run.grace_period_ms`.
const fn default_grace_period_ms() -> u64 {
    DEFAULT_GRACE_PERIOD_MS
}

/// Serde default for `run.max_concurrency`.
const fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

/// Serde default for `evidence.root`.
fn default_evidence_root() -> String {
    DEFAULT_EVIDENCE_ROOT.to_string()
}

/// Serde default for `evidence.max_bytes`.
const fn default_evidence_max_bytes() -> usize {
    DEFAULT_EVIDENCE_MAX_BYTES
}

/// Serde default for `matching.version_parameter`.
fn default_version_parameter() -> String {
    DEFAULT_VERSION_PARAMETER.to_string()
}

/// Serde default for `testing_task`.
fn default_testing_task() -> String {
    DEFAULT_TESTING_TASK.to_string()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a top-level identifier field.
fn validate_name(field: &str, value: &str) -> Result<(), ConfigError> {
    check_name(field, value).map_err(ConfigError::Invalid)
}

/// Rejects blank or oversized identifiers.
fn check_name(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must be non-empty"));
    }
    if value.len() > MAX_NAME_LENGTH {
        return Err(format!("{field} exceeds {MAX_NAME_LENGTH} characters"));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
