// crates/readiness-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared fixtures for readiness-config integration tests.
// Purpose: Provide one complete, valid readiness.toml to mutate per test.
// =============================================================================

#![allow(
    dead_code,
    clippy::panic,
    reason = "Test helpers are selectively used across suites and assert on failure."
)]

use readiness_config::ConfigError;
use readiness_config::ReadinessConfig;

/// Complete configuration covering every check table.
pub const VALID_TOML: &str = r#"
[release]
service = "payments"
version = "2.4.0"
commit = "A1B2C3D4E5F60718293A4B5C6D7E8F9012345678"

[run]
build_id = "ci-4182"
grace_period_ms = 2000
max_concurrency = 3

[evidence]
root = "evidence"
max_bytes = 65536

[audit]
enabled = true

[checks.nonprod_deployment]
required = true
freshness_threshold_ms = 3600000
params = { application = "payments-staging", degraded_window_ms = 900000 }

[checks.regression_test]
required = true
timeout_ms = 10000
params = { job = "regression-suite" }

[checks.certification]
required = true

[[checks.certification.params.sub_checks]]
id = "perf"
jenkins_job = "perf-suite"

[[checks.certification.params.sub_checks]]
id = "chaos"
required = false
jenkins_job = "chaos-suite"

[[checks.certification.params.sub_checks]]
id = "dr"
confluence_page = "DR-1"

[checks.pre_release]
required = true

[checks.pre_release.params.helm_chart]
repository = "acme/charts"
chart_path = "charts/payments"
lint_job = "helm-lint"

[checks.pre_release.params.install_steps]
page_id = "INSTALL-1"

[checks.pre_release.params.customer_docs]
required = false
repository = "acme/docs"
pull_request = 42
docs_job = "docs-build"

[checks.change_management]
required = false
params = { reference = "CHG0001", min_approvals = 2 }
"#;

/// Parses and validates TOML text.
pub fn parse(toml_str: &str) -> Result<ReadinessConfig, ConfigError> {
    ReadinessConfig::from_toml(toml_str)
}

/// Applies a textual edit to [`VALID_TOML`] and parses the result.
pub fn parse_with(from: &str, to: &str) -> Result<ReadinessConfig, ConfigError> {
    assert!(VALID_TOML.contains(from), "fixture does not contain {from:?}");
    parse(&VALID_TOML.replacen(from, to, 1))
}

/// Asserts that parsing fails with a message containing `needle`.
pub fn assert_invalid(result: Result<ReadinessConfig, ConfigError>, needle: &str) {
    match result {
        Err(error) => {
            let message = error.to_string();
            assert!(message.contains(needle), "error '{message}' did not contain '{needle}'");
        }
        Ok(_) => panic!("expected invalid config"),
    }
}
