//! Load and structural validation tests for readiness-config.
// crates/readiness-config/tests/load_validation.rs
// =============================================================================
// Module: Load Validation Tests
// Description: File loading limits and fail-closed table validation.
// Purpose: Ensure malformed or incomplete configuration never reaches a run.
// =============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and fixtures."
)]

use std::fs;

use readiness_config::ConfigError;
use readiness_config::ReadinessConfig;

mod common;

use common::VALID_TOML;
use common::assert_invalid;
use common::parse;
use common::parse_with;

// ============================================================================
// SECTION: File Loading
// ============================================================================

#[test]
fn load_reads_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readiness.toml");
    fs::write(&path, VALID_TOML).unwrap();
    let config = ReadinessConfig::load(Some(&path)).unwrap();
    assert_eq!(config.release.service, "payments");
    assert_eq!(config.run.max_concurrency, 3);
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ReadinessConfig::load(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn load_rejects_oversized_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readiness.toml");
    let padding = format!("{VALID_TOML}\n# {}\n", "x".repeat(1024 * 1024));
    fs::write(&path, padding).unwrap();
    assert_invalid(ReadinessConfig::load(Some(&path)), "size limit");
}

#[test]
fn load_rejects_non_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readiness.toml");
    fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
    assert_invalid(ReadinessConfig::load(Some(&path)), "utf-8");
}

#[test]
fn malformed_toml_is_parse_error() {
    assert!(matches!(parse("[release"), Err(ConfigError::Parse(_))));
}

#[test]
fn unknown_keys_are_rejected() {
    let result = parse_with("[audit]\nenabled = true", "[audit]\nenabled = true\nverbose = 1");
    assert!(matches!(result, Err(ConfigError::Parse(message)) if message.contains("verbose")));
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

#[test]
fn omitted_fields_take_defaults() {
    let config = parse(VALID_TOML).unwrap();
    let deployment = config.checks.nonprod_deployment.as_ref().unwrap();
    assert_eq!(deployment.timeout_ms, 30_000);
    let regression = config.checks.regression_test.as_ref().unwrap();
    assert_eq!(regression.freshness_threshold_ms, 24 * 60 * 60 * 1000);
    assert_eq!(regression.params.matching.version_parameter, "RELEASE_VERSION");
    let change = config.checks.change_management.as_ref().unwrap();
    assert_eq!(change.params.testing_task, "testing");
    assert!(config.evidence.allow_yaml);
    assert!(config.audit.path.is_none());
}

// ============================================================================
// SECTION: Fail-Closed Checks
// ============================================================================

#[test]
fn missing_check_table_is_rejected() {
    let truncated = VALID_TOML
        .split("[checks.change_management]")
        .next()
        .unwrap()
        .to_string();
    assert_invalid(parse(&truncated), "checks.change_management table is missing");
}

#[test]
fn required_must_be_explicit() {
    let result = parse_with("[checks.pre_release]\nrequired = true\n", "[checks.pre_release]\n");
    assert_invalid(result, "checks.pre_release.required must be set explicitly");
}

#[test]
fn zero_timeout_is_rejected() {
    assert_invalid(
        parse_with("timeout_ms = 10000", "timeout_ms = 0"),
        "checks.regression_test.timeout_ms",
    );
}

#[test]
fn zero_freshness_is_rejected() {
    assert_invalid(
        parse_with("freshness_threshold_ms = 3600000", "freshness_threshold_ms = 0"),
        "freshness_threshold_ms",
    );
}

#[test]
fn blank_job_is_rejected() {
    assert_invalid(
        parse_with(r#"job = "regression-suite""#, r#"job = "  ""#),
        "checks.regression_test.params.job must be non-empty",
    );
}

#[test]
fn certification_sub_check_needs_one_source() {
    let result = parse_with(
        "id = \"dr\"\nconfluence_page = \"DR-1\"",
        "id = \"dr\"\nconfluence_page = \"DR-1\"\njenkins_job = \"dr-drill\"",
    );
    assert_invalid(result, "sub_checks.dr must set exactly one");
}

#[test]
fn customer_docs_pull_request_needs_repository() {
    let result = parse_with("repository = \"acme/docs\"\n", "");
    assert_invalid(result, "must be set together");
}

#[test]
fn concurrency_bounds_are_enforced() {
    assert_invalid(
        parse_with("max_concurrency = 3", "max_concurrency = 0"),
        "run.max_concurrency",
    );
    assert_invalid(
        parse_with("max_concurrency = 3", "max_concurrency = 65"),
        "run.max_concurrency",
    );
}

#[test]
fn commit_must_be_hex() {
    assert_invalid(
        parse_with(
            r#"commit = "A1B2C3D4E5F60718293A4B5C6D7E8F9012345678""#,
            r#"commit = "main""#,
        ),
        "release.commit must be hexadecimal",
    );
}
