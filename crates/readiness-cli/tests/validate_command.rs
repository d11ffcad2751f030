// crates/readiness-cli/tests/validate_command.rs
// ============================================================================
// Module: CLI Validate Command Tests
// Description: End-to-end tests for `readiness validate` and `config check`.
// Purpose: Ensure exit codes, report files, and audit lines follow the verdict.
// Dependencies: readiness binary, tempfile, time
// ============================================================================
//! ## Overview
//! Each test lays out an exported evidence tree and a `readiness.toml` in a
//! temporary directory, runs the binary, and inspects its exit code and the
//! files it wrote.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;
use std::time::Duration;

use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Fixture
// ============================================================================

const COMMIT: &str = "4f2a9c1e7b3d5a6c8e9f0a1b2c3d4e5f60718293";

fn readiness_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_readiness"))
}

fn unix_millis_ago(age: Duration) -> i64 {
    let instant = OffsetDateTime::now_utc() - age;
    i64::try_from(instant.unix_timestamp_nanos() / 1_000_000).unwrap()
}

fn rfc3339_now() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap()
}

fn jenkins_job(age: Duration, result: &str) -> Value {
    json!({
        "builds": [{
            "number": 11,
            "result": result,
            "building": false,
            "timestamp": unix_millis_ago(age),
            "actions": [{"parameters": [{"name": "RELEASE_VERSION", "value": "2.4.0"}]}]
        }]
    })
}

/// Temporary workspace with a GREEN evidence tree and config.
struct Workspace {
    /// Backing directory.
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let workspace = Self {
            dir: tempfile::tempdir().expect("workspace tempdir"),
        };
        workspace.write_green_evidence();
        workspace.write_config(&workspace.config_text());
        workspace
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn evidence(&self) -> PathBuf {
        self.root().join("evidence")
    }

    fn out(&self) -> PathBuf {
        self.root().join("out")
    }

    fn config_path(&self) -> PathBuf {
        self.root().join("readiness.toml")
    }

    fn audit_path(&self) -> PathBuf {
        self.root().join("audit.jsonl")
    }

    fn write(&self, relative: &str, contents: &str) {
        let path = self.evidence().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn write_json(&self, relative: &str, value: &Value) {
        self.write(relative, &value.to_string());
    }

    fn write_config(&self, text: &str) {
        fs::write(self.config_path(), text).unwrap();
    }

    fn write_green_evidence(&self) {
        self.write_json(
            "argocd/payments-staging.json",
            &json!({
                "metadata": {"name": "payments-staging"},
                "status": {
                    "sync": {"status": "Synced", "revision": COMMIT},
                    "health": {"status": "Healthy"}
                }
            }),
        );
        let hour = Duration::from_secs(3600);
        self.write_json("jenkins/regression-suite.json", &jenkins_job(hour, "SUCCESS"));
        self.write_json("jenkins/perf-suite.json", &jenkins_job(hour, "SUCCESS"));
        self.write_json("jenkins/helm-lint.json", &jenkins_job(hour, "SUCCESS"));
        for page in ["DR-1", "INSTALL-1"] {
            self.write_json(
                &format!("confluence/{page}.json"),
                &json!({"id": page, "title": page, "version": {"when": rfc3339_now()}}),
            );
        }
        self.write("github/acme/charts/charts/payments/Chart.yaml", "version: 1.5.0\n");
        self.write("github/acme/charts/charts/payments/Chart.previous.yaml", "version: 1.4.2\n");
        self.write_json(
            "github/acme/docs/pulls/42.json",
            &json!({"number": 42, "merged": true, "merged_at": rfc3339_now()}),
        );
        self.write_json(
            "change_management/CHG0001.json",
            &json!({
                "change_id": "CHG0001",
                "state": "scheduled",
                "approvals": [
                    {"approver": "release-board", "state": "approved"},
                    {"approver": "sre-lead", "state": "approved"}
                ],
                "tasks": [{"name": "testing", "state": "complete"}]
            }),
        );
    }

    fn config_text(&self) -> String {
        format!(
            r#"
[release]
service = "payments"
version = "2.4.0"
commit = "{COMMIT}"

[run]
build_id = "ci-4182"
grace_period_ms = 1000

[evidence]
root = '{evidence}'

[audit]
path = '{audit}'

[checks.nonprod_deployment]
required = true
params = {{ application = "payments-staging" }}

[checks.regression_test]
required = true
params = {{ job = "regression-suite" }}

[checks.certification]
required = true

[[checks.certification.params.sub_checks]]
id = "perf"
jenkins_job = "perf-suite"

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
repository = "acme/docs"
pull_request = 42

[checks.change_management]
required = true
params = {{ reference = "CHG0001", min_approvals = 2 }}
"#,
            evidence = self.evidence().display(),
            audit = self.audit_path().display(),
        )
    }

    fn run(&self, extra: &[&str]) -> Output {
        let config = self.config_path();
        let out = self.out();
        let mut args = vec![
            "validate",
            "--config",
            config.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
        ];
        args.extend_from_slice(extra);
        Command::new(readiness_bin())
            .args(&args)
            .env_remove("READINESS_LANG")
            .output()
            .expect("run readiness validate")
    }

    fn report(&self) -> Value {
        let bytes = fs::read(self.out().join("readiness-report.json")).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn audit_events(&self) -> Vec<String> {
        fs::read_to_string(self.audit_path())
            .unwrap()
            .lines()
            .map(|line| {
                let event: Value = serde_json::from_str(line).unwrap();
                event["event"].as_str().unwrap().to_string()
            })
            .collect()
    }
}

fn describe(output: &Output) -> String {
    format!(
        "status {:?}\nstdout:\n{}\nstderr:\n{}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn green_release_exits_zero_and_writes_reports() {
    let workspace = Workspace::new();
    let output = workspace.run(&[]);
    assert_eq!(output.status.code(), Some(0), "{}", describe(&output));

    let report = workspace.report();
    assert_eq!(report["overall_status"], "GREEN");
    assert_eq!(report["build_id"], "ci-4182");
    assert_eq!(report["complete"], true);
    assert_eq!(report["checks"].as_array().unwrap().len(), 5);
    assert_eq!(report["release"]["commit"], COMMIT);
    assert!(workspace.out().join("readiness-report.json.sha256").is_file());
    assert!(workspace.out().join("readiness-summary.md").is_file());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("GREEN: payments 2.4.0 (0 red, 0 yellow, 5 green)"), "{stdout}");
}

#[test]
fn audit_log_brackets_the_run() {
    let workspace = Workspace::new();
    let output = workspace.run(&[]);
    assert_eq!(output.status.code(), Some(0), "{}", describe(&output));

    let events = workspace.audit_events();
    assert_eq!(events.first().map(String::as_str), Some("run_started"));
    assert_eq!(events.iter().filter(|event| *event == "check_completed").count(), 5);
    let completed = events.iter().position(|event| event == "run_completed").unwrap();
    let written: Vec<_> =
        events.iter().enumerate().filter(|(_, event)| *event == "report_written").collect();
    assert_eq!(written.len(), 2);
    assert!(written.iter().all(|(index, _)| *index > completed));
}

#[test]
fn stale_regression_exits_yellow() {
    let workspace = Workspace::new();
    workspace.write_json(
        "jenkins/regression-suite.json",
        &jenkins_job(Duration::from_secs(30 * 3600), "SUCCESS"),
    );
    let output = workspace.run(&[]);
    assert_eq!(output.status.code(), Some(1), "{}", describe(&output));

    let report = workspace.report();
    assert_eq!(report["overall_status"], "YELLOW");
    assert_eq!(report["blocking"], json!(["regression_test"]));
}

#[test]
fn out_of_sync_deployment_exits_red() {
    let workspace = Workspace::new();
    workspace.write_json(
        "argocd/payments-staging.json",
        &json!({
            "metadata": {"name": "payments-staging"},
            "status": {"sync": {"status": "OutOfSync", "revision": COMMIT}, "health": {"status": "Healthy"}}
        }),
    );
    let output = workspace.run(&[]);
    assert_eq!(output.status.code(), Some(2), "{}", describe(&output));
    assert_eq!(workspace.report()["overall_status"], "RED");
}

#[test]
fn cli_overrides_build_id_and_change_reference() {
    let workspace = Workspace::new();
    let output = workspace.run(&["--build-id", "ci-9000", "--cm-ref", "CHG0404"]);
    assert_eq!(output.status.code(), Some(2), "{}", describe(&output));

    let report = workspace.report();
    assert_eq!(report["build_id"], "ci-9000");
    let change = report["checks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|check| check["id"] == "change_management")
        .unwrap();
    assert_eq!(change["status"], "RED");
    assert!(change["reasons"][0].as_str().unwrap().contains("CHG0404"));
}

#[test]
fn invalid_config_exits_tool_failure_without_report() {
    let workspace = Workspace::new();
    let text = workspace.config_text().replace("[checks.change_management]", "[checks.unknown]");
    workspace.write_config(&text);

    let output = workspace.run(&[]);
    assert_eq!(output.status.code(), Some(3), "{}", describe(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load config"));
    assert!(!workspace.out().join("readiness-report.json").exists());
}

#[test]
fn missing_evidence_root_exits_tool_failure() {
    let workspace = Workspace::new();
    fs::remove_dir_all(workspace.evidence()).unwrap();

    let output = workspace.run(&[]);
    assert_eq!(output.status.code(), Some(3), "{}", describe(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to open evidence root"));
}

#[test]
fn usage_errors_exit_tool_failure() {
    let output = Command::new(readiness_bin()).args(["validate"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3), "{}", describe(&output));
}

#[test]
fn config_check_reports_required_checks() {
    let workspace = Workspace::new();
    let output = Command::new(readiness_bin())
        .args(["config", "check", "--config", workspace.config_path().to_str().unwrap()])
        .env_remove("READINESS_LANG")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "{}", describe(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Config OK: payments 2.4.0, 5 checks (5 required)."), "{stdout}");
}

#[test]
fn catalan_output_carries_disclaimer() {
    let workspace = Workspace::new();
    let output = Command::new(readiness_bin())
        .args(["--lang", "ca", "config", "check", "--config"])
        .arg(workspace.config_path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "{}", describe(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("traduïda automàticament"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Configuració correcta"));
}
