// crates/readiness-adapters/tests/snapshot_adapters.rs
// ============================================================================
// Module: Snapshot Adapter Tests
// Description: Normalization and confinement tests for snapshot adapters.
// Purpose: Ensure exported evidence maps onto core records and stays bounded.
// ============================================================================

//! Snapshot adapter integration tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and diagnostics."
)]

mod common;

use common::EvidenceDir;
use readiness_adapters::SnapshotArgoCd;
use readiness_adapters::SnapshotChangeManagement;
use readiness_adapters::SnapshotConfig;
use readiness_adapters::SnapshotConfluence;
use readiness_adapters::SnapshotError;
use readiness_adapters::SnapshotGitHub;
use readiness_adapters::SnapshotJenkins;
use readiness_adapters::SnapshotStore;
use readiness_adapters::snapshot_adapters;
use readiness_core::AdapterError;
use readiness_core::ArgoCdAdapter;
use readiness_core::ChangeManagementAdapter;
use readiness_core::ConfluenceAdapter;
use readiness_core::GitHubAdapter;
use readiness_core::JenkinsAdapter;
use readiness_core::interfaces::BuildStatus;
use readiness_core::interfaces::HealthStatus;
use readiness_core::interfaces::SyncStatus;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn not_found(result: Result<impl std::fmt::Debug, AdapterError>, needle: &str) {
    match result {
        Err(AdapterError::NotFound(message)) => {
            assert!(message.contains(needle), "message {message:?} missing {needle:?}");
        }
        other => panic!("expected NotFound containing {needle:?}, got {other:?}"),
    }
}

fn unreadable(result: Result<impl std::fmt::Debug, AdapterError>, needle: &str) {
    match result {
        Err(AdapterError::Unreadable(message)) => {
            assert!(message.contains(needle), "message {message:?} missing {needle:?}");
        }
        other => panic!("expected Unreadable containing {needle:?}, got {other:?}"),
    }
}

fn application(name: &str) -> Value {
    json!({
        "metadata": {"name": name, "namespace": "argocd"},
        "spec": {"project": "default"},
        "status": {
            "sync": {"status": "Synced", "revision": "4f2a9c1e"},
            "health": {"status": "Healthy", "lastTransitionTime": "2025-10-09T06:00:00Z"},
            "reconciledAt": "2025-10-09T08:53:20Z"
        }
    })
}

// ============================================================================
// SECTION: ArgoCD
// ============================================================================

#[tokio::test]
async fn argocd_application_is_normalized() {
    let evidence = EvidenceDir::new();
    evidence.write_json("argocd/payments-staging.json", &application("payments-staging"));
    let adapter =
        SnapshotArgoCd::new(evidence.store(), Some("https://argocd.example.com/".to_string()));

    let state = adapter.application("payments-staging").await.unwrap();
    assert_eq!(state.name, "payments-staging");
    assert_eq!(state.sync_status, SyncStatus::Synced);
    assert_eq!(state.health_status, HealthStatus::Healthy);
    assert_eq!(state.revision, "4f2a9c1e");
    assert_eq!(state.retrieved_at.as_unix_millis(), 1_760_000_000_000);
    assert_eq!(state.health_since.map(|ts| ts.as_unix_millis()), Some(1_759_989_600_000));
    assert_eq!(
        state.url.as_deref(),
        Some("https://argocd.example.com/applications/payments-staging")
    );
}

#[tokio::test]
async fn argocd_missing_reconcile_time_falls_back_to_file_time() {
    let evidence = EvidenceDir::new();
    evidence.write_json(
        "argocd/payments-staging.json",
        &json!({
            "metadata": {"name": "payments-staging"},
            "status": {"sync": {"status": "OutOfSync"}, "health": {"status": "Degraded"}}
        }),
    );
    let adapter = SnapshotArgoCd::new(evidence.store(), None);

    let state = adapter.application("payments-staging").await.unwrap();
    assert_eq!(state.sync_status, SyncStatus::OutOfSync);
    assert_eq!(state.health_status, HealthStatus::Degraded);
    assert!(state.health_since.is_none());
    assert!(state.revision.is_empty());
    assert!(state.url.is_none());
    assert!(state.retrieved_at.as_unix_millis() > 1_700_000_000_000);
}

#[tokio::test]
async fn argocd_name_mismatch_is_not_found() {
    let evidence = EvidenceDir::new();
    evidence.write_json("argocd/payments-staging.json", &application("payments-prod"));
    let adapter = SnapshotArgoCd::new(evidence.store(), None);
    not_found(adapter.application("payments-staging").await, "describes application payments-prod");
}

#[tokio::test]
async fn argocd_malformed_export_is_unreadable_not_missing() {
    let evidence = EvidenceDir::new();
    evidence.write("argocd/payments-staging.json", "{\"metadata\": {\"name\": ");
    let adapter = SnapshotArgoCd::new(evidence.store(), None);
    let result = adapter.application("payments-staging").await;
    let Err(err) = &result else { panic!("malformed export parsed: {result:?}") };
    assert_eq!(err.kind(), "unreadable");
    assert!(!err.to_string().contains("not found"), "{err}");
    unreadable(result, "argocd/payments-staging.json");
}

#[tokio::test]
async fn argocd_yaml_export_is_accepted_when_allowed() {
    let evidence = EvidenceDir::new();
    evidence.write(
        "argocd/payments-staging.yaml",
        "metadata:\n  name: payments-staging\nstatus:\n  sync:\n    status: Synced\n    revision: \
         abc\n  reconciledAt: \"2025-10-09T08:53:20Z\"\n",
    );
    let adapter = SnapshotArgoCd::new(evidence.store(), None);
    let state = adapter.application("payments-staging").await.unwrap();
    assert_eq!(state.revision, "abc");
    assert_eq!(state.health_status, HealthStatus::Unknown);

    let mut config = evidence.config();
    config.allow_yaml = false;
    let strict = SnapshotArgoCd::new(SnapshotStore::open(&config).unwrap(), None);
    not_found(
        strict.application("payments-staging").await,
        "no snapshot for argocd/payments-staging",
    );
}

// ============================================================================
// SECTION: Jenkins
// ============================================================================

#[tokio::test]
async fn jenkins_builds_are_normalized() {
    let evidence = EvidenceDir::new();
    evidence.write_json(
        "jenkins/qa/regression-suite.json",
        &json!({
            "_class": "hudson.model.FreeStyleProject",
            "builds": [
                {
                    "number": 12,
                    "result": null,
                    "building": true,
                    "timestamp": 1_760_000_100_000_i64,
                    "actions": []
                },
                {
                    "number": 11,
                    "result": "SUCCESS",
                    "building": false,
                    "timestamp": 1_760_000_000_000_i64,
                    "url": "https://jenkins.example.com/job/qa/job/regression-suite/11/",
                    "actions": [
                        {"_class": "hudson.model.CauseAction"},
                        {"parameters": [{"name": "RELEASE_VERSION", "value": "2.4.0"}]}
                    ]
                }
            ]
        }),
    );
    let adapter = SnapshotJenkins::new(evidence.store());

    let builds = adapter.builds("qa/regression-suite").await.unwrap();
    assert_eq!(builds.len(), 2);
    assert_eq!(builds[0].status, BuildStatus::InProgress);
    assert_eq!(builds[1].number, 11);
    assert_eq!(builds[1].status, BuildStatus::Success);
    assert_eq!(builds[1].job, "qa/regression-suite");
    assert_eq!(builds[1].timestamp.as_unix_millis(), 1_760_000_000_000);
    assert_eq!(builds[1].parameters.get("RELEASE_VERSION").map(String::as_str), Some("2.4.0"));
}

#[tokio::test]
async fn jenkins_malformed_export_is_unreadable() {
    let evidence = EvidenceDir::new();
    evidence.write("jenkins/regression.json", "{\"builds\": [{\"number\": \"eleven\"}]}");
    let adapter = SnapshotJenkins::new(evidence.store());
    unreadable(adapter.builds("regression").await, "invalid");
}

// ============================================================================
// SECTION: Confluence
// ============================================================================

#[tokio::test]
async fn confluence_page_is_normalized() {
    let evidence = EvidenceDir::new();
    evidence.write_json(
        "confluence/884211.json",
        &json!({
            "id": "884211",
            "type": "page",
            "title": "Payments 2.4 install steps",
            "version": {"number": 14, "when": "2025-10-09T08:53:20.000Z"},
            "_links": {"base": "https://wiki.example.com/", "webui": "/spaces/PAY/pages/884211"}
        }),
    );
    let adapter = SnapshotConfluence::new(evidence.store());

    let page = adapter.page("884211").await.unwrap();
    assert_eq!(page.title, "Payments 2.4 install steps");
    assert_eq!(page.updated_at.as_unix_millis(), 1_760_000_000_000);
    assert_eq!(page.url.as_deref(), Some("https://wiki.example.com/spaces/PAY/pages/884211"));
}

#[tokio::test]
async fn confluence_invalid_version_time_is_unreadable() {
    let evidence = EvidenceDir::new();
    evidence.write_json(
        "confluence/884211.json",
        &json!({"id": "884211", "title": "Install", "version": {"when": "last tuesday"}}),
    );
    let adapter = SnapshotConfluence::new(evidence.store());
    unreadable(adapter.page("884211").await, "version.when");
}

// ============================================================================
// SECTION: GitHub
// ============================================================================

#[tokio::test]
async fn github_pull_request_merge_state_is_normalized() {
    let evidence = EvidenceDir::new();
    evidence.write_json(
        "github/acme/payments-docs/pulls/311.json",
        &json!({
            "number": 311,
            "state": "closed",
            "merged_at": "2025-10-09T08:53:20Z",
            "html_url": "https://github.com/acme/payments-docs/pull/311"
        }),
    );
    evidence.write_json(
        "github/acme/payments-docs/pulls/312.json",
        &json!({"number": 312, "state": "open", "merged": false, "merged_at": null}),
    );
    let adapter = SnapshotGitHub::new(evidence.store());

    let merged = adapter.pull_request("acme/payments-docs", 311).await.unwrap();
    assert!(merged.merged);
    assert_eq!(merged.merged_at.map(|ts| ts.as_unix_millis()), Some(1_760_000_000_000));

    let open = adapter.pull_request("acme/payments-docs", 312).await.unwrap();
    assert!(!open.merged);
    assert!(open.merged_at.is_none());
}

#[tokio::test]
async fn github_chart_reads_current_and_previous_versions() {
    let evidence = EvidenceDir::new();
    evidence.write(
        "github/acme/payments/charts/payments/Chart.yaml",
        "apiVersion: v2\nname: payments\nversion: 1.5.0\n",
    );
    evidence.write(
        "github/acme/payments/charts/payments/Chart.previous.yaml",
        "apiVersion: v2\nname: payments\nversion: 1.4.2\n",
    );
    let adapter = SnapshotGitHub::new(evidence.store());

    let chart = adapter.chart("acme/payments", "charts/payments", "v2.4.0").await.unwrap();
    assert_eq!(chart.version, "1.5.0");
    assert_eq!(chart.previous_version.as_deref(), Some("1.4.2"));
    assert_eq!(
        chart.url.as_deref(),
        Some("https://github.com/acme/payments/blob/v2.4.0/charts/payments/Chart.yaml")
    );
}

#[tokio::test]
async fn github_chart_without_previous_release_has_no_previous_version() {
    let evidence = EvidenceDir::new();
    evidence.write("github/acme/payments/chart/Chart.yaml", "version: 0.1.0\n");
    let adapter = SnapshotGitHub::new(evidence.store());

    let chart = adapter.chart("acme/payments", "chart", "main").await.unwrap();
    assert_eq!(chart.version, "0.1.0");
    assert!(chart.previous_version.is_none());
}

#[tokio::test]
async fn github_missing_chart_names_the_reference() {
    let evidence = EvidenceDir::new();
    let adapter = SnapshotGitHub::new(evidence.store());
    not_found(adapter.chart("acme/payments", "chart", "v2.4.0").await, "chart at v2.4.0");
}

// ============================================================================
// SECTION: Change Management
// ============================================================================

#[tokio::test]
async fn change_management_export_is_returned_raw() {
    let evidence = EvidenceDir::new();
    evidence.write("change_management/CHG0042.json", "{not json at all");
    let adapter = SnapshotChangeManagement::new(evidence.store());

    let export = adapter.export("CHG0042").await.unwrap();
    assert_eq!(export.reference, "CHG0042");
    assert_eq!(export.bytes, b"{not json at all");
    assert!(export.location.ends_with("CHG0042.json"));
}

#[tokio::test]
async fn change_management_missing_export_is_not_found() {
    let evidence = EvidenceDir::new();
    let adapter = SnapshotChangeManagement::new(evidence.store());
    not_found(adapter.export("CHG0042").await, "no snapshot");
}

// ============================================================================
// SECTION: Confinement and Limits
// ============================================================================

#[tokio::test]
async fn traversal_segments_are_rejected() {
    let evidence = EvidenceDir::new();
    let adapter = SnapshotJenkins::new(evidence.store());
    unreadable(adapter.builds("../outside").await, "rejected evidence path");
    unreadable(adapter.builds("/etc/passwd").await, "rejected evidence path");
}

#[cfg(unix)]
#[tokio::test]
async fn symlinks_leaving_the_root_are_rejected() {
    let outside = tempfile::tempdir().unwrap();
    std::fs::write(outside.path().join("secret.json"), "{\"builds\": []}").unwrap();
    let evidence = EvidenceDir::new();
    std::fs::create_dir_all(evidence.path().join("jenkins")).unwrap();
    std::os::unix::fs::symlink(
        outside.path().join("secret.json"),
        evidence.path().join("jenkins/regression.json"),
    )
    .unwrap();

    let adapter = SnapshotJenkins::new(evidence.store());
    unreadable(adapter.builds("regression").await, "escapes evidence root");
}

#[test]
fn oversized_documents_are_rejected() {
    let evidence = EvidenceDir::new();
    evidence.write("confluence/1.json", &format!("{{\"pad\": \"{}\"}}", "x".repeat(256)));
    let mut config = evidence.config();
    config.max_bytes = 128;
    let store = SnapshotStore::open(&config).unwrap();

    let err = store.load::<Value>(&["confluence", "1"]).unwrap_err();
    assert!(matches!(err, SnapshotError::TooLarge(_)), "unexpected error {err:?}");
}

#[test]
fn json_wins_over_yaml() {
    let evidence = EvidenceDir::new();
    evidence.write("jenkins/job.json", "{\"source\": \"json\"}");
    evidence.write("jenkins/job.yaml", "source: yaml\n");

    let snapshot = evidence.store().load::<Value>(&["jenkins", "job"]).unwrap();
    assert_eq!(snapshot.document["source"], "json");
    assert!(snapshot.modified_at.is_some());
}

#[test]
fn missing_root_is_rejected() {
    let evidence = EvidenceDir::new();
    let config = SnapshotConfig::new(evidence.path().join("absent"));
    let err = SnapshotStore::open(&config).unwrap_err();
    assert!(matches!(err, SnapshotError::Root(_)), "unexpected error {err:?}");
    assert!(snapshot_adapters(&config, None).is_err());
}

#[tokio::test]
async fn snapshot_adapters_share_one_root() {
    let evidence = EvidenceDir::new();
    evidence.write_json("argocd/payments-staging.json", &application("payments-staging"));
    evidence.write_json("jenkins/regression.json", &json!({"builds": []}));

    let adapters = snapshot_adapters(&evidence.config(), None).unwrap();
    assert!(adapters.argocd.application("payments-staging").await.is_ok());
    assert!(adapters.jenkins.builds("regression").await.unwrap().is_empty());
    assert!(adapters.confluence.page("1").await.is_err());
}
