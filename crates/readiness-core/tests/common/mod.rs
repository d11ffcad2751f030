// crates/readiness-core/tests/common/mod.rs
// ============================================================================
// Module: Readiness Core Test Fixtures
// Description: In-memory adapters, policies, and contexts for integration tests.
// Purpose: Build deterministic readiness runs without external systems.
// ============================================================================

#![allow(
    dead_code,
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Shared fixtures are used selectively by each test binary."
)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use readiness_core::AdapterError;
use readiness_core::Adapters;
use readiness_core::ArgoCdAdapter;
use readiness_core::AuditEvent;
use readiness_core::AuditSink;
use readiness_core::BuildId;
use readiness_core::BuildMatch;
use readiness_core::CertificationParams;
use readiness_core::CertificationSource;
use readiness_core::ChangeManagementAdapter;
use readiness_core::ChangeManagementParams;
use readiness_core::CheckPolicy;
use readiness_core::CheckRegistry;
use readiness_core::ConfluenceAdapter;
use readiness_core::CustomerDocsSource;
use readiness_core::DeploymentParams;
use readiness_core::ExecutionContext;
use readiness_core::GitHubAdapter;
use readiness_core::HelmChartSource;
use readiness_core::InstallStepsSource;
use readiness_core::JenkinsAdapter;
use readiness_core::Policy;
use readiness_core::PolicyBuilder;
use readiness_core::PreReleaseParams;
use readiness_core::ReadinessReport;
use readiness_core::RegressionParams;
use readiness_core::ReleaseIdentity;
use readiness_core::Runner;
use readiness_core::RunnerConfig;
use readiness_core::SubCheckId;
use readiness_core::SubCheckPolicy;
use readiness_core::Timestamp;
use readiness_core::interfaces::ApplicationState;
use readiness_core::interfaces::BuildRecord;
use readiness_core::interfaces::BuildStatus;
use readiness_core::interfaces::ChangeExport;
use readiness_core::interfaces::ChartRecord;
use readiness_core::interfaces::HealthStatus;
use readiness_core::interfaces::PageRecord;
use readiness_core::interfaces::PullRequestRecord;
use readiness_core::interfaces::SyncStatus;
use readiness_core::runtime::CancellationSignal;
use serde_json::json;

// ============================================================================
// SECTION: Clock and Release
// ============================================================================

/// Fixed evaluation instant for every fixture.
pub const NOW_MS: i64 = 1_760_000_000_000;

/// Release commit used by fixtures.
pub const COMMIT: &str = "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678";

/// Evaluation instant.
pub fn now() -> Timestamp {
    Timestamp::from_unix_millis(NOW_MS)
}

/// Instant `hours` before [`now`].
pub fn hours_ago(hours: u64) -> Timestamp {
    now().minus(Duration::from_secs(hours * 3600))
}

/// Instant `minutes` before [`now`].
pub fn minutes_ago(minutes: u64) -> Timestamp {
    now().minus(Duration::from_secs(minutes * 60))
}

/// Release under evaluation.
pub fn release() -> ReleaseIdentity {
    ReleaseIdentity {
        service: "payments".to_string(),
        version: "2.4.0".to_string(),
        commit: Some(COMMIT.to_string()),
    }
}

// ============================================================================
// SECTION: Fake Sources
// ============================================================================

/// In-memory evidence served by [`FakeAdapter`]. Absent entries are `NotFound`.
#[derive(Default, Clone)]
pub struct FakeSources {
    /// ArgoCD applications by name.
    pub applications: BTreeMap<String, ApplicationState>,
    /// Jenkins build histories by job.
    pub builds: BTreeMap<String, Vec<BuildRecord>>,
    /// Confluence pages by id.
    pub pages: BTreeMap<String, PageRecord>,
    /// Pull requests by `(repository, number)`.
    pub pulls: BTreeMap<(String, u64), PullRequestRecord>,
    /// Charts by `repository:chart_path`.
    pub charts: BTreeMap<String, ChartRecord>,
    /// Change exports by reference.
    pub exports: BTreeMap<String, Vec<u8>>,
    /// Forced failures by source key (`argocd`, `jenkins:<job>`, `confluence:<id>`, ...).
    pub failures: BTreeMap<String, AdapterError>,
    /// Artificial latency for Jenkins calls.
    pub jenkins_delay: Option<Duration>,
    /// Confluence page ids whose lookup panics.
    pub panicking_pages: Vec<String>,
}

impl FakeSources {
    /// Wraps the sources in adapter handles.
    pub fn into_adapters(self) -> Adapters {
        let fake = Arc::new(FakeAdapter {
            sources: self,
        });
        Adapters {
            argocd: fake.clone(),
            jenkins: fake.clone(),
            confluence: fake.clone(),
            github: fake.clone(),
            change_management: fake,
        }
    }

    /// Returns a forced failure for `key`, if configured.
    fn failure(&self, key: &str) -> Result<(), AdapterError> {
        self.failures.get(key).map_or(Ok(()), |err| Err(err.clone()))
    }
}

/// Adapter implementing every source trait over [`FakeSources`].
pub struct FakeAdapter {
    /// Backing data.
    sources: FakeSources,
}

#[async_trait]
impl ArgoCdAdapter for FakeAdapter {
    async fn application(&self, name: &str) -> Result<ApplicationState, AdapterError> {
        self.sources.failure("argocd")?;
        self.sources
            .applications
            .get(name)
            .cloned()
            .ok_or_else(|| AdapterError::NotFound(format!("application {name}")))
    }
}

#[async_trait]
impl JenkinsAdapter for FakeAdapter {
    async fn builds(&self, job: &str) -> Result<Vec<BuildRecord>, AdapterError> {
        if let Some(delay) = self.sources.jenkins_delay {
            tokio::time::sleep(delay).await;
        }
        self.sources.failure(&format!("jenkins:{job}"))?;
        self.sources
            .builds
            .get(job)
            .cloned()
            .ok_or_else(|| AdapterError::NotFound(format!("job {job}")))
    }
}

#[async_trait]
impl ConfluenceAdapter for FakeAdapter {
    async fn page(&self, page_id: &str) -> Result<PageRecord, AdapterError> {
        if self.sources.panicking_pages.iter().any(|id| id == page_id) {
            panic!("confluence fixture panic for {page_id}");
        }
        self.sources.failure(&format!("confluence:{page_id}"))?;
        self.sources
            .pages
            .get(page_id)
            .cloned()
            .ok_or_else(|| AdapterError::NotFound(format!("page {page_id}")))
    }
}

#[async_trait]
impl GitHubAdapter for FakeAdapter {
    async fn pull_request(
        &self,
        repository: &str,
        number: u64,
    ) -> Result<PullRequestRecord, AdapterError> {
        self.sources.failure(&format!("github:{repository}#{number}"))?;
        self.sources
            .pulls
            .get(&(repository.to_string(), number))
            .cloned()
            .ok_or_else(|| AdapterError::NotFound(format!("pull request {repository}#{number}")))
    }

    async fn chart(
        &self,
        repository: &str,
        chart_path: &str,
        _reference: &str,
    ) -> Result<ChartRecord, AdapterError> {
        let key = format!("{repository}:{chart_path}");
        self.sources.failure(&format!("github:{key}"))?;
        self.sources
            .charts
            .get(&key)
            .cloned()
            .ok_or_else(|| AdapterError::NotFound(format!("chart {key}")))
    }
}

#[async_trait]
impl ChangeManagementAdapter for FakeAdapter {
    async fn export(&self, reference: &str) -> Result<ChangeExport, AdapterError> {
        self.sources.failure(&format!("cm:{reference}"))?;
        let bytes = self
            .sources
            .exports
            .get(reference)
            .cloned()
            .ok_or_else(|| AdapterError::NotFound(format!("change {reference}")))?;
        Ok(ChangeExport {
            reference: reference.to_string(),
            bytes,
            location: format!("memory://cm/{reference}"),
            retrieved_at: now(),
        })
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Application state for the release.
pub fn application(sync: SyncStatus, health: HealthStatus) -> ApplicationState {
    ApplicationState {
        name: "payments-staging".to_string(),
        sync_status: sync,
        health_status: health,
        revision: COMMIT.to_string(),
        health_since: Some(minutes_ago(10)),
        retrieved_at: now(),
        url: Some("https://argocd.example/applications/payments-staging".to_string()),
    }
}

/// Build of `job` parameterized for the release version.
pub fn build(job: &str, number: u64, status: BuildStatus, timestamp: Timestamp) -> BuildRecord {
    build_for_version(job, number, status, timestamp, "2.4.0")
}

/// Build of `job` parameterized for `version`.
pub fn build_for_version(
    job: &str,
    number: u64,
    status: BuildStatus,
    timestamp: Timestamp,
    version: &str,
) -> BuildRecord {
    BuildRecord {
        job: job.to_string(),
        number,
        status,
        timestamp,
        url: Some(format!("https://jenkins.example/job/{job}/{number}/")),
        parameters: BTreeMap::from([("RELEASE_VERSION".to_string(), version.to_string())]),
    }
}

/// Confluence page updated at `updated_at`.
pub fn page(page_id: &str, updated_at: Timestamp) -> PageRecord {
    PageRecord {
        page_id: page_id.to_string(),
        title: format!("Page {page_id}"),
        updated_at,
        url: None,
    }
}

/// Helm chart metadata.
pub fn chart(version: &str, previous: Option<&str>) -> ChartRecord {
    ChartRecord {
        repository: "acme/charts".to_string(),
        chart_path: "charts/payments".to_string(),
        version: version.to_string(),
        previous_version: previous.map(str::to_string),
        retrieved_at: now(),
        url: None,
    }
}

/// Change export JSON bytes.
pub fn change_export(state: &str, approvals: usize, testing_state: &str) -> Vec<u8> {
    let approvals: Vec<_> = (0 .. approvals)
        .map(|index| json!({"approver": format!("approver-{index}"), "state": "approved"}))
        .collect();
    serde_json::to_vec(&json!({
        "change_id": "CHG0001",
        "state": state,
        "exported_at_ms": NOW_MS - 3_600_000,
        "approvals": approvals,
        "tasks": [
            {"name": "build", "state": "complete"},
            {"name": "testing", "state": testing_state}
        ]
    }))
    .unwrap()
}

/// Sources under which every check is GREEN.
pub fn green_sources() -> FakeSources {
    let mut sources = FakeSources::default();
    sources.applications.insert(
        "payments-staging".to_string(),
        application(SyncStatus::Synced, HealthStatus::Healthy),
    );
    for job in ["regression-suite", "perf-suite", "chaos-suite", "helm-lint", "docs-build"] {
        sources
            .builds
            .insert(job.to_string(), vec![build(job, 7, BuildStatus::Success, hours_ago(2))]);
    }
    sources.pages.insert("DR-1".to_string(), page("DR-1", hours_ago(3)));
    sources.pages.insert("INSTALL-1".to_string(), page("INSTALL-1", hours_ago(3)));
    sources.charts.insert("acme/charts:charts/payments".to_string(), chart("1.8.0", Some("1.7.2")));
    sources.pulls.insert(("acme/docs".to_string(), 42), PullRequestRecord {
        repository: "acme/docs".to_string(),
        number: 42,
        merged: true,
        merged_at: Some(hours_ago(5)),
        url: None,
    });
    sources.exports.insert("CHG0001".to_string(), change_export("implement", 2, "complete"));
    sources
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Common entry with the default thresholds.
pub fn entry<P>(required: bool, params: P) -> CheckPolicy<P> {
    CheckPolicy {
        required,
        freshness_threshold: Duration::from_secs(24 * 3600),
        timeout: Duration::from_secs(5),
        params,
    }
}

/// Deployment entry.
pub fn deployment_entry() -> CheckPolicy<DeploymentParams> {
    entry(true, DeploymentParams {
        application: "payments-staging".to_string(),
        degraded_window: Duration::from_secs(30 * 60),
    })
}

/// Regression entry.
pub fn regression_entry() -> CheckPolicy<RegressionParams> {
    entry(true, RegressionParams {
        job: "regression-suite".to_string(),
        matching: BuildMatch::default(),
    })
}

/// Certification entry: perf (required), chaos (optional), dr (required).
pub fn certification_entry() -> CheckPolicy<CertificationParams> {
    entry(true, CertificationParams {
        sub_checks: vec![
            SubCheckPolicy {
                id: SubCheckId::new("perf"),
                required: true,
                source: CertificationSource::JenkinsJob {
                    job: "perf-suite".to_string(),
                },
            },
            SubCheckPolicy {
                id: SubCheckId::new("chaos"),
                required: false,
                source: CertificationSource::JenkinsJob {
                    job: "chaos-suite".to_string(),
                },
            },
            SubCheckPolicy {
                id: SubCheckId::new("dr"),
                required: true,
                source: CertificationSource::ConfluencePage {
                    page_id: "DR-1".to_string(),
                },
            },
        ],
        matching: BuildMatch::default(),
    })
}

/// Pre-release entry.
pub fn pre_release_entry() -> CheckPolicy<PreReleaseParams> {
    entry(true, PreReleaseParams {
        helm_chart: SubCheckPolicy {
            id: SubCheckId::new("helm_chart"),
            required: true,
            source: HelmChartSource {
                repository: "acme/charts".to_string(),
                chart_path: "charts/payments".to_string(),
                lint_job: "helm-lint".to_string(),
            },
        },
        install_steps: SubCheckPolicy {
            id: SubCheckId::new("install_steps"),
            required: true,
            source: InstallStepsSource {
                page_id: "INSTALL-1".to_string(),
            },
        },
        customer_docs: SubCheckPolicy {
            id: SubCheckId::new("customer_docs"),
            required: true,
            source: CustomerDocsSource {
                repository: Some("acme/docs".to_string()),
                pull_request: Some(42),
                docs_job: Some("docs-build".to_string()),
            },
        },
        matching: BuildMatch::default(),
    })
}

/// Change-management entry.
pub fn change_management_entry() -> CheckPolicy<ChangeManagementParams> {
    entry(true, ChangeManagementParams {
        reference: Some("CHG0001".to_string()),
        min_approvals: 1,
        testing_task: "testing".to_string(),
    })
}

/// Builder preloaded with every standard entry.
pub fn policy_builder() -> PolicyBuilder {
    Policy::builder()
        .nonprod_deployment(deployment_entry())
        .regression_test(regression_entry())
        .certification(certification_entry())
        .pre_release(pre_release_entry())
        .change_management(change_management_entry())
}

/// Standard policy with every check required.
pub fn standard_policy() -> Policy {
    policy_builder().build().unwrap()
}

// ============================================================================
// SECTION: Runs
// ============================================================================

/// Context over `sources` and `policy`, evaluated at [`now`].
pub fn context(sources: FakeSources, policy: Policy) -> Arc<ExecutionContext> {
    Arc::new(ExecutionContext::new(release(), policy, sources.into_adapters(), now()))
}

/// Runs the standard registry to completion.
pub async fn run(sources: FakeSources, policy: Policy) -> ReadinessReport {
    let runner = Runner::new(
        CheckRegistry::standard(),
        RunnerConfig::default(),
        Arc::new(readiness_core::NoopAuditSink),
    );
    runner.run(context(sources, policy), BuildId::new("test-build"), CancellationSignal::never()).await
}

/// Audit sink capturing events in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    /// Captured events.
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    /// Captured event labels in order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|event| event.event).collect()
    }
}

impl AuditSink for RecordingAuditSink {
    fn record(&self, event: &AuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
