// crates/readiness-core/src/interfaces/mod.rs
// ============================================================================
// Module: Readiness Interfaces
// Description: Adapter contracts, normalized records, and the report sink.
// Purpose: Define the boundary between decision logic and external systems.
// Dependencies: crate::core, async-trait, serde, thiserror
// ============================================================================

//! ## Overview
//! Adapters fetch and normalize remote data; they never decide. Each fetch
//! returns a normalized record or one of four [`AdapterError`] kinds, and the
//! core never inspects adapter wire formats. The [`ReportSink`] is the only
//! outbound surface: it receives the finished report and persists it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::ReadinessReport;
use crate::core::Timestamp;

// ============================================================================
// SECTION: Adapter Errors
// ============================================================================

/// Adapter failure kinds surfaced to checks.
///
/// Checks recover every variant locally as missing evidence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The record exists but could not be read or decoded.
    #[error("unreadable: {0}")]
    Unreadable(String),
    /// The call exceeded the check's timeout.
    #[error("timed out after {0} ms")]
    Timeout(u64),
    /// The source rejected credentials.
    #[error("authentication failed: {0}")]
    AuthFailure(String),
    /// The source throttled the request.
    #[error("rate limited: {0}")]
    RateLimited(String),
}

impl AdapterError {
    /// Stable label for audit events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Unreadable(_) => "unreadable",
            Self::Timeout(_) => "timeout",
            Self::AuthFailure(_) => "auth_failure",
            Self::RateLimited(_) => "rate_limited",
        }
    }
}

// ============================================================================
// SECTION: ArgoCD Records
// ============================================================================

/// ArgoCD sync status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStatus {
    /// Live state matches the target revision.
    Synced,
    /// Live state differs from the target revision.
    OutOfSync,
    /// Sync state could not be determined.
    Unknown,
}

/// ArgoCD health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// All resources healthy.
    Healthy,
    /// Resources still rolling out.
    Progressing,
    /// One or more resources failing.
    Degraded,
    /// Application paused.
    Suspended,
    /// Resources absent from the cluster.
    Missing,
    /// Health could not be determined.
    Unknown,
}

impl HealthStatus {
    /// Returns true for states tolerated inside the degraded window.
    #[must_use]
    pub const fn is_degraded(self) -> bool {
        matches!(self, Self::Progressing | Self::Degraded | Self::Suspended)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Healthy => "Healthy",
            Self::Progressing => "Progressing",
            Self::Degraded => "Degraded",
            Self::Suspended => "Suspended",
            Self::Missing => "Missing",
            Self::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Synced => "Synced",
            Self::OutOfSync => "OutOfSync",
            Self::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Normalized ArgoCD application state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationState {
    /// Application name.
    pub name: String,
    /// Sync status.
    pub sync_status: SyncStatus,
    /// Health status.
    pub health_status: HealthStatus,
    /// Deployed revision (commit SHA or tag).
    pub revision: String,
    /// Instant the current health status began, when known.
    pub health_since: Option<Timestamp>,
    /// Instant the state was retrieved.
    pub retrieved_at: Timestamp,
    /// Link to the application.
    pub url: Option<String>,
}

// ============================================================================
// SECTION: Jenkins Records
// ============================================================================

/// Jenkins build result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildStatus {
    /// Build succeeded.
    Success,
    /// Build failed.
    #[serde(alias = "FAILURE")]
    Failed,
    /// Build was aborted.
    Aborted,
    /// Build finished with test failures.
    Unstable,
    /// Build still running.
    InProgress,
    /// Result not reported.
    Unknown,
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Aborted => "ABORTED",
            Self::Unstable => "UNSTABLE",
            Self::InProgress => "IN_PROGRESS",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// Normalized Jenkins build record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    /// Job name.
    pub job: String,
    /// Build number.
    pub number: u64,
    /// Build result.
    pub status: BuildStatus,
    /// Build start instant.
    pub timestamp: Timestamp,
    /// Link to the build.
    pub url: Option<String>,
    /// Build parameters.
    pub parameters: BTreeMap<String, String>,
}

// ============================================================================
// SECTION: Confluence and GitHub Records
// ============================================================================

/// Normalized Confluence page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page identifier.
    pub page_id: String,
    /// Page title.
    pub title: String,
    /// Last update instant.
    pub updated_at: Timestamp,
    /// Link to the page.
    pub url: Option<String>,
}

/// Normalized GitHub pull request state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRecord {
    /// Repository (`owner/name`).
    pub repository: String,
    /// Pull request number.
    pub number: u64,
    /// Whether the pull request is merged.
    pub merged: bool,
    /// Merge instant, when merged.
    pub merged_at: Option<Timestamp>,
    /// Link to the pull request.
    pub url: Option<String>,
}

/// Normalized Helm chart metadata at the release ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRecord {
    /// Repository (`owner/name`).
    pub repository: String,
    /// Chart path inside the repository.
    pub chart_path: String,
    /// Chart version at the release ref.
    pub version: String,
    /// Chart version at the previous release, when one exists.
    pub previous_version: Option<String>,
    /// Instant the metadata was retrieved.
    pub retrieved_at: Timestamp,
    /// Link to the chart.
    pub url: Option<String>,
}

/// Raw change-management export. Parsing and validation belong to the check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeExport {
    /// Change reference the export was requested for.
    pub reference: String,
    /// Raw exported bytes.
    pub bytes: Vec<u8>,
    /// Where the export was read from.
    pub location: String,
    /// Instant the export was read.
    pub retrieved_at: Timestamp,
}

// ============================================================================
// SECTION: Adapter Traits
// ============================================================================

/// ArgoCD application lookups.
#[async_trait]
pub trait ArgoCdAdapter: Send + Sync {
    /// Fetches the state of an application.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the state cannot be obtained.
    async fn application(&self, name: &str) -> Result<ApplicationState, AdapterError>;
}

/// Jenkins build history lookups.
#[async_trait]
pub trait JenkinsAdapter: Send + Sync {
    /// Fetches the recorded builds of a job, in any order.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the history cannot be obtained.
    async fn builds(&self, job: &str) -> Result<Vec<BuildRecord>, AdapterError>;
}

/// Confluence page lookups.
#[async_trait]
pub trait ConfluenceAdapter: Send + Sync {
    /// Fetches page metadata.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the page cannot be obtained.
    async fn page(&self, page_id: &str) -> Result<PageRecord, AdapterError>;
}

/// GitHub pull request and repository content lookups.
#[async_trait]
pub trait GitHubAdapter: Send + Sync {
    /// Fetches pull request state.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the pull request cannot be obtained.
    async fn pull_request(
        &self,
        repository: &str,
        number: u64,
    ) -> Result<PullRequestRecord, AdapterError>;

    /// Fetches Helm chart metadata at `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the chart cannot be obtained.
    async fn chart(
        &self,
        repository: &str,
        chart_path: &str,
        reference: &str,
    ) -> Result<ChartRecord, AdapterError>;
}

/// Change-management export lookups.
#[async_trait]
pub trait ChangeManagementAdapter: Send + Sync {
    /// Fetches the raw export for a change reference.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the export cannot be obtained.
    async fn export(&self, reference: &str) -> Result<ChangeExport, AdapterError>;
}

/// Handles to every adapter, shared read-only by all checks.
#[derive(Clone)]
pub struct Adapters {
    /// ArgoCD adapter.
    pub argocd: Arc<dyn ArgoCdAdapter>,
    /// Jenkins adapter.
    pub jenkins: Arc<dyn JenkinsAdapter>,
    /// Confluence adapter.
    pub confluence: Arc<dyn ConfluenceAdapter>,
    /// GitHub adapter.
    pub github: Arc<dyn GitHubAdapter>,
    /// Change-management adapter.
    pub change_management: Arc<dyn ChangeManagementAdapter>,
}

// ============================================================================
// SECTION: Report Sink
// ============================================================================

/// Report persistence failures. Always fatal for the run.
#[derive(Debug, Error)]
pub enum ReportWriteError {
    /// The report could not be serialized.
    #[error("report serialization failed: {0}")]
    Serialize(String),
    /// The report could not be written.
    #[error("report write failed: {0}")]
    Io(String),
}

/// Where and what was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportReceipt {
    /// Written location.
    pub location: String,
    /// `sha256:<hex>` digest of the written bytes.
    pub digest: String,
}

/// Outbound boundary for finished reports.
pub trait ReportSink {
    /// Persists a report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportWriteError`] when the report cannot be persisted.
    fn write(&self, report: &ReadinessReport) -> Result<Vec<ReportReceipt>, ReportWriteError>;
}
