// crates/readiness-adapters/src/github.rs
// ============================================================================
// Module: GitHub Snapshot Adapter
// Description: Normalizes exported pull requests and Helm chart metadata.
// Purpose: Serve docs merge state and chart versions from the evidence directory.
// Dependencies: readiness-core, serde
// ============================================================================

//! ## Overview
//! Two lookups live under `github/<owner>/<repo>/`:
//! - `pulls/<number>.json`: the pull request resource from the REST API;
//! - `<chart_path>/Chart.yaml`: the chart manifest at the release ref, with an
//!   optional `Chart.previous.yaml` holding the manifest at the prior release.
//!
//! The exported tree is already pinned to the release ref, so the requested
//! reference is only recorded in messages.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use readiness_core::AdapterError;
use readiness_core::GitHubAdapter;
use readiness_core::interfaces::ChartRecord;
use readiness_core::interfaces::PullRequestRecord;
use serde::Deserialize;

use crate::snapshot::SnapshotError;
use crate::snapshot::SnapshotStore;
use crate::snapshot::off_thread;
use crate::snapshot::parse_optional;

// ============================================================================
// SECTION: Wire Format
// ============================================================================

/// Exported pull request resource.
#[derive(Debug, Deserialize)]
struct PullResource {
    /// Pull request number.
    number: u64,
    /// Whether the pull request was merged.
    #[serde(default)]
    merged: bool,
    /// RFC 3339 merge instant.
    #[serde(default)]
    merged_at: Option<String>,
    /// Browser URL.
    #[serde(default)]
    html_url: Option<String>,
}

/// Helm `Chart.yaml` subset.
#[derive(Debug, Deserialize)]
struct ChartManifest {
    /// Chart version.
    version: String,
}

// ============================================================================
// SECTION: Adapter
// ============================================================================

/// GitHub adapter over exported repository content.
pub struct SnapshotGitHub {
    /// Evidence reader.
    store: SnapshotStore,
}

impl SnapshotGitHub {
    /// Creates the adapter.
    #[must_use]
    pub const fn new(store: SnapshotStore) -> Self {
        Self {
            store,
        }
    }
}

#[async_trait]
impl GitHubAdapter for SnapshotGitHub {
    async fn pull_request(
        &self,
        repository: &str,
        number: u64,
    ) -> Result<PullRequestRecord, AdapterError> {
        let store = self.store.clone();
        let repository = repository.to_string();
        off_thread(move || {
            let file = number.to_string();
            let pull =
                store.load::<PullResource>(&["github", &repository, "pulls", &file])?.document;
            if pull.number != number {
                return Err(AdapterError::NotFound(format!(
                    "snapshot for {repository}#{number} describes #{}",
                    pull.number
                )));
            }
            let merged_at = parse_optional("merged_at", pull.merged_at.as_deref())?;
            Ok(PullRequestRecord {
                repository,
                number,
                merged: pull.merged || merged_at.is_some(),
                merged_at,
                url: pull.html_url,
            })
        })
        .await
    }

    async fn chart(
        &self,
        repository: &str,
        chart_path: &str,
        reference: &str,
    ) -> Result<ChartRecord, AdapterError> {
        let store = self.store.clone();
        let repository = repository.to_string();
        let chart_path = chart_path.to_string();
        let reference = reference.to_string();
        off_thread(move || {
            let current_segments = ["github", repository.as_str(), chart_path.as_str(), "Chart"];
            let current =
                store.load::<ChartManifest>(&current_segments).map_err(|err| match err {
                    SnapshotError::Missing(_) => {
                        AdapterError::NotFound(format!("chart at {reference}: {err}"))
                    }
                    _ => AdapterError::Unreadable(format!("chart at {reference}: {err}")),
                })?;
            let previous_segments =
                ["github", repository.as_str(), chart_path.as_str(), "Chart.previous"];
            let previous_version = match store.load::<ChartManifest>(&previous_segments) {
                Ok(previous) => Some(previous.document.version),
                Err(SnapshotError::Missing(_)) => None,
                Err(err) => return Err(err.into()),
            };
            let retrieved_at = current.modified_at.ok_or_else(|| {
                let detail = format!("{repository}:{chart_path}: retrieval time unknown");
                AdapterError::Unreadable(detail)
            })?;
            Ok(ChartRecord {
                url: Some(format!(
                    "https://github.com/{repository}/blob/{reference}/{chart_path}/Chart.yaml"
                )),
                repository,
                chart_path,
                version: current.document.version,
                previous_version,
                retrieved_at,
            })
        })
        .await
    }
}
