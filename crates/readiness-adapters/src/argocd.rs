// crates/readiness-adapters/src/argocd.rs
// ============================================================================
// Module: ArgoCD Snapshot Adapter
// Description: Normalizes exported ArgoCD Application resources.
// Purpose: Serve application sync and health state from the evidence directory.
// Dependencies: readiness-core, serde
// ============================================================================

//! ## Overview
//! Reads `argocd/<application>.json` (or YAML), the Application resource as
//! returned by `argocd app get -o json`. Only `metadata.name` and the sync and
//! health blocks of `status` are consulted. Unrecognized status strings become
//! `Unknown` rather than failing the read.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use readiness_core::AdapterError;
use readiness_core::ArgoCdAdapter;
use readiness_core::interfaces::ApplicationState;
use readiness_core::interfaces::HealthStatus;
use readiness_core::interfaces::SyncStatus;
use serde::Deserialize;

use crate::snapshot::SnapshotStore;
use crate::snapshot::off_thread;
use crate::snapshot::parse_optional;

// ============================================================================
// SECTION: Wire Format
// ============================================================================

/// Exported Application resource.
#[derive(Debug, Deserialize)]
struct ApplicationResource {
    /// Object metadata.
    metadata: Metadata,
    /// Observed status.
    #[serde(default)]
    status: ApplicationStatus,
}

/// Object metadata.
#[derive(Debug, Deserialize)]
struct Metadata {
    /// Application name.
    name: String,
}

/// Application status block.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationStatus {
    /// Sync block.
    #[serde(default)]
    sync: SyncBlock,
    /// Health block.
    #[serde(default)]
    health: HealthBlock,
    /// Last reconciliation instant.
    #[serde(default)]
    reconciled_at: Option<String>,
}

/// Sync block.
#[derive(Debug, Default, Deserialize)]
struct SyncBlock {
    /// `Synced`, `OutOfSync`, or `Unknown`.
    #[serde(default)]
    status: Option<String>,
    /// Target revision the live state is compared with.
    #[serde(default)]
    revision: Option<String>,
}

/// Health block.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HealthBlock {
    /// Aggregated health.
    #[serde(default)]
    status: Option<String>,
    /// Instant the health status last changed.
    #[serde(default)]
    last_transition_time: Option<String>,
}

// ============================================================================
// SECTION: Adapter
// ============================================================================

/// ArgoCD adapter over exported Application resources.
pub struct SnapshotArgoCd {
    /// Evidence reader.
    store: SnapshotStore,
    /// Base URL used to link applications, when known.
    base_url: Option<String>,
}

impl SnapshotArgoCd {
    /// Creates the adapter.
    #[must_use]
    pub const fn new(store: SnapshotStore, base_url: Option<String>) -> Self {
        Self {
            store,
            base_url,
        }
    }
}

#[async_trait]
impl ArgoCdAdapter for SnapshotArgoCd {
    async fn application(&self, name: &str) -> Result<ApplicationState, AdapterError> {
        let store = self.store.clone();
        let base_url = self.base_url.clone();
        let name = name.to_string();
        off_thread(move || {
            let snapshot = store.load::<ApplicationResource>(&["argocd", &name])?;
            let resource = snapshot.document;
            if resource.metadata.name != name {
                return Err(AdapterError::NotFound(format!(
                    "snapshot argocd/{name} describes application {}",
                    resource.metadata.name
                )));
            }
            let status = resource.status;
            let reconciled_at =
                parse_optional("status.reconciledAt", status.reconciled_at.as_deref())?;
            let retrieved_at = reconciled_at.or(snapshot.modified_at).ok_or_else(|| {
                AdapterError::Unreadable(format!("argocd/{name}: retrieval time unknown"))
            })?;
            Ok(ApplicationState {
                sync_status: sync_status(status.sync.status.as_deref()),
                health_status: health_status(status.health.status.as_deref()),
                revision: status.sync.revision.unwrap_or_default(),
                health_since: parse_optional(
                    "status.health.lastTransitionTime",
                    status.health.last_transition_time.as_deref(),
                )?,
                retrieved_at,
                url: base_url
                    .map(|base| format!("{}/applications/{name}", base.trim_end_matches('/'))),
                name,
            })
        })
        .await
    }
}

/// Maps an ArgoCD sync status string.
fn sync_status(value: Option<&str>) -> SyncStatus {
    match value {
        Some("Synced") => SyncStatus::Synced,
        Some("OutOfSync") => SyncStatus::OutOfSync,
        _ => SyncStatus::Unknown,
    }
}

/// Maps an ArgoCD health status string.
fn health_status(value: Option<&str>) -> HealthStatus {
    match value {
        Some("Healthy") => HealthStatus::Healthy,
        Some("Progressing") => HealthStatus::Progressing,
        Some("Degraded") => HealthStatus::Degraded,
        Some("Suspended") => HealthStatus::Suspended,
        Some("Missing") => HealthStatus::Missing,
        _ => HealthStatus::Unknown,
    }
}
