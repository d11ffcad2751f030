// crates/readiness-adapters/src/lib.rs
// ============================================================================
// Module: Readiness Adapters Library
// Description: Snapshot implementations of the core adapter contracts.
// Purpose: Normalize exported evidence into core records for readiness runs.
// Dependencies: readiness-core, serde_json, serde_yaml, time, tokio
// ============================================================================

//! ## Overview
//! Each adapter reads documents exported from one external system into a
//! shared evidence directory and normalizes them into the core record types.
//! Adapters fetch and normalize only; they never decide a status. Every read is
//! confined to the evidence root and bounded in size.
//!
//! Layout under the evidence root:
//!
//! ```text
//! argocd/<application>.json
//! jenkins/<job>.json
//! confluence/<page_id>.json
//! github/<owner>/<repo>/pulls/<number>.json
//! github/<owner>/<repo>/<chart_path>/Chart.yaml
//! change_management/<reference>.json
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod argocd;
pub mod change_management;
pub mod confluence;
pub mod github;
pub mod jenkins;
pub mod snapshot;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use readiness_core::Adapters;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use argocd::SnapshotArgoCd;
pub use change_management::SnapshotChangeManagement;
pub use confluence::SnapshotConfluence;
pub use github::SnapshotGitHub;
pub use jenkins::SnapshotJenkins;
pub use snapshot::SnapshotConfig;
pub use snapshot::SnapshotError;
pub use snapshot::SnapshotStore;
pub use snapshot::parse_rfc3339;

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Builds every adapter over one evidence directory.
///
/// # Errors
///
/// Returns [`SnapshotError::Root`] when the evidence root cannot be opened.
pub fn snapshot_adapters(
    config: &SnapshotConfig,
    argocd_base_url: Option<String>,
) -> Result<Adapters, SnapshotError> {
    let store = SnapshotStore::open(config)?;
    Ok(Adapters {
        argocd: Arc::new(SnapshotArgoCd::new(store.clone(), argocd_base_url)),
        jenkins: Arc::new(SnapshotJenkins::new(store.clone())),
        confluence: Arc::new(SnapshotConfluence::new(store.clone())),
        github: Arc::new(SnapshotGitHub::new(store.clone())),
        change_management: Arc::new(SnapshotChangeManagement::new(store)),
    })
}
