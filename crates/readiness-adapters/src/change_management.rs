// crates/readiness-adapters/src/change_management.rs
// ============================================================================
// Module: Change-Management Snapshot Adapter
// Description: Serves raw change-management exports.
// Purpose: Hand export bytes to the change-management check unparsed.
// Dependencies: readiness-core
// ============================================================================

//! ## Overview
//! Reads `change_management/<reference>.json` as raw bytes. Parsing and schema
//! validation belong to the check so that a malformed export surfaces as
//! invalid evidence rather than as a missing record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use readiness_core::AdapterError;
use readiness_core::ChangeManagementAdapter;
use readiness_core::Timestamp;
use readiness_core::interfaces::ChangeExport;

use crate::snapshot::SnapshotStore;
use crate::snapshot::off_thread;

// ============================================================================
// SECTION: Adapter
// ============================================================================

/// Change-management adapter over exported records.
pub struct SnapshotChangeManagement {
    /// Evidence reader.
    store: SnapshotStore,
}

impl SnapshotChangeManagement {
    /// Creates the adapter.
    #[must_use]
    pub const fn new(store: SnapshotStore) -> Self {
        Self {
            store,
        }
    }
}

#[async_trait]
impl ChangeManagementAdapter for SnapshotChangeManagement {
    async fn export(&self, reference: &str) -> Result<ChangeExport, AdapterError> {
        let store = self.store.clone();
        let reference = reference.to_string();
        off_thread(move || {
            let snapshot = store.load_raw(&["change_management", &reference])?;
            Ok(ChangeExport {
                location: snapshot.path.display().to_string(),
                retrieved_at: snapshot.modified_at.unwrap_or_else(Timestamp::now),
                bytes: snapshot.document,
                reference,
            })
        })
        .await
    }
}
