// crates/readiness-adapters/tests/common/mod.rs
// ============================================================================
// Module: Readiness Adapters Test Fixtures
// Description: Temporary evidence directories for snapshot adapter tests.
// Purpose: Lay out exported documents the way an export job would.
// ============================================================================

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Shared fixtures are used selectively by each test binary."
)]

use std::fs;
use std::path::Path;

use readiness_adapters::SnapshotConfig;
use readiness_adapters::SnapshotStore;
use serde_json::Value;
use tempfile::TempDir;

/// A temporary evidence root.
pub struct EvidenceDir {
    /// Backing directory, removed on drop.
    dir: TempDir,
}

impl EvidenceDir {
    /// Creates an empty evidence root.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("evidence tempdir"),
        }
    }

    /// Root path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `contents` at `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    /// Writes a JSON document at `relative`.
    pub fn write_json(&self, relative: &str, value: &Value) {
        self.write(relative, &serde_json::to_string_pretty(value).unwrap());
    }

    /// Default snapshot configuration over this root.
    pub fn config(&self) -> SnapshotConfig {
        SnapshotConfig::new(self.dir.path())
    }

    /// Store over this root with default limits.
    pub fn store(&self) -> SnapshotStore {
        SnapshotStore::open(&self.config()).unwrap()
    }
}
