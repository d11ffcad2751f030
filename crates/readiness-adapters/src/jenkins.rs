// crates/readiness-adapters/src/jenkins.rs
// ============================================================================
// Module: Jenkins Snapshot Adapter
// Description: Normalizes exported Jenkins job build histories.
// Purpose: Serve build results and parameters from the evidence directory.
// Dependencies: readiness-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Reads `jenkins/<job>.json` (folder jobs use nested directories), the job
//! tree as returned by
//! `api/json?tree=builds[number,result,building,timestamp,url,actions[parameters[name,value]]]`.
//! Jenkins reports `result: null` while a build runs; such builds normalize to
//! `InProgress`. Parameter values are stringified; null values are dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use async_trait::async_trait;
use readiness_core::AdapterError;
use readiness_core::JenkinsAdapter;
use readiness_core::Timestamp;
use readiness_core::interfaces::BuildRecord;
use readiness_core::interfaces::BuildStatus;
use serde::Deserialize;
use serde_json::Value;

use crate::snapshot::SnapshotStore;
use crate::snapshot::off_thread;

// ============================================================================
// SECTION: Wire Format
// ============================================================================

/// Exported job tree.
#[derive(Debug, Deserialize)]
struct JobTree {
    /// Recorded builds, newest first as Jenkins reports them.
    #[serde(default)]
    builds: Vec<WireBuild>,
}

/// One build entry.
#[derive(Debug, Deserialize)]
struct WireBuild {
    /// Build number.
    number: u64,
    /// Result label; absent while running.
    #[serde(default)]
    result: Option<String>,
    /// Whether the build is still running.
    #[serde(default)]
    building: bool,
    /// Start instant in unix milliseconds.
    timestamp: i64,
    /// Build URL.
    #[serde(default)]
    url: Option<String>,
    /// Build actions; only parameter actions are read.
    #[serde(default)]
    actions: Vec<WireAction>,
}

/// Build action.
#[derive(Debug, Default, Deserialize)]
struct WireAction {
    /// Parameters, present on `ParametersAction` only.
    #[serde(default)]
    parameters: Vec<WireParameter>,
}

/// Build parameter.
#[derive(Debug, Deserialize)]
struct WireParameter {
    /// Parameter name.
    name: String,
    /// Parameter value of any JSON type.
    #[serde(default)]
    value: Value,
}

// ============================================================================
// SECTION: Adapter
// ============================================================================

/// Jenkins adapter over exported job trees.
pub struct SnapshotJenkins {
    /// Evidence reader.
    store: SnapshotStore,
}

impl SnapshotJenkins {
    /// Creates the adapter.
    #[must_use]
    pub const fn new(store: SnapshotStore) -> Self {
        Self {
            store,
        }
    }
}

#[async_trait]
impl JenkinsAdapter for SnapshotJenkins {
    async fn builds(&self, job: &str) -> Result<Vec<BuildRecord>, AdapterError> {
        let store = self.store.clone();
        let job = job.to_string();
        off_thread(move || {
            let tree = store.load::<JobTree>(&["jenkins", &job])?.document;
            Ok(tree.builds.into_iter().map(|build| normalize(&job, build)).collect())
        })
        .await
    }
}

/// Normalizes one wire build.
fn normalize(job: &str, build: WireBuild) -> BuildRecord {
    let parameters: BTreeMap<String, String> = build
        .actions
        .into_iter()
        .flat_map(|action| action.parameters)
        .filter_map(|parameter| {
            let value = match parameter.value {
                Value::Null => return None,
                Value::String(text) => text,
                other => other.to_string(),
            };
            Some((parameter.name, value))
        })
        .collect();
    BuildRecord {
        job: job.to_string(),
        number: build.number,
        status: build_status(build.result.as_deref(), build.building),
        timestamp: Timestamp::from_unix_millis(build.timestamp),
        url: build.url,
        parameters,
    }
}

/// Maps a Jenkins result label.
fn build_status(result: Option<&str>, building: bool) -> BuildStatus {
    match result {
        Some("SUCCESS") => BuildStatus::Success,
        Some("FAILURE") => BuildStatus::Failed,
        Some("ABORTED") => BuildStatus::Aborted,
        Some("UNSTABLE") => BuildStatus::Unstable,
        None if building => BuildStatus::InProgress,
        _ => BuildStatus::Unknown,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use readiness_core::interfaces::BuildStatus;
    use serde_json::json;

    use super::WireBuild;
    use super::build_status;
    use super::normalize;

    #[test]
    fn running_builds_are_in_progress() {
        assert_eq!(build_status(None, true), BuildStatus::InProgress);
        assert_eq!(build_status(None, false), BuildStatus::Unknown);
        assert_eq!(build_status(Some("NOT_BUILT"), false), BuildStatus::Unknown);
        assert_eq!(build_status(Some("FAILURE"), false), BuildStatus::Failed);
    }

    #[test]
    fn parameters_are_stringified() {
        let build: WireBuild = serde_json::from_value(json!({
            "number": 7,
            "result": "SUCCESS",
            "timestamp": 1_760_000_000_000_i64,
            "actions": [
                {},
                {"parameters": [
                    {"name": "RELEASE_VERSION", "value": "2.4.0"},
                    {"name": "RETRIES", "value": 3},
                    {"name": "NOTES", "value": null}
                ]}
            ]
        }))
        .unwrap();
        let record = normalize("team/regression", build);
        assert_eq!(record.parameters.get("RELEASE_VERSION").map(String::as_str), Some("2.4.0"));
        assert_eq!(record.parameters.get("RETRIES").map(String::as_str), Some("3"));
        assert!(!record.parameters.contains_key("NOTES"));
        assert_eq!(record.job, "team/regression");
    }
}
