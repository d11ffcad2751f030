// crates/readiness-core/src/checks/support.rs
// ============================================================================
// Module: Check Support
// Description: Evidence constructors, build matching, and freshness wording.
// Purpose: Share record-to-evidence mapping and build selection across checks.
// Dependencies: crate::{core, interfaces}, serde_json
// ============================================================================

//! ## Overview
//! Every evidence item carries a `raw_ref` digest of the normalized record it
//! came from, so a report reader can tie a decision back to exact source data.
//! Build selection is shared by every check that reads Jenkins history: the
//! latest build whose parameters name this release wins, ties broken by build
//! number.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use crate::core::BuildMatch;
use crate::core::CheckOutcome;
use crate::core::Evidence;
use crate::core::ReleaseIdentity;
use crate::core::SourceSystem;
use crate::core::Timestamp;
use crate::core::hashing::content_ref;
use crate::interfaces::ApplicationState;
use crate::interfaces::BuildRecord;
use crate::interfaces::ChartRecord;
use crate::interfaces::PageRecord;
use crate::interfaces::PullRequestRecord;

// ============================================================================
// SECTION: Build Matching
// ============================================================================

/// Returns the latest build whose parameters identify `release`.
///
/// A build matches when its version parameter equals the release version, or
/// when a commit parameter is configured and names the release commit.
#[must_use]
pub fn latest_matching_build<'a>(
    builds: &'a [BuildRecord],
    matching: &BuildMatch,
    release: &ReleaseIdentity,
) -> Option<&'a BuildRecord> {
    builds
        .iter()
        .filter(|build| build_matches(build, matching, release))
        .max_by_key(|build| (build.timestamp, build.number))
}

/// Returns true when a build's parameters identify the release.
fn build_matches(build: &BuildRecord, matching: &BuildMatch, release: &ReleaseIdentity) -> bool {
    let version_match = build
        .parameters
        .get(&matching.version_parameter)
        .is_some_and(|value| value.trim() == release.version);
    let commit_match = matching
        .commit_parameter
        .as_ref()
        .and_then(|name| build.parameters.get(name))
        .is_some_and(|value| release.commit.is_some() && release.matches_revision(value));
    version_match || commit_match
}

// ============================================================================
// SECTION: Freshness
// ============================================================================

/// Renders a duration at the coarsest whole unit.
#[must_use]
pub fn describe_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 {
        format!("{}m", secs / 60)
    } else {
        format!("{secs}s")
    }
}

/// Reason text for evidence older than its threshold.
#[must_use]
pub fn stale_reason(what: &str, age: Duration, threshold: Duration) -> String {
    format!(
        "stale evidence: {what} is {} old, threshold {}",
        describe_duration(age),
        describe_duration(threshold)
    )
}

/// Returns `Some(reason)` when `observed` is older than `threshold` at `now`.
#[must_use]
pub fn staleness(
    what: &str,
    now: Timestamp,
    observed: Timestamp,
    threshold: Duration,
) -> Option<String> {
    (!now.is_fresh(observed, threshold))
        .then(|| stale_reason(what, now.age_of(observed), threshold))
}

/// Downgrades a GREEN outcome to YELLOW when a staleness reason is present.
#[must_use]
pub fn apply_staleness(outcome: CheckOutcome, stale: Option<String>) -> CheckOutcome {
    match stale {
        Some(reason) => outcome.stale_if(true, reason),
        None => outcome,
    }
}

// ============================================================================
// SECTION: Evidence Constructors
// ============================================================================

/// Evidence for an ArgoCD application state.
#[must_use]
pub fn application_evidence(state: &ApplicationState) -> Evidence {
    Evidence::new("argocd_application", SourceSystem::ArgoCd, &state.name, state.retrieved_at)
        .with_url(state.url.clone())
        .with_detail("sync_status", state.sync_status.to_string())
        .with_detail("health_status", state.health_status.to_string())
        .with_detail("revision", state.revision.as_str())
        .with_raw_ref(content_ref(state))
}

/// Evidence for a Jenkins build.
#[must_use]
pub fn build_evidence(build: &BuildRecord) -> Evidence {
    Evidence::new(
        "jenkins_build",
        SourceSystem::Jenkins,
        format!("{}#{}", build.job, build.number),
        build.timestamp,
    )
    .with_url(build.url.clone())
    .with_detail("status", build.status.to_string())
    .with_detail("number", build.number)
    .with_raw_ref(content_ref(build))
}

/// Evidence for a Confluence page.
#[must_use]
pub fn page_evidence(page: &PageRecord) -> Evidence {
    Evidence::new("confluence_page", SourceSystem::Confluence, &page.page_id, page.updated_at)
        .with_url(page.url.clone())
        .with_detail("title", page.title.as_str())
        .with_raw_ref(content_ref(page))
}

/// Evidence for a GitHub pull request.
#[must_use]
pub fn pull_request_evidence(pull: &PullRequestRecord, observed_at: Timestamp) -> Evidence {
    Evidence::new(
        "github_pull_request",
        SourceSystem::GitHub,
        format!("{}#{}", pull.repository, pull.number),
        pull.merged_at.unwrap_or(observed_at),
    )
    .with_url(pull.url.clone())
    .with_detail("merged", pull.merged)
    .with_raw_ref(content_ref(pull))
}

/// Evidence for Helm chart metadata.
#[must_use]
pub fn chart_evidence(chart: &ChartRecord) -> Evidence {
    let evidence = Evidence::new(
        "helm_chart",
        SourceSystem::GitHub,
        format!("{}:{}", chart.repository, chart.chart_path),
        chart.retrieved_at,
    )
    .with_url(chart.url.clone())
    .with_detail("version", chart.version.as_str())
    .with_raw_ref(content_ref(chart));
    match &chart.previous_version {
        Some(previous) => evidence.with_detail("previous_version", previous.as_str()),
        None => evidence,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use super::describe_duration;
    use super::latest_matching_build;
    use crate::core::BuildMatch;
    use crate::core::ReleaseIdentity;
    use crate::core::Timestamp;
    use crate::interfaces::BuildRecord;
    use crate::interfaces::BuildStatus;

    fn build(number: u64, at: i64, version: &str) -> BuildRecord {
        BuildRecord {
            job: "regression".to_string(),
            number,
            status: BuildStatus::Success,
            timestamp: Timestamp::from_unix_millis(at),
            url: None,
            parameters: BTreeMap::from([("RELEASE_VERSION".to_string(), version.to_string())]),
        }
    }

    #[test]
    fn latest_match_ignores_other_versions() {
        let release = ReleaseIdentity {
            service: "svc".to_string(),
            version: "1.4.0".to_string(),
            commit: None,
        };
        let builds = vec![build(1, 10, "1.4.0"), build(3, 30, "1.5.0"), build(2, 20, "1.4.0")];
        let latest = latest_matching_build(&builds, &BuildMatch::default(), &release);
        assert_eq!(latest.map(|b| b.number), Some(2));
    }

    #[test]
    fn durations_render_coarsely() {
        assert_eq!(describe_duration(Duration::from_secs(24 * 3600)), "24h");
        assert_eq!(describe_duration(Duration::from_secs(26 * 3600 + 60)), "1561m");
        assert_eq!(describe_duration(Duration::from_secs(45)), "45s");
    }
}
