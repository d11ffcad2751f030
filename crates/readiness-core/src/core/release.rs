// crates/readiness-core/src/core/release.rs
// ============================================================================
// Module: Release Identity
// Description: Resolved identity of the release under evaluation.
// Purpose: Give checks one read-only notion of "this release".
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The release identity is resolved once from configuration and shared
//! read-only with every check. Revision and build matching compare against it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Release Identity
// ============================================================================

/// Identity of the release being gated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseIdentity {
    /// Service name.
    pub service: String,
    /// Release version (tag or semantic version).
    pub version: String,
    /// Source commit, when pinned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

impl ReleaseIdentity {
    /// Returns true when `revision` names this release by commit or version.
    ///
    /// Commit comparison accepts abbreviated SHAs of at least seven characters.
    #[must_use]
    pub fn matches_revision(&self, revision: &str) -> bool {
        let revision = revision.trim();
        if revision.is_empty() {
            return false;
        }
        if revision == self.version {
            return true;
        }
        self.commit.as_deref().is_some_and(|commit| commit_matches(commit, revision))
    }
}

/// Compares two commit SHAs, allowing one to be an abbreviation of the other.
fn commit_matches(commit: &str, candidate: &str) -> bool {
    const MIN_ABBREVIATION: usize = 7;
    let (short, long) =
        if commit.len() <= candidate.len() { (commit, candidate) } else { (candidate, commit) };
    short.len() >= MIN_ABBREVIATION
        && long.get(.. short.len()).is_some_and(|prefix| prefix.eq_ignore_ascii_case(short))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
