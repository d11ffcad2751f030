// crates/readiness-core/src/core/evidence.rs
// ============================================================================
// Module: Readiness Evidence Model
// Description: Immutable evidence items cited by check results.
// Purpose: Record where each decision input came from, for audit and replay.
// Dependencies: crate::core::time, serde, serde_json
// ============================================================================

//! ## Overview
//! Evidence is a single piece of externally sourced data cited to justify a
//! check's status. Evidence is built once by the owning check and never shared
//! across checks; the check result owns its evidence list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Source Systems
// ============================================================================

/// External system an evidence item was sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSystem {
    /// ArgoCD application state.
    #[serde(rename = "argocd")]
    ArgoCd,
    /// Jenkins build records.
    Jenkins,
    /// GitHub pull requests and repository content.
    #[serde(rename = "github")]
    GitHub,
    /// Confluence pages.
    Confluence,
    /// Exported change-management records.
    ChangeManagement,
}

impl SourceSystem {
    /// Returns the stable label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ArgoCd => "argocd",
            Self::Jenkins => "jenkins",
            Self::GitHub => "github",
            Self::Confluence => "confluence",
            Self::ChangeManagement => "change_management",
        }
    }
}

impl fmt::Display for SourceSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Evidence
// ============================================================================

/// A single externally sourced datum cited by a check result.
///
/// # Invariants
/// - Immutable once attached to a result.
/// - `details` holds small scalar fields only; raw payloads are referenced by
///   `raw_ref` (a content digest), never embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// Evidence type label (e.g. `argocd_application`, `jenkins_build`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Source system.
    pub source_system: SourceSystem,
    /// Identifier of the record in the source system.
    pub identifier: String,
    /// Timestamp the source attributes to the record.
    pub timestamp: Timestamp,
    /// Link to the record, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Small structured details map.
    #[serde(default)]
    pub details: BTreeMap<String, Value>,
    /// Content digest of the normalized source record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_ref: Option<String>,
}

impl Evidence {
    /// Creates an evidence item without details.
    #[must_use]
    pub fn new(
        kind: impl Into<String>,
        source_system: SourceSystem,
        identifier: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            kind: kind.into(),
            source_system,
            identifier: identifier.into(),
            timestamp,
            url: None,
            details: BTreeMap::new(),
            raw_ref: None,
        }
    }

    /// Attaches a source URL.
    #[must_use]
    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    /// Adds a detail entry.
    #[must_use]
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    /// Attaches a raw record digest.
    #[must_use]
    pub fn with_raw_ref(mut self, raw_ref: Option<String>) -> Self {
        self.raw_ref = raw_ref;
        self
    }
}
