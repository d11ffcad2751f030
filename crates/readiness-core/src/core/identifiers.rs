// crates/readiness-core/src/core/identifiers.rs
// ============================================================================
// Module: Readiness Identifiers
// Description: Canonical opaque identifiers for checks, sub-checks, and builds.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! String-based identifiers used throughout the readiness engine. Identifiers
//! are opaque and serialize as strings. Validation (non-empty, uniqueness) is
//! handled at policy resolution rather than within these wrappers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Check identifier, unique within a readiness report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckId(String);

impl CheckId {
    /// Creates a new check identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for CheckId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Sub-check identifier, unique within its parent check.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubCheckId(String);

impl SubCheckId {
    /// Creates a new sub-check identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubCheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for SubCheckId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Build identifier stamped onto a readiness report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildId(String);

impl BuildId {
    /// Creates a new build identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for BuildId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Check Kinds
// ============================================================================

/// Closed set of readiness checks, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// ArgoCD non-production deployment check.
    NonprodDeployment,
    /// Jenkins regression test check.
    RegressionTest,
    /// Performance/chaos/DR certification bundle.
    Certification,
    /// Helm chart, install steps, and customer docs readiness.
    PreRelease,
    /// Change-management record check.
    ChangeManagement,
}

impl CheckKind {
    /// Every check kind in declared registration order.
    pub const ALL: [Self; 5] = [
        Self::NonprodDeployment,
        Self::RegressionTest,
        Self::Certification,
        Self::PreRelease,
        Self::ChangeManagement,
    ];

    /// Stable identifier used in configuration and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NonprodDeployment => "nonprod_deployment",
            Self::RegressionTest => "regression_test",
            Self::Certification => "certification",
            Self::PreRelease => "pre_release",
            Self::ChangeManagement => "change_management",
        }
    }

    /// Human-readable check name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::NonprodDeployment => "Non-prod deployment",
            Self::RegressionTest => "Regression test",
            Self::Certification => "Certification bundle",
            Self::PreRelease => "Pre-release readiness",
            Self::ChangeManagement => "Change management",
        }
    }

    /// Report identifier for this check.
    #[must_use]
    pub fn id(self) -> CheckId {
        CheckId::new(self.as_str())
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
