// crates/readiness-core/src/core/mod.rs
// ============================================================================
// Module: Readiness Core Types
// Description: Canonical readiness data model and status algebra.
// Purpose: Provide stable, serializable types for decisions and reports.
// Dependencies: serde, serde_json, serde_jcs, sha2, thiserror
// ============================================================================

//! ## Overview
//! Value types shared by checks, the runner, and reporters: status algebra,
//! evidence, check results, policy, release identity, and the report itself.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod evidence;
pub mod hashing;
pub mod identifiers;
pub mod policy;
pub mod release;
pub mod report;
pub mod result;
pub mod status;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use evidence::Evidence;
pub use evidence::SourceSystem;
pub use identifiers::BuildId;
pub use identifiers::CheckId;
pub use identifiers::CheckKind;
pub use identifiers::SubCheckId;
pub use policy::BuildMatch;
pub use policy::CertificationParams;
pub use policy::CertificationSource;
pub use policy::ChangeManagementParams;
pub use policy::CheckPolicy;
pub use policy::CustomerDocsSource;
pub use policy::DeploymentParams;
pub use policy::HelmChartSource;
pub use policy::InstallStepsSource;
pub use policy::Policy;
pub use policy::PolicyBuilder;
pub use policy::PolicyError;
pub use policy::PreReleaseParams;
pub use policy::RegressionParams;
pub use policy::SubCheckPolicy;
pub use release::ReleaseIdentity;
pub use report::ReadinessReport;
pub use result::CheckOutcome;
pub use result::CheckResult;
pub use result::CheckTiming;
pub use result::REASON_EVALUATION_INCOMPLETE;
pub use result::SubCheckSummary;
pub use status::Status;
pub use status::StatusCounts;
pub use status::combine;
pub use time::Timestamp;
