// crates/readiness-core/src/lib.rs
// ============================================================================
// Module: Release Readiness Core Library
// Description: Public API surface for the release readiness engine.
// Purpose: Expose the data model, checks, adapter contracts, and runner.
// Dependencies: crate::{checks, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Release readiness core decides whether a service release may ship. Five
//! independent checks gather evidence through adapter contracts, each decides
//! RED, YELLOW, or GREEN, and the runner folds them into one immutable
//! [`ReadinessReport`] using a single status algebra. The crate performs no
//! file or network I/O of its own; hosts supply adapters and persist reports.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod checks;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use checks::Check;
pub use checks::CheckInternalError;
pub use checks::CheckRegistry;
pub use interfaces::AdapterError;
pub use interfaces::Adapters;
pub use interfaces::ArgoCdAdapter;
pub use interfaces::ChangeManagementAdapter;
pub use interfaces::ConfluenceAdapter;
pub use interfaces::GitHubAdapter;
pub use interfaces::JenkinsAdapter;
pub use interfaces::ReportReceipt;
pub use interfaces::ReportSink;
pub use interfaces::ReportWriteError;
pub use runtime::AuditDetail;
pub use runtime::AuditEvent;
pub use runtime::AuditSink;
pub use runtime::CancellationHandle;
pub use runtime::CancellationSignal;
pub use runtime::ExecutionContext;
pub use runtime::NoopAuditSink;
pub use runtime::Runner;
pub use runtime::RunnerConfig;
pub use runtime::cancellation;
