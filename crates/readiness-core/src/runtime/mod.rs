// crates/readiness-core/src/runtime/mod.rs
// ============================================================================
// Module: Readiness Runtime
// Description: Execution context, sub-check aggregation, runner, and audit events.
// Purpose: Drive checks to a single immutable readiness report.
// Dependencies: crate::{checks, core, interfaces}, tokio
// ============================================================================

//! ## Overview
//! Runtime pieces that sit between the checks and the host: the shared
//! per-run context, the sub-check fold, the concurrent runner, and the audit
//! event contract.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod aggregator;
pub mod audit;
pub mod context;
pub mod runner;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use aggregator::SubCheckResult;
pub use aggregator::fold_sub_checks;
pub use audit::AuditDetail;
pub use audit::AuditEvent;
pub use audit::AuditSink;
pub use audit::NoopAuditSink;
pub use context::ExecutionContext;
pub use runner::CancellationHandle;
pub use runner::CancellationSignal;
pub use runner::Runner;
pub use runner::RunnerConfig;
pub use runner::cancellation;
