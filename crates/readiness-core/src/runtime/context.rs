// crates/readiness-core/src/runtime/context.rs
// ============================================================================
// Module: Execution Context
// Description: Per-run, read-only inputs shared by every check.
// Purpose: Carry release identity, policy, adapters, and the evaluation instant.
// Dependencies: crate::{core, interfaces}, tokio
// ============================================================================

//! ## Overview
//! The execution context is built once per run and shared behind an `Arc`.
//! Nothing in it is mutable, so checks read it concurrently without locks.
//! Adapter calls go through [`ExecutionContext::fetch`], which applies the
//! calling check's timeout and maps expiry to [`AdapterError::Timeout`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;

use crate::core::CheckKind;
use crate::core::Policy;
use crate::core::ReleaseIdentity;
use crate::core::Timestamp;
use crate::interfaces::AdapterError;
use crate::interfaces::Adapters;

// ============================================================================
// SECTION: Execution Context
// ============================================================================

/// Read-only inputs for one readiness run.
pub struct ExecutionContext {
    /// Release under evaluation.
    release: ReleaseIdentity,
    /// Resolved policy.
    policy: Policy,
    /// Adapter handles.
    adapters: Adapters,
    /// Instant freshness is measured against.
    evaluated_at: Timestamp,
}

impl ExecutionContext {
    /// Creates a context.
    #[must_use]
    pub const fn new(
        release: ReleaseIdentity,
        policy: Policy,
        adapters: Adapters,
        evaluated_at: Timestamp,
    ) -> Self {
        Self {
            release,
            policy,
            adapters,
            evaluated_at,
        }
    }

    /// Release under evaluation.
    #[must_use]
    pub const fn release(&self) -> &ReleaseIdentity {
        &self.release
    }

    /// Resolved policy.
    #[must_use]
    pub const fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Adapter handles.
    #[must_use]
    pub const fn adapters(&self) -> &Adapters {
        &self.adapters
    }

    /// Instant freshness is measured against.
    #[must_use]
    pub const fn evaluated_at(&self) -> Timestamp {
        self.evaluated_at
    }

    /// Runs an adapter call under the timeout policy of `kind`.
    ///
    /// # Errors
    ///
    /// Returns the adapter's own error, or [`AdapterError::Timeout`] when the
    /// call does not finish within the check's timeout.
    pub async fn fetch<T, F>(&self, kind: CheckKind, call: F) -> Result<T, AdapterError>
    where
        F: Future<Output = Result<T, AdapterError>>,
    {
        let timeout = self.policy.timeout(kind);
        tokio::time::timeout(timeout, call).await.unwrap_or_else(|_| {
            Err(AdapterError::Timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)))
        })
    }
}
