// crates/readiness-core/src/core/time.rs
// ============================================================================
// Module: Readiness Time Model
// Description: Canonical timestamp representation for evidence and reports.
// Purpose: Provide deterministic, replayable time values for freshness policy.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Decision logic never reads wall-clock time directly. The evaluation instant
//! is carried by the execution context, and evidence timestamps are normalized
//! by adapters into unix milliseconds. Freshness is a pure function of both.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Unix epoch milliseconds.
///
/// # Invariants
/// - Values are supplied by callers; monotonicity is a caller responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix milliseconds.
    #[must_use]
    pub const fn from_unix_millis(value: i64) -> Self {
        Self(value)
    }

    /// Returns the timestamp as unix milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }

    /// Reads the current wall-clock time. Only hosts and the runner call this.
    #[must_use]
    pub fn now() -> Self {
        let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self(i64::try_from(millis).unwrap_or(i64::MAX))
    }

    /// Returns how long before `self` the `earlier` instant was.
    ///
    /// Evidence stamped in the future has zero age.
    #[must_use]
    pub fn age_of(self, earlier: Self) -> Duration {
        let delta = self.0.saturating_sub(earlier.0);
        u64::try_from(delta).map_or(Duration::ZERO, Duration::from_millis)
    }

    /// Returns the timestamp shifted back by `duration`, saturating at the epoch floor.
    #[must_use]
    pub fn minus(self, duration: Duration) -> Self {
        let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        Self(self.0.saturating_sub(millis))
    }

    /// Returns true when evidence stamped at `observed` is within `threshold` of `self`.
    #[must_use]
    pub fn is_fresh(self, observed: Self, threshold: Duration) -> bool {
        self.age_of(observed) <= threshold
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
