// crates/readiness-core/src/core/status.rs
// ============================================================================
// Module: Status Algebra
// Description: Three-valued readiness status and the worst-wins fold.
// Purpose: Single source of RED/YELLOW/GREEN aggregation semantics.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`Status`] is totally ordered so that the worst value wins
//! (`RED > YELLOW > GREEN`). [`combine`] folds statuses with their
//! requiredness: a required RED blocks, an optional RED downgrades to YELLOW,
//! and is never silently dropped. Sub-check folding and the overall verdict both
//! go through [`combine`]; no other module encodes colour logic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Status
// ============================================================================

/// Readiness status of a check, sub-check, or whole release.
///
/// # Invariants
/// - Declaration order is severity order; `Ord` is "worse is greater".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Requirement satisfied with current evidence.
    Green,
    /// Requirement not blocking but needs attention.
    Yellow,
    /// Requirement failed or could not be established.
    Red,
}

impl Status {
    /// Returns the stable upper-case label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Red => "RED",
        }
    }

    /// Returns true when the status is GREEN.
    #[must_use]
    pub const fn is_green(self) -> bool {
        matches!(self, Self::Green)
    }

    /// Returns the worse of two statuses.
    #[must_use]
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }

    /// Process exit code conveying this status as an overall verdict.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Green => 0,
            Self::Yellow => 1,
            Self::Red => 2,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Combination
// ============================================================================

/// Folds `(status, required)` entries into a single status.
///
/// - Any required RED yields RED.
/// - Otherwise any RED (optional) yields YELLOW.
/// - Otherwise any YELLOW yields YELLOW.
/// - Otherwise GREEN (including the empty fold).
#[must_use]
pub fn combine<I>(entries: I) -> Status
where
    I: IntoIterator<Item = (Status, bool)>,
{
    let mut folded = Status::Green;
    for (status, required) in entries {
        let contribution = match status {
            Status::Red if required => return Status::Red,
            Status::Red | Status::Yellow => Status::Yellow,
            Status::Green => Status::Green,
        };
        folded = folded.worst(contribution);
    }
    folded
}

// ============================================================================
// SECTION: Counts
// ============================================================================

/// Per-status tallies reported alongside the overall verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Number of RED entries.
    pub red: usize,
    /// Number of YELLOW entries.
    pub yellow: usize,
    /// Number of GREEN entries.
    pub green: usize,
    /// Total number of entries.
    pub total: usize,
}

impl StatusCounts {
    /// Tallies the provided statuses.
    #[must_use]
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = Status>,
    {
        let mut counts = Self::default();
        for status in statuses {
            match status {
                Status::Red => counts.red += 1,
                Status::Yellow => counts.yellow += 1,
                Status::Green => counts.green += 1,
            }
            counts.total += 1;
        }
        counts
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::Status;
    use super::StatusCounts;
    use super::combine;

    #[test]
    fn ordering_is_worst_wins() {
        assert!(Status::Red > Status::Yellow);
        assert!(Status::Yellow > Status::Green);
        assert_eq!(Status::Green.worst(Status::Red), Status::Red);
    }

    #[test]
    fn optional_red_downgrades_to_yellow() {
        let status = combine([(Status::Green, true), (Status::Red, false)]);
        assert_eq!(status, Status::Yellow);
    }

    #[test]
    fn empty_fold_is_green() {
        assert_eq!(combine(std::iter::empty()), Status::Green);
    }

    #[test]
    fn serializes_as_upper_case_labels() {
        let json = serde_json::to_string(&Status::Yellow).unwrap_or_default();
        assert_eq!(json, "\"YELLOW\"");
    }

    #[test]
    fn counts_tally_every_entry() {
        let counts = StatusCounts::tally([Status::Red, Status::Green, Status::Green]);
        assert_eq!((counts.red, counts.yellow, counts.green, counts.total), (1, 0, 2, 3));
    }
}
