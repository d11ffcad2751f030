// crates/readiness-core/src/checks/change_management.rs
// ============================================================================
// Module: Change-Management Check
// Description: Validates an exported change record and its testing sign-off.
// Purpose: Gate on the change request being approved and tested.
// Dependencies: crate::{checks, core, interfaces, runtime}, jsonschema, serde, serde_json
// ============================================================================

//! ## Overview
//! The change reference comes from policy (config or `--cm-ref`). The export
//! is fetched as raw bytes, parsed as JSON, and validated against an embedded
//! JSON Schema (draft 2020-12) before any field is read. Structurally invalid
//! exports are RED with an `invalid evidence` reason; they are never treated
//! as missing.
//!
//! Decision order after validation: change id must match the reference, the
//! change must not be rejected or cancelled, granted approvals must meet the
//! policy minimum, and the testing task must exist. A complete testing task is
//! GREEN; anything else is YELLOW. A stale export downgrades GREEN to YELLOW.

// ============================================================================
// SECTION: Imports
// ============================================================================

use jsonschema::Draft;
use jsonschema::Validator;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::checks::CheckInternalError;
use crate::checks::support::apply_staleness;
use crate::checks::support::staleness;
use crate::core::CheckKind;
use crate::core::CheckOutcome;
use crate::core::Evidence;
use crate::core::SourceSystem;
use crate::core::Timestamp;
use crate::core::hashing::sha256_hex;
use crate::interfaces::ChangeExport;
use crate::runtime::ExecutionContext;

// ============================================================================
// SECTION: Export Schema
// ============================================================================

/// JSON Schema for change-management exports.
pub const CHANGE_EXPORT_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "$id": "readiness://schemas/change-export.json",
  "type": "object",
  "required": ["change_id", "state", "tasks"],
  "properties": {
    "change_id": { "type": "string", "minLength": 1 },
    "title": { "type": "string" },
    "state": {
      "type": "string",
      "enum": ["new", "assess", "authorize", "scheduled", "implement", "review", "closed", "rejected", "cancelled"]
    },
    "exported_at_ms": { "type": "integer", "minimum": 0 },
    "approvals": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["approver", "state"],
        "properties": {
          "approver": { "type": "string", "minLength": 1 },
          "state": { "type": "string", "enum": ["requested", "approved", "rejected"] }
        }
      }
    },
    "tasks": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["name", "state"],
        "properties": {
          "name": { "type": "string", "minLength": 1 },
          "state": { "type": "string", "enum": ["pending", "in_progress", "complete", "incomplete", "skipped"] }
        }
      }
    }
  }
}"#;

// ============================================================================
// SECTION: Export Model
// ============================================================================

/// Lifecycle state of a change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeState {
    /// Newly raised.
    New,
    /// Under assessment.
    Assess,
    /// Awaiting authorization.
    Authorize,
    /// Scheduled for implementation.
    Scheduled,
    /// Being implemented.
    Implement,
    /// Post-implementation review.
    Review,
    /// Closed.
    Closed,
    /// Rejected by approvers.
    Rejected,
    /// Withdrawn.
    Cancelled,
}

impl ChangeState {
    /// Whether the change can no longer proceed.
    #[must_use]
    pub const fn is_terminal_failure(self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled)
    }

    /// Stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Assess => "assess",
            Self::Authorize => "authorize",
            Self::Scheduled => "scheduled",
            Self::Implement => "implement",
            Self::Review => "review",
            Self::Closed => "closed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

/// State of one approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalState {
    /// Approval requested but not given.
    Requested,
    /// Approval granted.
    Approved,
    /// Approval refused.
    Rejected,
}

/// State of one change task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Not started.
    Pending,
    /// Started.
    InProgress,
    /// Finished successfully.
    Complete,
    /// Finished without completing.
    Incomplete,
    /// Skipped.
    Skipped,
}

impl TaskState {
    /// Stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
            Self::Incomplete => "incomplete",
            Self::Skipped => "skipped",
        }
    }
}

/// One approval entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Approval {
    /// Approver identity.
    pub approver: String,
    /// Approval state.
    pub state: ApprovalState,
}

/// One change task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangeTask {
    /// Task name.
    pub name: String,
    /// Task state.
    pub state: TaskState,
}

/// Validated change-management export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangeRecord {
    /// Change identifier.
    pub change_id: String,
    /// Optional title.
    #[serde(default)]
    pub title: Option<String>,
    /// Lifecycle state.
    pub state: ChangeState,
    /// Export instant in unix milliseconds.
    #[serde(default)]
    pub exported_at_ms: Option<i64>,
    /// Approvals.
    #[serde(default)]
    pub approvals: Vec<Approval>,
    /// Tasks.
    pub tasks: Vec<ChangeTask>,
}

impl ChangeRecord {
    /// Number of granted approvals.
    #[must_use]
    pub fn granted_approvals(&self) -> usize {
        self.approvals.iter().filter(|approval| approval.state == ApprovalState::Approved).count()
    }

    /// Finds a task by name, ignoring ASCII case.
    #[must_use]
    pub fn task(&self, name: &str) -> Option<&ChangeTask> {
        self.tasks.iter().find(|task| task.name.eq_ignore_ascii_case(name))
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Structural failures of an export.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvidenceValidationError {
    /// The export is not JSON.
    #[error("unparsable evidence: {0}")]
    Unparsable(String),
    /// The export violates the schema.
    #[error("schema violations: {}", .0.join("; "))]
    Schema(Vec<String>),
}

/// Compiles the embedded export schema.
///
/// # Errors
///
/// Returns [`CheckInternalError`] when the embedded schema is malformed.
pub fn compile_export_schema() -> Result<Validator, CheckInternalError> {
    let schema: Value = serde_json::from_str(CHANGE_EXPORT_SCHEMA)
        .map_err(|err| CheckInternalError(format!("export schema is not JSON: {err}")))?;
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .map_err(|err| CheckInternalError(format!("export schema does not compile: {err}")))
}

/// Parses and validates raw export bytes.
///
/// # Errors
///
/// Returns [`EvidenceValidationError`] when the bytes are not JSON or do not
/// satisfy the export schema.
pub fn parse_export(
    validator: &Validator,
    bytes: &[u8],
) -> Result<ChangeRecord, EvidenceValidationError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| EvidenceValidationError::Unparsable(err.to_string()))?;
    let violations: Vec<String> = validator.iter_errors(&value).map(|err| err.to_string()).collect();
    if !violations.is_empty() {
        return Err(EvidenceValidationError::Schema(violations));
    }
    serde_json::from_value(value)
        .map_err(|err| EvidenceValidationError::Schema(vec![err.to_string()]))
}

// ============================================================================
// SECTION: Check
// ============================================================================

/// Change-management check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeManagementCheck;

impl ChangeManagementCheck {
    /// Evaluates the change-management export for the configured reference.
    ///
    /// # Errors
    ///
    /// Returns [`CheckInternalError`] only when the embedded schema is broken.
    pub async fn evaluate(
        self,
        ctx: &ExecutionContext,
    ) -> Result<CheckOutcome, CheckInternalError> {
        let kind = CheckKind::ChangeManagement;
        let policy = ctx.policy().change_management();
        let Some(reference) = policy.params.reference.as_deref() else {
            return Ok(CheckOutcome::red("change management reference missing", Vec::new()));
        };
        let export =
            match ctx.fetch(kind, ctx.adapters().change_management.export(reference)).await {
                Ok(export) => export,
                Err(err) => {
                    return Ok(CheckOutcome::evidence_missing(format!(
                        "change export {reference}: {err}"
                    )));
                }
            };

        let validator = compile_export_schema()?;
        let record = match parse_export(&validator, &export.bytes) {
            Ok(record) => record,
            Err(EvidenceValidationError::Unparsable(detail)) => {
                let evidence = vec![export_evidence(&export, None)];
                return Ok(CheckOutcome::red(format!("unparsable evidence: {detail}"), evidence));
            }
            Err(err @ EvidenceValidationError::Schema(_)) => {
                let evidence = vec![export_evidence(&export, None)];
                return Ok(CheckOutcome::invalid_evidence(err.to_string(), evidence));
            }
        };
        let evidence = vec![export_evidence(&export, Some(&record))];

        if record.change_id != reference {
            return Ok(CheckOutcome::red(
                format!("export is for change {}, expected {reference}", record.change_id),
                evidence,
            ));
        }
        if record.state.is_terminal_failure() {
            return Ok(CheckOutcome::red(
                format!("change {reference} is {}", record.state.as_str()),
                evidence,
            ));
        }
        let granted = record.granted_approvals();
        let needed = usize::try_from(policy.params.min_approvals).unwrap_or(usize::MAX);
        if granted < needed {
            return Ok(CheckOutcome::red(
                format!("change {reference} has {granted} approvals, {needed} required"),
                evidence,
            ));
        }
        let task_name = policy.params.testing_task.as_str();
        let Some(task) = record.task(task_name) else {
            return Ok(CheckOutcome::red(
                format!("change {reference} has no {task_name} task"),
                evidence,
            ));
        };
        if task.state != TaskState::Complete {
            return Ok(CheckOutcome::yellow(
                format!("change {reference} {task_name} task is {}", task.state.as_str()),
                evidence,
            ));
        }

        let exported_at =
            record.exported_at_ms.map_or(export.retrieved_at, Timestamp::from_unix_millis);
        let stale = staleness(
            &format!("change export {reference}"),
            ctx.evaluated_at(),
            exported_at,
            policy.freshness_threshold,
        );
        let outcome = CheckOutcome::green(
            format!("change {reference} approved with {task_name} task complete"),
            evidence,
        );
        Ok(apply_staleness(outcome, stale))
    }
}

/// Evidence for a change export; details are filled once the record validates.
fn export_evidence(export: &ChangeExport, record: Option<&ChangeRecord>) -> Evidence {
    let timestamp = record
        .and_then(|record| record.exported_at_ms)
        .map_or(export.retrieved_at, Timestamp::from_unix_millis);
    let evidence = Evidence::new(
        "change_export",
        SourceSystem::ChangeManagement,
        &export.reference,
        timestamp,
    )
    .with_detail("location", export.location.as_str())
    .with_raw_ref(Some(format!("sha256:{}", sha256_hex(&export.bytes))));
    match record {
        Some(record) => evidence
            .with_detail("state", record.state.as_str())
            .with_detail("approvals", record.granted_approvals()),
        None => evidence,
    }
}
