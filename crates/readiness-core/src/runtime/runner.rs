// crates/readiness-core/src/runtime/runner.rs
// ============================================================================
// Module: Readiness Runner
// Description: Executes registered checks concurrently and assembles the report.
// Purpose: Tolerate per-check failure, honor cancellation, never drop a check.
// Dependencies: crate::{checks, core, runtime}, tokio
// ============================================================================

//! ## Overview
//! Every registered check runs as its own task over a shared, read-only
//! [`ExecutionContext`]. A semaphore bounds how many evaluate at once. The
//! runner then joins every task in registration order: a full barrier, so no
//! partial verdict is ever produced.
//!
//! Failure handling:
//! - a check returning [`CheckInternalError`](crate::checks::CheckInternalError)
//!   or panicking becomes a RED result for that check only;
//! - on cancellation, checks still waiting for a permit never start, in-flight
//!   checks get a bounded grace period, and anything unfinished afterwards is
//!   aborted and recorded as RED `evaluation incomplete`.
//!
//! The report is assembled only after the barrier and marked incomplete when
//! any check was cut short.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::checks::Check;
use crate::checks::CheckRegistry;
use crate::core::BuildId;
use crate::core::CheckKind;
use crate::core::CheckResult;
use crate::core::CheckTiming;
use crate::core::ReadinessReport;
use crate::core::Timestamp;
use crate::runtime::ExecutionContext;
use crate::runtime::audit::AuditDetail;
use crate::runtime::audit::AuditEvent;
use crate::runtime::audit::AuditSink;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default grace period for in-flight checks after cancellation.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);
/// Default number of checks evaluated at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Failure cause recorded for a check whose task panicked.
const PANIC_CAUSE: &str = "check panicked";

/// Runner execution limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// How long in-flight checks may continue after cancellation.
    pub grace_period: Duration,
    /// Maximum checks evaluated concurrently; zero is treated as one.
    pub max_concurrency: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

// ============================================================================
// SECTION: Cancellation
// ============================================================================

/// Requests cancellation of a run.
#[derive(Debug)]
pub struct CancellationHandle {
    /// Cancellation flag channel.
    sender: watch::Sender<bool>,
}

impl CancellationHandle {
    /// Signals cancellation. Idempotent.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

/// Observes cancellation of a run.
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    /// Cancellation flag channel.
    receiver: watch::Receiver<bool>,
}

impl CancellationSignal {
    /// A signal that never fires.
    #[must_use]
    pub fn never() -> Self {
        let (_sender, receiver) = watch::channel(false);
        Self {
            receiver,
        }
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once cancellation is requested; pends forever if it never is.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.receiver.borrow_and_update() {
                return;
            }
            if self.receiver.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Creates a linked cancellation handle and signal.
#[must_use]
pub fn cancellation() -> (CancellationHandle, CancellationSignal) {
    let (sender, receiver) = watch::channel(false);
    (
        CancellationHandle {
            sender,
        },
        CancellationSignal {
            receiver,
        },
    )
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// What a check task handed back.
enum TaskOutput {
    /// The check produced an outcome.
    Completed(CheckResult),
    /// The check failed internally; the result is already RED.
    Failed(CheckResult, String),
    /// Cancellation arrived before the check started.
    NotStarted,
}

/// Executes a registry of checks and produces the readiness report.
pub struct Runner {
    /// Checks to run, in report order.
    registry: CheckRegistry,
    /// Execution limits.
    config: RunnerConfig,
    /// Audit sink for run events.
    audit: Arc<dyn AuditSink>,
}

impl Runner {
    /// Creates a runner.
    #[must_use]
    pub fn new(registry: CheckRegistry, config: RunnerConfig, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            registry,
            config,
            audit,
        }
    }

    /// Runs every registered check and assembles the report.
    ///
    /// Never fails: every check yields exactly one result, whatever happens to
    /// its task.
    pub async fn run(
        &self,
        ctx: Arc<ExecutionContext>,
        build_id: BuildId,
        cancel: CancellationSignal,
    ) -> ReadinessReport {
        let checks = self.registry.checks();
        self.emit(&build_id, AuditDetail::RunStarted {
            service: ctx.release().service.clone(),
            version: ctx.release().version.clone(),
            checks: checks.iter().map(|check| check.kind().as_str().to_string()).collect(),
        });

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut handles: Vec<JoinHandle<TaskOutput>> = checks
            .iter()
            .map(|check| {
                tokio::spawn(run_check(
                    *check,
                    Arc::clone(&ctx),
                    Arc::clone(&semaphore),
                    cancel.clone(),
                ))
            })
            .collect();

        let mut cancel = cancel;
        let mut deadline: Option<Instant> = None;
        let mut results = Vec::with_capacity(handles.len());
        let mut complete = true;
        for index in 0 .. handles.len() {
            let kind = checks[index].kind();
            let joined = loop {
                if let Some(limit) = deadline {
                    match tokio::time::timeout_at(limit, &mut handles[index]).await {
                        Ok(joined) => break Some(joined),
                        Err(_) => {
                            handles[index].abort();
                            break None;
                        }
                    }
                }
                let settled = tokio::select! {
                    joined = &mut handles[index] => Some(joined),
                    () = cancel.cancelled() => None,
                };
                if let Some(joined) = settled {
                    break Some(joined);
                }
                deadline = Some(Instant::now() + self.config.grace_period);
                let pending = checks[index ..]
                    .iter()
                    .zip(&handles[index ..])
                    .filter(|(_, handle)| !handle.is_finished())
                    .map(|(check, _)| check.kind().as_str().to_string())
                    .collect();
                self.emit(&build_id, AuditDetail::RunCancelled {
                    pending,
                    grace_period_ms: duration_ms(self.config.grace_period),
                });
            };
            let result = match joined {
                Some(Ok(TaskOutput::Completed(result))) => result,
                Some(Ok(TaskOutput::Failed(result, cause))) => {
                    self.emit(&build_id, AuditDetail::CheckFailed {
                        check_id: kind.as_str().to_string(),
                        cause,
                    });
                    result
                }
                Some(Err(err)) if err.is_panic() => {
                    let cause = PANIC_CAUSE.to_string();
                    self.emit(&build_id, AuditDetail::CheckFailed {
                        check_id: kind.as_str().to_string(),
                        cause: cause.clone(),
                    });
                    let now = Timestamp::now();
                    CheckResult::internal_failure(
                        kind.id(),
                        kind.display_name(),
                        ctx.policy().is_required(kind),
                        &cause,
                        CheckTiming::new(now, now),
                    )
                }
                Some(Ok(TaskOutput::NotStarted) | Err(_)) | None => {
                    complete = false;
                    incomplete_result(&ctx, kind)
                }
            };
            self.emit(&build_id, AuditDetail::CheckCompleted {
                check_id: result.id().to_string(),
                status: result.status(),
                required: result.required(),
                duration_ms: result.duration_ms(),
                reason_count: result.reasons().len(),
            });
            results.push(result);
        }

        let report = ReadinessReport::assemble(
            ctx.release().clone(),
            results,
            ctx.policy(),
            Timestamp::now(),
            build_id.clone(),
            complete,
        );
        let counts = report.summary();
        self.emit(&build_id, AuditDetail::RunCompleted {
            overall_status: report.overall_status(),
            complete: report.is_complete(),
            red: counts.red,
            yellow: counts.yellow,
            green: counts.green,
        });
        report
    }

    /// Records an audit event.
    fn emit(&self, build_id: &BuildId, detail: AuditDetail) {
        self.audit.record(&AuditEvent::new(build_id, detail));
    }
}

/// Body of one check task.
async fn run_check(
    check: Check,
    ctx: Arc<ExecutionContext>,
    semaphore: Arc<Semaphore>,
    mut cancel: CancellationSignal,
) -> TaskOutput {
    let permit = tokio::select! {
        biased;
        () = cancel.cancelled() => return TaskOutput::NotStarted,
        permit = semaphore.acquire_owned() => permit,
    };
    let Ok(_permit) = permit else {
        return TaskOutput::NotStarted;
    };
    let kind = check.kind();
    let required = ctx.policy().is_required(kind);
    let started_at = Timestamp::now();
    let outcome = check.run(&ctx).await;
    let timing = CheckTiming::new(started_at, Timestamp::now());
    match outcome {
        Ok(outcome) => TaskOutput::Completed(CheckResult::from_outcome(
            kind.id(),
            kind.display_name(),
            required,
            outcome,
            timing,
        )),
        Err(err) => {
            let cause = err.to_string();
            let result = CheckResult::internal_failure(
                kind.id(),
                kind.display_name(),
                required,
                &cause,
                timing,
            );
            TaskOutput::Failed(result, cause)
        }
    }
}

/// RED `evaluation incomplete` result for a check cut short by cancellation.
fn incomplete_result(ctx: &ExecutionContext, kind: CheckKind) -> CheckResult {
    let now = Timestamp::now();
    CheckResult::incomplete(
        kind.id(),
        kind.display_name(),
        ctx.policy().is_required(kind),
        CheckTiming::new(now, now),
    )
}

/// Milliseconds in a duration, saturating.
fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
