use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::LaunchError;
use crate::launcher::{InvocationResult, InvocationSpec, StdioMode};
use crate::task::Task;
use crate::years::YearSet;

use super::phase::DispatchPhase;

/// Everything the caller supplies for one batch.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub case_id: String,
    pub years: YearSet,
    pub worker_count: usize,
    /// Inclusive lower bound.
    pub start_year: i32,
    /// Inclusive upper bound.
    pub end_year: i32,
    /// Switches forwarded to every task (restart file, timetype, ...).
    pub params: BTreeMap<String, String>,
}

impl DispatchRequest {
    pub fn eligible_years(&self) -> Vec<i32> {
        self.years.eligible(self.start_year, self.end_year)
    }
}

/// Launch settings applied to every planned invocation.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    pub stdio: StdioMode,
    pub timeout: Option<Duration>,
    pub workdir: Option<PathBuf>,
    pub progress: bool,
}

impl DispatchOptions {
    pub(crate) fn apply(&self, spec: &mut InvocationSpec, task: &Task) {
        spec.stdio = self.stdio.clone();
        spec.log_name = task.label();
        if spec.timeout.is_none() {
            spec.timeout = self.timeout;
        }
        if spec.workdir.is_none() {
            spec.workdir = self.workdir.clone();
        }
    }
}

/// A task paired with its resolved command line. `seq` is the enqueue
/// position.
#[derive(Debug, Clone)]
pub struct PlannedTask {
    pub seq: usize,
    pub task: Task,
    pub spec: InvocationSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// The process ran and exited with status 0.
    Succeeded(InvocationResult),
    /// The process ran but exited non-zero, timed out, or was killed.
    Failed(InvocationResult),
    /// The process was never started.
    NotRun { reason: String },
}

impl TaskOutcome {
    pub fn from_launch(launched: Result<InvocationResult, LaunchError>) -> Self {
        match launched {
            Ok(result) if result.status.success() => Self::Succeeded(result),
            Ok(result) => Self::Failed(result),
            Err(e) => Self::NotRun {
                reason: e.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    pub fn invocation(&self) -> Option<&InvocationResult> {
        match self {
            Self::Succeeded(r) | Self::Failed(r) => Some(r),
            Self::NotRun { .. } => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Succeeded(_) => "ok",
            Self::Failed(_) => "failed",
            Self::NotRun { .. } => "not run",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskReport {
    pub seq: usize,
    pub year: i32,
    pub worker: usize,
    #[serde(flatten)]
    pub outcome: TaskOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub worker_id: usize,
    /// Tasks dequeued, whether or not a process was started for them.
    pub tasks_handled: usize,
    pub stop_signals: usize,
}

impl WorkerReport {
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            tasks_handled: 0,
            stop_signals: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    pub run_id: String,
    pub case_id: String,
    pub worker_count: usize,
    pub planned_years: Vec<i32>,
    /// Sorted by enqueue order.
    pub results: Vec<TaskReport>,
    pub workers: Vec<WorkerReport>,
    pub phases: Vec<DispatchPhase>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub cancelled: bool,
}

impl DispatchReport {
    fn years_where(&self, pred: impl Fn(&TaskOutcome) -> bool) -> Vec<i32> {
        self.results
            .iter()
            .filter(|r| pred(&r.outcome))
            .map(|r| r.year)
            .collect()
    }

    pub fn succeeded_years(&self) -> Vec<i32> {
        self.years_where(TaskOutcome::is_success)
    }

    pub fn failed_years(&self) -> Vec<i32> {
        self.years_where(|o| matches!(o, TaskOutcome::Failed(_)))
    }

    pub fn not_run_years(&self) -> Vec<i32> {
        self.years_where(|o| matches!(o, TaskOutcome::NotRun { .. }))
    }

    /// Number of tasks for which a process was actually started.
    pub fn launched(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome.invocation().is_some())
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_success())
    }
}
