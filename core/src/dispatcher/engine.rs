use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::error::DispatchError;
use crate::launcher::{CommandProfile, ProcessLauncher};
use crate::task::Task;

use super::phase::{DispatchPhase, PhaseTracker};
use super::pool::{WorkerEvent, WorkerPool};
use super::progress::ProgressMonitor;
use super::types::{DispatchOptions, DispatchReport, DispatchRequest, PlannedTask, TaskReport};

/// Runs one solver invocation per eligible year on a bounded pool of
/// worker threads and returns once every year has been attempted.
pub struct Dispatcher {
    launcher: Arc<dyn ProcessLauncher>,
    profile: Arc<dyn CommandProfile>,
    options: DispatchOptions,
    cancel: CancelToken,
}

impl Dispatcher {
    pub fn new(launcher: Arc<dyn ProcessLauncher>, profile: Arc<dyn CommandProfile>) -> Self {
        Self {
            launcher,
            profile,
            options: DispatchOptions::default(),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Resolve the invocations a request would launch, in enqueue order,
    /// without starting anything.
    pub fn plan(&self, request: &DispatchRequest) -> Result<Vec<PlannedTask>, DispatchError> {
        validate(request)?;
        request
            .eligible_years()
            .into_iter()
            .enumerate()
            .map(|(seq, year)| {
                let task = Task::new(request.case_id.clone(), year).with_args(request.params.clone());
                let mut spec = self.profile.build(&task)?;
                self.options.apply(&mut spec, &task);
                Ok(PlannedTask { seq, task, spec })
            })
            .collect()
    }

    #[tracing::instrument(
        name = "dispatch",
        skip_all,
        fields(case = %request.case_id, workers = request.worker_count)
    )]
    pub fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReport, DispatchError> {
        let planned = self.plan(request)?;
        let planned_years: Vec<i32> = planned.iter().map(|p| p.task.year).collect();
        let expected = planned.len();
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let start = Instant::now();

        tracing::info!(
            run_id = %run_id,
            profile = self.profile.name(),
            launcher = self.launcher.name(),
            tasks = expected,
            "dispatch starting"
        );

        let mut phases = PhaseTracker::new();
        let (event_tx, event_rx) = mpsc::channel::<WorkerEvent>();
        let pool = WorkerPool::start(
            request.worker_count,
            self.launcher.clone(),
            &self.cancel,
            &event_tx,
        )?;
        // only workers hold senders now, so a closed channel means they all exited
        drop(event_tx);

        let mut progress = ProgressMonitor::new(expected, self.options.progress);

        phases.advance(DispatchPhase::Dispatching)?;
        for task in planned {
            pool.submit(task)?;
        }

        phases.advance(DispatchPhase::Draining)?;
        let results = drain(&event_rx, expected, &mut progress);
        let missing = expected - results.len();

        phases.advance(DispatchPhase::ShuttingDown)?;
        let worker_count = pool.size();
        let workers = pool.shutdown()?;
        phases.advance(DispatchPhase::Done)?;

        if missing > 0 {
            return Err(DispatchError::ResultsLost { missing });
        }

        let mut results = results;
        results.sort_by_key(|r| r.seq);

        let report = DispatchReport {
            run_id,
            case_id: request.case_id.clone(),
            worker_count,
            planned_years,
            results,
            workers,
            phases: phases.into_history(),
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            cancelled: self.cancel.is_cancelled(),
        };
        progress.finish(report.is_success());

        tracing::info!(
            succeeded = report.succeeded_years().len(),
            failed = report.failed_years().len(),
            not_run = report.not_run_years().len(),
            duration_ms = report.duration_ms,
            "dispatch finished"
        );
        Ok(report)
    }
}

fn validate(request: &DispatchRequest) -> Result<(), DispatchError> {
    if request.worker_count < 1 {
        return Err(DispatchError::InvalidWorkerCount(request.worker_count));
    }
    if request.start_year > request.end_year {
        return Err(DispatchError::InvalidYearRange {
            start: request.start_year,
            end: request.end_year,
        });
    }
    Ok(())
}

/// Counting join barrier: returns once `expected` tasks have finished, not
/// merely been dequeued, or every worker has gone away.
fn drain(
    events: &mpsc::Receiver<WorkerEvent>,
    expected: usize,
    progress: &mut ProgressMonitor,
) -> Vec<TaskReport> {
    let mut results = Vec::with_capacity(expected);
    while results.len() < expected {
        match events.recv() {
            Ok(WorkerEvent::Started { seq, year, worker }) => {
                progress.start_year(seq, year, worker);
            }
            Ok(WorkerEvent::Finished(report)) => {
                let duration_ms = report
                    .outcome
                    .invocation()
                    .map(|r| r.duration_ms)
                    .unwrap_or(0);
                progress.finish_year(report.seq, report.year, report.outcome.label(), duration_ms);
                results.push(report);
                progress.set_message(&format!("{}/{} done", results.len(), expected));
            }
            Err(_) => {
                tracing::error!(
                    finished = results.len(),
                    expected,
                    "all workers exited before the queue drained"
                );
                break;
            }
        }
    }
    results
}
