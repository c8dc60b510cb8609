//! Fixed-size worker pool fed by a shared FIFO queue.
//!
//! Workers block on the queue, run one task at a time to completion, and
//! report back on an event channel. A worker leaves its loop only after
//! receiving [`Job::Stop`], so sending exactly one stop per worker after
//! the drain guarantees every worker terminates exactly once.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use crate::cancel::CancelToken;
use crate::error::{DispatchError, LaunchError};
use crate::launcher::ProcessLauncher;

use super::types::{PlannedTask, TaskOutcome, TaskReport, WorkerReport};

pub(crate) enum Job {
    Run(PlannedTask),
    Stop,
}

pub(crate) enum WorkerEvent {
    Started { seq: usize, year: i32, worker: usize },
    Finished(TaskReport),
}

struct WorkerContext {
    id: usize,
    jobs: Arc<Mutex<Receiver<Job>>>,
    events: Sender<WorkerEvent>,
    launcher: Arc<dyn ProcessLauncher>,
    cancel: CancelToken,
}

pub(crate) struct WorkerPool {
    jobs: Sender<Job>,
    handles: Vec<(usize, JoinHandle<WorkerReport>)>,
}

impl WorkerPool {
    /// Spawn `size` workers. If any spawn fails the ones already running
    /// are stopped and joined before the error is returned.
    pub(crate) fn start(
        size: usize,
        launcher: Arc<dyn ProcessLauncher>,
        cancel: &CancelToken,
        events: &Sender<WorkerEvent>,
    ) -> Result<Self, DispatchError> {
        let (job_tx, job_rx) = std::sync::mpsc::channel::<Job>();
        let job_rx = Arc::new(Mutex::new(job_rx));
        let mut pool = Self {
            jobs: job_tx,
            handles: Vec::with_capacity(size),
        };

        for id in 0..size {
            let ctx = WorkerContext {
                id,
                jobs: job_rx.clone(),
                events: events.clone(),
                launcher: launcher.clone(),
                cancel: cancel.clone(),
            };
            let handle = std::thread::Builder::new()
                .name(format!("solvebatch-worker-{id}"))
                .spawn(move || worker_loop(ctx))
                .map_err(|source| DispatchError::WorkerSpawn { worker: id, source })?;
            pool.handles.push((id, handle));
        }

        Ok(pool)
    }

    pub(crate) fn size(&self) -> usize {
        self.handles.len()
    }

    pub(crate) fn submit(&self, task: PlannedTask) -> Result<(), DispatchError> {
        self.jobs
            .send(Job::Run(task))
            .map_err(|_| DispatchError::QueueClosed("enqueuing tasks"))
    }

    /// Send one stop per worker and join them all. Only call after every
    /// submitted task has reported back.
    pub(crate) fn shutdown(mut self) -> Result<Vec<WorkerReport>, DispatchError> {
        let handles = std::mem::take(&mut self.handles);
        for _ in 0..handles.len() {
            // a closed queue means every worker already exited
            let _ = self.jobs.send(Job::Stop);
        }

        let mut reports = Vec::with_capacity(handles.len());
        let mut panicked = None;
        for (id, handle) in handles {
            match handle.join() {
                Ok(report) => reports.push(report),
                Err(_) => {
                    tracing::error!(worker = id, "worker thread panicked");
                    panicked.get_or_insert(id);
                }
            }
        }

        match panicked {
            Some(id) => Err(DispatchError::WorkerPanicked(id)),
            None => Ok(reports),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // error paths: never let worker threads outlive the pool
        if self.handles.is_empty() {
            return;
        }
        for _ in 0..self.handles.len() {
            let _ = self.jobs.send(Job::Stop);
        }
        for (_, handle) in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(ctx: WorkerContext) -> WorkerReport {
    let mut report = WorkerReport::new(ctx.id);
    tracing::trace!(worker = ctx.id, "worker idle");

    loop {
        let job = {
            let rx = ctx.jobs.lock().unwrap_or_else(PoisonError::into_inner);
            rx.recv()
        };

        match job {
            Ok(Job::Run(planned)) => {
                report.tasks_handled += 1;
                let finished = run_task(&ctx, planned);
                if ctx.events.send(WorkerEvent::Finished(finished)).is_err() {
                    tracing::warn!(worker = ctx.id, "dispatcher stopped listening");
                }
            }
            Ok(Job::Stop) => {
                report.stop_signals += 1;
                break;
            }
            Err(_) => {
                tracing::warn!(worker = ctx.id, "job queue closed without a stop message");
                break;
            }
        }
    }

    tracing::trace!(worker = ctx.id, tasks = report.tasks_handled, "worker stopped");
    report
}

fn run_task(ctx: &WorkerContext, planned: PlannedTask) -> TaskReport {
    let PlannedTask { seq, task, spec } = planned;

    let outcome = if ctx.cancel.is_cancelled() {
        TaskOutcome::NotRun {
            reason: "cancelled before start".to_string(),
        }
    } else {
        let _ = ctx.events.send(WorkerEvent::Started {
            seq,
            year: task.year,
            worker: ctx.id,
        });
        tracing::info!(
            worker = ctx.id,
            case = %task.case_id,
            year = task.year,
            command = %spec.command_line(),
            "solve started"
        );

        let launched = catch_unwind(AssertUnwindSafe(|| ctx.launcher.launch(&spec, &ctx.cancel)))
            .unwrap_or_else(|panic| Err(LaunchError::Panicked(panic_message(panic.as_ref()))));
        TaskOutcome::from_launch(launched)
    };

    match &outcome {
        TaskOutcome::Succeeded(r) => {
            tracing::info!(worker = ctx.id, year = task.year, duration_ms = r.duration_ms, "solve finished");
        }
        TaskOutcome::Failed(r) => {
            tracing::warn!(
                worker = ctx.id,
                year = task.year,
                status = ?r.status,
                duration_ms = r.duration_ms,
                "solve failed"
            );
        }
        TaskOutcome::NotRun { reason } => {
            tracing::warn!(worker = ctx.id, year = task.year, reason = %reason, "solve not run");
        }
    }

    TaskReport {
        seq,
        year: task.year,
        worker: ctx.id,
        outcome,
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
