use crate::dispatcher::{DispatchReport, TaskOutcome, TaskReport};
use crate::launcher::InvocationStatus;

/// Per-year outcome lines followed by a totals line, for the terminal.
pub fn render_summary(report: &DispatchReport) -> Vec<String> {
    let mut lines: Vec<String> = report.results.iter().map(render_task).collect();

    let total = report.results.len();
    let failed = report.failed_years().len();
    let not_run = report.not_run_years().len();
    let mut totals = format!(
        "{}/{} years succeeded ({} failed, {} not run) in {:.1}s",
        total - failed - not_run,
        total,
        failed,
        not_run,
        report.duration_ms as f64 / 1000.0
    );
    if report.cancelled {
        totals.push_str(" [cancelled]");
    }
    lines.push(totals);
    lines
}

fn render_task(task: &TaskReport) -> String {
    let detail = match &task.outcome {
        TaskOutcome::Succeeded(r) => format!("{:.1}s", r.duration_ms as f64 / 1000.0),
        TaskOutcome::Failed(r) => match r.status {
            InvocationStatus::Exited { code } => format!("exit {code}"),
            InvocationStatus::TimedOut => "timed out".to_string(),
            InvocationStatus::Cancelled => "killed on cancel".to_string(),
        },
        TaskOutcome::NotRun { reason } => reason.clone(),
    };
    format!(
        "  {:>4}  {:<7}  worker {:<2}  {}",
        task.year,
        task.outcome.label(),
        task.worker,
        detail
    )
}
