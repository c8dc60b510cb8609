use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::Local;
use serde::Serialize;

use crate::dispatcher::{DispatchReport, TaskReport};

/// One line of the JSONL report.
#[derive(Debug, Serialize)]
pub struct ReportLine<'a> {
    pub v: i32,
    #[serde(rename = "type")]
    pub event_type: &'static str,
    pub ts: String,
    pub run_id: &'a str,
    pub case: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<&'a TaskReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<serde_json::Value>,
}

/// Write one `task.end` line per year in enqueue order, then a `run.end`
/// summary line.
pub fn write_jsonl<W: Write>(mut writer: W, report: &DispatchReport) -> io::Result<()> {
    let ts = Local::now().to_rfc3339();

    for task in &report.results {
        let line = ReportLine {
            v: 1,
            event_type: "task.end",
            ts: ts.clone(),
            run_id: &report.run_id,
            case: &report.case_id,
            task: Some(task),
            summary: None,
        };
        serde_json::to_writer(&mut writer, &line)?;
        writer.write_all(b"\n")?;
    }

    let summary = ReportLine {
        v: 1,
        event_type: "run.end",
        ts,
        run_id: &report.run_id,
        case: &report.case_id,
        task: None,
        summary: Some(serde_json::json!({
            "started_at": report.started_at.to_rfc3339(),
            "duration_ms": report.duration_ms,
            "worker_count": report.worker_count,
            "planned": report.planned_years,
            "succeeded": report.succeeded_years(),
            "failed": report.failed_years(),
            "not_run": report.not_run_years(),
            "cancelled": report.cancelled,
        })),
    };
    serde_json::to_writer(&mut writer, &summary)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Append the report to `path`, or print it when `path` is `stdout:`.
pub fn write_report(path: &str, report: &DispatchReport) -> io::Result<()> {
    if path == "stdout:" {
        let stdout = io::stdout();
        return write_jsonl(stdout.lock(), report);
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    write_jsonl(BufWriter::new(file), report)?;
    tracing::debug!(path = %path.display(), "report written");
    Ok(())
}
