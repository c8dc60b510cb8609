//! CLI assembly: merge flag overrides into config, build the dispatcher,
//! run the batch, print the outcome and pick the exit code.
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use solvebatch_core::api as core_api;
use solvebatch_core::api::{AppConfig, CliError, StdioKind};
use solvebatch_plugins::factory::build_profile;
use solvebatch_plugins::profiles::params;

use crate::commands::cli::{Args, StdioArg, WorkerCount};

/// Used for `--stdio logfile` when neither `--log-dir` nor
/// `launcher.log_dir` is set.
const DEFAULT_LOG_DIR: &str = "solvebatch-logs";

/// Exit code when every year succeeded.
pub const EXIT_OK: i32 = 0;
/// Exit code when at least one year failed or never ran.
pub const EXIT_TASK_FAILED: i32 = 1;
/// Exit code after Ctrl-C / SIGTERM.
pub const EXIT_CANCELLED: i32 = 130;

/// Fold command-line flags into the loaded config. Flags win.
pub fn apply_overrides(cfg: &mut AppConfig, args: &Args) {
    if let WorkerCount::Fixed(n) = args.workers {
        cfg.dispatch.default_workers = Some(n);
    }
    if let Some(profile) = &args.profile {
        cfg.launcher.profile = profile.clone();
    }
    if let Some(secs) = args.timeout_secs {
        cfg.dispatch.task_timeout_secs = Some(secs);
    }
    if let Some(stdio) = args.stdio {
        cfg.launcher.stdio = match stdio {
            StdioArg::Null => StdioKind::Null,
            StdioArg::Capture => StdioKind::Capture,
            StdioArg::Logfile => StdioKind::LogFile,
        };
    }
    if let Some(dir) = &args.log_dir {
        cfg.launcher.log_dir = Some(dir.clone());
    }
    if let Some(path) = &args.report {
        cfg.report.path = Some(path.clone());
    }
    if args.no_progress {
        cfg.dispatch.progress = false;
    }
}

/// Switches forwarded to every task. `--set` may add keys but the
/// positional values always win.
pub fn build_params(args: &Args) -> BTreeMap<String, String> {
    let mut out: BTreeMap<String, String> = args.set.iter().cloned().collect();
    out.insert(params::RESTART_FILE.to_string(), args.restart_file.clone());
    out.insert(params::TIMETYPE.to_string(), args.timetype.clone());
    out.insert(params::ITERATION.to_string(), args.iteration.clone());
    out
}

/// Worker count for the request. An explicit `0` is passed through so the
/// dispatcher rejects it.
pub fn worker_count(args: &Args, cfg: &AppConfig) -> usize {
    match args.workers {
        WorkerCount::Fixed(n) => n,
        WorkerCount::Auto => cfg.dispatch.workers(),
    }
}

pub fn dispatch_options(cfg: &AppConfig) -> core_api::DispatchOptions {
    let stdio = match cfg.launcher.stdio {
        StdioKind::Null => core_api::StdioMode::Null,
        StdioKind::Capture => core_api::StdioMode::Capture {
            tail_bytes: cfg.launcher.capture_bytes,
        },
        StdioKind::LogFile => core_api::StdioMode::LogFile {
            dir: PathBuf::from(cfg.launcher.log_dir.as_deref().unwrap_or(DEFAULT_LOG_DIR)),
        },
    };

    core_api::DispatchOptions {
        stdio,
        timeout: cfg.dispatch.task_timeout_secs.map(Duration::from_secs),
        workdir: cfg.launcher.workdir.as_ref().map(PathBuf::from),
        progress: cfg.dispatch.progress && atty::is(atty::Stream::Stderr),
    }
}

pub fn exit_code_for_report(report: &core_api::DispatchReport) -> i32 {
    if report.cancelled {
        EXIT_CANCELLED
    } else if report.is_success() {
        EXIT_OK
    } else {
        EXIT_TASK_FAILED
    }
}

fn print_parameters(
    args: &Args,
    cfg: &AppConfig,
    workers: usize,
    params: &BTreeMap<String, String>,
) {
    eprintln!("Beginning batch run of {} calls using options:", cfg.launcher.profile);
    eprintln!("  Case: {}", args.case);
    eprintln!("  Number of workers: {workers}");
    eprintln!("  Year file: {}", args.year_file.display());
    eprintln!("  Start year: {}", args.start_year);
    eprintln!("  End year: {}", args.end_year);
    for (key, value) in params {
        eprintln!("  {key}: {value}");
    }
}

/// Blocking entry point; runs on a tokio blocking thread.
#[tracing::instrument(name = "cli.run_batch", skip_all, fields(case = %args.case))]
pub fn run_batch(
    args: Args,
    cfg: AppConfig,
    cancel: core_api::CancelToken,
) -> Result<i32, CliError> {
    let years = core_api::YearSet::from_path(&args.year_file)?;
    let profile = build_profile(&cfg.launcher.profile, &cfg.launcher)?;
    let params = build_params(&args);
    let workers = worker_count(&args, &cfg);

    print_parameters(&args, &cfg, workers, &params);

    let launcher = core_api::PlatformLauncher::new(Duration::from_millis(
        cfg.dispatch.poll_interval_ms,
    ));
    let dispatcher = core_api::Dispatcher::new(Arc::new(launcher), Arc::from(profile))
        .with_options(dispatch_options(&cfg))
        .with_cancel(cancel);

    let request = core_api::DispatchRequest {
        case_id: args.case.clone(),
        years,
        worker_count: workers,
        start_year: args.start_year,
        end_year: args.end_year,
        params,
    };
    let report = dispatcher.dispatch(&request)?;

    eprintln!("Batch finished:");
    for line in core_api::render_summary(&report) {
        eprintln!("{line}");
    }

    if let Some(path) = cfg.report.path.as_deref() {
        core_api::write_report(path, &report)?;
    }

    Ok(exit_code_for_report(&report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec![
            "solvebatch", "ref", "2", "years.csv", "ref_2020", "2022", "2026", "seq", "0",
        ];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn flags_override_config() {
        let mut cfg = AppConfig::default();
        apply_overrides(
            &mut cfg,
            &args(&[
                "--profile",
                "hourly",
                "--timeout-secs",
                "600",
                "--stdio",
                "logfile",
                "--log-dir",
                "/tmp/batch",
                "--no-progress",
            ]),
        );
        assert_eq!(cfg.launcher.profile, "hourly");
        assert_eq!(cfg.dispatch.task_timeout_secs, Some(600));
        assert_eq!(cfg.dispatch.default_workers, Some(2));
        assert!(!cfg.dispatch.progress);

        let opts = dispatch_options(&cfg);
        assert_eq!(
            opts.stdio,
            core_api::StdioMode::LogFile {
                dir: PathBuf::from("/tmp/batch")
            }
        );
        assert_eq!(opts.timeout, Some(Duration::from_secs(600)));
        assert!(!opts.progress);
    }

    #[test]
    fn positional_params_beat_set_flags() {
        let params = build_params(&args(&["--set", "restartfile=other", "--set", "distpv=1"]));
        assert_eq!(params.get("restartfile").map(String::as_str), Some("ref_2020"));
        assert_eq!(params.get("distpv").map(String::as_str), Some("1"));
        assert_eq!(params.get("timetype").map(String::as_str), Some("seq"));
        assert_eq!(params.get("iteration").map(String::as_str), Some("0"));
    }

    #[test]
    fn auto_workers_use_config() {
        let mut cfg = AppConfig::default();
        cfg.dispatch.default_workers = Some(5);
        let mut a = args(&[]);
        a.workers = WorkerCount::Auto;
        assert_eq!(worker_count(&a, &cfg), 5);
    }

    #[test]
    fn end_to_end_with_missing_year_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(&[]);
        a.year_file = dir.path().join("absent.csv");
        let err = run_batch(a, AppConfig::default(), core_api::CancelToken::new()).unwrap_err();
        assert!(matches!(err, CliError::YearSet(_)));
    }

    #[cfg(unix)]
    #[test]
    fn end_to_end_with_shell_solver() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let year_file = dir.path().join("years.csv");
        let mut f = std::fs::File::create(&year_file).unwrap();
        writeln!(f, "2020,2022,2024,2026").unwrap();

        // `true` ignores its arguments and exits 0
        let mut cfg = AppConfig::default();
        cfg.launcher.python_path = "true".to_string();
        cfg.dispatch.progress = false;
        cfg.dispatch.poll_interval_ms = 10;
        let report_path = dir.path().join("report.jsonl");
        cfg.report.path = Some(report_path.to_string_lossy().to_string());

        let mut a = args(&[]);
        a.year_file = year_file;

        let code = run_batch(a, cfg, core_api::CancelToken::new()).unwrap();
        assert_eq!(code, EXIT_OK);

        let report = std::fs::read_to_string(report_path).unwrap();
        assert_eq!(report.lines().count(), 4);
    }
}
