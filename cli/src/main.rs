use clap::Parser;
use solvebatch_cli::{app, commands::cli};
use solvebatch_core::api::{self as core_api, CancelToken, CliError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let mut cfg =
        core_api::load(args.config.as_deref()).map_err(|e| CliError::Config(e.to_string()))?;
    app::apply_overrides(&mut cfg, &args);
    init_tracing(&cfg.logging).map_err(CliError::Command)?;

    let cancel = CancelToken::new();
    spawn_signal_watcher(cancel.clone());

    let exit = tokio::task::spawn_blocking(move || app::run_batch(args, cfg, cancel))
        .await
        .map_err(|e| CliError::Command(format!("batch thread failed: {e}")))??;
    Ok(exit)
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: every year succeeded
    // 1: some year failed or did not run (returned as a normal exit code)
    // 11: config error
    // 20: IO error
    // 50: internal/uncategorized
    // 130: cancelled (returned as a normal exit code)
    match e {
        CliError::Config(_) => 11,
        CliError::YearSet(_) => 11,
        CliError::Profile(_) => 11,
        CliError::Dispatch(de) if de.is_config() => 11,
        CliError::Dispatch(_) => 50,
        CliError::Io(_) => 20,
        CliError::Command(_) => 20,
    }
}

/// Ctrl-C or SIGTERM trips the token; the dispatcher kills running
/// solvers, skips the rest and still shuts the pool down.
fn spawn_signal_watcher(cancel: CancelToken) {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("received Ctrl-C");
            }
            _ = wait_for_sigterm() => {
                tracing::warn!("received SIGTERM");
            }
        }
        cancel.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::debug!(error = %e, "SIGTERM handler unavailable");
            std::future::pending::<()>().await
        }
    }
}

/// Windows has no SIGTERM; Ctrl-C is the only interrupt.
#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}

fn init_tracing(logging: &core_api::LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("solvebatch"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("solvebatch.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
