use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub launcher: LauncherConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "solvebatch_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Worker count used when the command line does not give one.
    /// Falls back to the number of logical CPUs.
    #[serde(default)]
    pub default_workers: Option<usize>,

    /// Per-task wall clock limit. Unset means wait forever.
    #[serde(default)]
    pub task_timeout_secs: Option<u64>,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_progress")]
    pub progress: bool,
}

fn default_poll_interval_ms() -> u64 {
    200
}

fn default_progress() -> bool {
    true
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_workers: None,
            task_timeout_secs: None,
            poll_interval_ms: default_poll_interval_ms(),
            progress: default_progress(),
        }
    }
}

impl DispatchConfig {
    pub fn workers(&self) -> usize {
        self.default_workers.unwrap_or_else(num_cpus::get).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StdioKind {
    Null,
    Capture,
    #[serde(rename = "logfile")]
    LogFile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default = "default_profile")]
    pub profile: String,

    #[serde(default = "default_python_path")]
    pub python_path: String,

    #[serde(default = "default_gams_path")]
    pub gams_path: String,

    #[serde(default = "default_stdio")]
    pub stdio: StdioKind,

    /// Bytes kept from the end of each stream in `capture` mode.
    #[serde(default = "default_capture_bytes")]
    pub capture_bytes: usize,

    /// Target directory for per-year logs in `logfile` mode.
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Working directory for every invocation. Defaults to the caller's.
    #[serde(default)]
    pub workdir: Option<String>,
}

fn default_profile() -> String {
    "augur".to_string()
}

fn default_python_path() -> String {
    "python".to_string()
}

fn default_gams_path() -> String {
    "gams".to_string()
}

fn default_stdio() -> StdioKind {
    StdioKind::Null
}

fn default_capture_bytes() -> usize {
    65536
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            python_path: default_python_path(),
            gams_path: default_gams_path(),
            stdio: default_stdio(),
            capture_bytes: default_capture_bytes(),
            log_dir: None,
            workdir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    /// JSONL report destination; `stdout:` writes to standard output.
    #[serde(default)]
    pub path: Option<String>,
}
