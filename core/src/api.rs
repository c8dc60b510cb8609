//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `solvebatch_core::api` instead of reaching into internal modules.

pub use crate::cancel::CancelToken;
pub use crate::config::{
    apply_env_overrides, load, AppConfig, DispatchConfig, LauncherConfig, LoggingConfig,
    ReportConfig, StdioKind,
};
pub use crate::dispatcher::{
    DispatchOptions, DispatchPhase, DispatchReport, DispatchRequest, Dispatcher, PlannedTask,
    TaskOutcome, TaskReport, WorkerReport,
};
pub use crate::error::{CliError, DispatchError, LaunchError, ProfileError, YearSetError};
pub use crate::launcher::{
    CommandProfile, InvocationResult, InvocationSpec, InvocationStatus, PlatformLauncher,
    ProcessLauncher, StdioMode,
};
pub use crate::report::{render_summary, write_report};
pub use crate::task::Task;
pub use crate::years::YearSet;
