use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fully resolved description of one external process call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSpec {
    pub program: String,
    pub args: Vec<String>,
    pub envs: BTreeMap<String, String>,
    pub workdir: Option<PathBuf>,
    pub stdio: StdioMode,
    pub timeout: Option<Duration>,
    /// File stem used by `StdioMode::LogFile`.
    pub log_name: String,
}

impl InvocationSpec {
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        Self {
            log_name: "invocation".to_string(),
            program,
            args: Vec::new(),
            envs: BTreeMap::new(),
            workdir: None,
            stdio: StdioMode::Null,
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.insert(key.into(), value.into());
        self
    }

    /// Human readable command line, for logs only. Not shell-escaped.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Where the child's stdout/stderr go. stdin is always closed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StdioMode {
    /// Discard both streams.
    #[default]
    Null,
    /// Keep the last `tail_bytes` of each stream in memory.
    Capture { tail_bytes: usize },
    /// Append both streams to `<dir>/<log_name>.log`.
    LogFile { dir: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvocationStatus {
    Exited { code: i32 },
    TimedOut,
    Cancelled,
}

impl InvocationStatus {
    pub fn success(&self) -> bool {
        matches!(self, Self::Exited { code: 0 })
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Exited { code } => Some(*code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResult {
    pub status: InvocationStatus,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub stdout_tail: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub stderr_tail: String,
}

impl InvocationResult {
    pub fn new(status: InvocationStatus, duration_ms: u64) -> Self {
        Self {
            status,
            duration_ms,
            stdout_tail: String::new(),
            stderr_tail: String::new(),
        }
    }
}
