use std::path::PathBuf;

use thiserror::Error;

/// Errors that prevent an external process from running to completion
/// under our control. A non-zero exit is not an error here; it is an
/// outcome recorded in the task report.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("spawn failed for {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("waiting on child failed: {0}")]
    Wait(#[source] std::io::Error),

    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("launcher panicked: {0}")]
    Panicked(String),
}

/// Errors raised while turning a task into a command line.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProfileError {
    #[error("unknown command profile: {0}")]
    UnknownProfile(String),

    #[error("profile '{profile}' requires parameter '{param}'")]
    MissingParam {
        profile: &'static str,
        param: &'static str,
    },
}
