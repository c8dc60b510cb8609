use thiserror::Error;

use crate::dispatcher::TransitionError;

use super::input::YearSetError;
use super::launch::ProfileError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
    #[error("year file error: {0}")]
    YearSet(#[from] YearSetError),
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),
    #[error("command failed: {0}")]
    Command(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("worker count must be at least 1 (got {0})")]
    InvalidWorkerCount(usize),
    #[error("start year {start} is after end year {end}")]
    InvalidYearRange { start: i32, end: i32 },
    #[error("cannot build command: {0}")]
    Profile(#[from] ProfileError),
    #[error("failed to spawn worker thread {worker}: {source}")]
    WorkerSpawn {
        worker: usize,
        source: std::io::Error,
    },
    #[error("worker thread {0} panicked")]
    WorkerPanicked(usize),
    #[error("all workers exited with {missing} task result(s) outstanding")]
    ResultsLost { missing: usize },
    #[error("job queue closed while {0}")]
    QueueClosed(&'static str),
    #[error("phase error: {0}")]
    Phase(#[from] TransitionError),
}

impl DispatchError {
    /// True for errors caused by the caller's input rather than the pool.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::InvalidWorkerCount(_) | Self::InvalidYearRange { .. } | Self::Profile(_)
        )
    }
}
