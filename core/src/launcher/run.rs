use std::process::Command;
use std::time::{Duration, Instant};

use crate::cancel::CancelToken;
use crate::error::LaunchError;

use super::stdio::{configure, StreamCapture};
use super::types::{InvocationResult, InvocationSpec, InvocationStatus};
use super::wait::{terminate, wait_with_deadline, KillFn};

/// Shared spawn-and-wait path used by every platform launcher. `cmd` must
/// already carry the program and its arguments.
pub(crate) fn run_command(
    mut cmd: Command,
    spec: &InvocationSpec,
    cancel: &CancelToken,
    poll_interval: Duration,
    kill: KillFn,
) -> Result<InvocationResult, LaunchError> {
    configure(&mut cmd, spec)?;
    cmd.envs(&spec.envs);
    if let Some(dir) = &spec.workdir {
        cmd.current_dir(dir);
    }

    let started = Instant::now();
    let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
        program: spec.program.clone(),
        source,
    })?;
    tracing::debug!(pid = child.id(), command = %spec.command_line(), "child started");

    let capture = StreamCapture::attach(&mut child, spec);

    let status = match wait_with_deadline(&mut child, spec.timeout, poll_interval, cancel, kill) {
        Ok(status) => status,
        Err(e) => {
            // never leave the child running behind a failed wait
            let _ = terminate(&mut child, kill);
            return Err(LaunchError::Wait(e));
        }
    };

    // a killed child gets no grace; a clean exit may wait out the rest of its timeout
    let reader_deadline = match status {
        InvocationStatus::Exited { .. } => spec.timeout.map(|limit| started + limit),
        InvocationStatus::TimedOut | InvocationStatus::Cancelled => Some(Instant::now()),
    };
    let (stdout_tail, stderr_tail) = capture
        .map(|c| c.finish(reader_deadline, cancel, poll_interval))
        .unwrap_or_default();

    Ok(InvocationResult {
        status,
        duration_ms: started.elapsed().as_millis() as u64,
        stdout_tail,
        stderr_tail,
    })
}
