use std::io;
use std::process::{Child, Command};
use std::time::Duration;

use crate::cancel::CancelToken;
use crate::error::LaunchError;

use super::run::run_command;
use super::traits::ProcessLauncher;
use super::types::{InvocationResult, InvocationSpec};

/// Executes the program directly (no shell). On Unix each child leads its
/// own process group so a kill reaches anything it forked, and a terminal
/// Ctrl-C is delivered to us rather than to every solver.
#[derive(Debug, Clone)]
pub struct PosixLauncher {
    poll_interval: Duration,
}

impl PosixLauncher {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }
}

impl Default for PosixLauncher {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}

impl ProcessLauncher for PosixLauncher {
    fn name(&self) -> &str {
        "posix"
    }

    fn launch(
        &self,
        spec: &InvocationSpec,
        cancel: &CancelToken,
    ) -> Result<InvocationResult, LaunchError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        run_command(cmd, spec, cancel, self.poll_interval, kill_group)
    }
}

#[cfg(unix)]
fn kill_group(child: &mut Child) -> io::Result<()> {
    let pgid = libc::pid_t::try_from(child.id())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
    // Safety: killpg only sends a signal; the group is led by our unreaped child.
    let ret = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if ret == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        // group already gone
        Some(libc::ESRCH) => Ok(()),
        _ => Err(err),
    }
}

#[cfg(not(unix))]
fn kill_group(child: &mut Child) -> io::Result<()> {
    super::wait::kill_direct(child)
}
