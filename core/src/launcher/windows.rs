use std::io;
use std::process::{Child, Command};
use std::time::Duration;

use crate::cancel::CancelToken;
use crate::error::LaunchError;

use super::run::run_command;
use super::traits::ProcessLauncher;
use super::types::{InvocationResult, InvocationSpec};
use super::wait::kill_direct;

/// Runs the program through `cmd /C` so batch wrappers and PATH lookups
/// behave as they do in an interactive console.
#[derive(Debug, Clone)]
pub struct WindowsLauncher {
    poll_interval: Duration,
}

impl WindowsLauncher {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }
}

impl Default for WindowsLauncher {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}

/// Argument vector handed to `cmd`.
pub fn shell_args(spec: &InvocationSpec) -> Vec<String> {
    let mut out = Vec::with_capacity(spec.args.len() + 2);
    out.push("/C".to_string());
    out.push(spec.program.clone());
    out.extend(spec.args.iter().cloned());
    out
}

impl ProcessLauncher for WindowsLauncher {
    fn name(&self) -> &str {
        "windows"
    }

    fn launch(
        &self,
        spec: &InvocationSpec,
        cancel: &CancelToken,
    ) -> Result<InvocationResult, LaunchError> {
        let mut cmd = Command::new("cmd");
        cmd.args(shell_args(spec));
        run_command(cmd, spec, cancel, self.poll_interval, kill_tree)
    }
}

/// `cmd` does not forward termination to its children; taskkill /T does.
fn kill_tree(child: &mut Child) -> io::Result<()> {
    let killed = Command::new("taskkill")
        .args(["/PID", &child.id().to_string(), "/T", "/F"])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false);
    if killed {
        Ok(())
    } else {
        kill_direct(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_program_behind_cmd_c() {
        let spec = InvocationSpec::new("python").args(["d0_ReEDS_augur.py", "ref", "2030"]);
        assert_eq!(
            shell_args(&spec),
            vec!["/C", "python", "d0_ReEDS_augur.py", "ref", "2030"]
        );
    }
}
