use std::io;
use std::process::Child;
use std::time::{Duration, Instant};

use crate::cancel::CancelToken;

use super::exit::normalize_exit;
use super::types::InvocationStatus;

/// Platform hook that terminates a running child (and ideally its
/// descendants). Reaping is done by the caller.
pub(crate) type KillFn = fn(&mut Child) -> io::Result<()>;

/// Block until the child exits, the timeout elapses, or cancellation is
/// requested. A child that is killed is always reaped before returning.
pub(crate) fn wait_with_deadline(
    child: &mut Child,
    timeout: Option<Duration>,
    poll_interval: Duration,
    cancel: &CancelToken,
    kill: KillFn,
) -> io::Result<InvocationStatus> {
    let started = Instant::now();
    let poll_interval = poll_interval.max(Duration::from_millis(1));

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(InvocationStatus::Exited {
                code: normalize_exit(status),
            });
        }

        if cancel.is_cancelled() {
            tracing::debug!(pid = child.id(), "killing child on cancel");
            terminate(child, kill)?;
            return Ok(InvocationStatus::Cancelled);
        }

        let mut nap = poll_interval;
        if let Some(limit) = timeout {
            let elapsed = started.elapsed();
            if elapsed >= limit {
                tracing::debug!(pid = child.id(), ?limit, "killing child on timeout");
                terminate(child, kill)?;
                return Ok(InvocationStatus::TimedOut);
            }
            nap = nap.min(limit - elapsed);
        }
        std::thread::sleep(nap);
    }
}

/// Kill and reap. A child that exited between the last poll and the kill
/// is not an error.
pub(crate) fn terminate(child: &mut Child, kill: KillFn) -> io::Result<()> {
    if let Err(e) = kill(child) {
        if e.kind() != io::ErrorKind::InvalidInput {
            return Err(e);
        }
    }
    child.wait()?;
    Ok(())
}

/// Default kill: signal only the direct child.
pub(crate) fn kill_direct(child: &mut Child) -> io::Result<()> {
    child.kill()
}
