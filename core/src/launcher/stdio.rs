use std::fs::OpenOptions;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::cancel::CancelToken;
use crate::error::LaunchError;
use crate::util::RingBytes;

use super::types::{InvocationSpec, StdioMode};

const PUMP_CHUNK: usize = 8 * 1024;

/// Wire the child's standard streams according to `spec.stdio`.
pub(crate) fn configure(cmd: &mut Command, spec: &InvocationSpec) -> Result<(), LaunchError> {
    cmd.stdin(Stdio::null());
    match &spec.stdio {
        StdioMode::Null => {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }
        StdioMode::Capture { .. } => {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }
        StdioMode::LogFile { dir } => {
            let path = dir.join(format!("{}.log", spec.log_name));
            let log_err = |source| LaunchError::LogFile {
                path: path.clone(),
                source,
            };
            std::fs::create_dir_all(dir).map_err(log_err)?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(log_err)?;
            let err_file = file.try_clone().map_err(log_err)?;
            cmd.stdout(Stdio::from(file)).stderr(Stdio::from(err_file));
        }
    }
    Ok(())
}

/// Background readers draining a captured child's pipes.
pub(crate) struct StreamCapture {
    ring_out: Arc<RingBytes>,
    ring_err: Arc<RingBytes>,
    pumps: Vec<JoinHandle<()>>,
}

impl StreamCapture {
    /// Start pumping if the spec asked for capture. Must run right after
    /// spawn so the child never blocks on a full pipe.
    pub(crate) fn attach(child: &mut Child, spec: &InvocationSpec) -> Option<Self> {
        let StdioMode::Capture { tail_bytes } = spec.stdio else {
            return None;
        };
        let ring_out = RingBytes::new(tail_bytes);
        let ring_err = RingBytes::new(tail_bytes);
        let mut pumps = Vec::with_capacity(2);
        if let Some(out) = child.stdout.take() {
            pumps.push(pump(out, ring_out.clone()));
        }
        if let Some(err) = child.stderr.take() {
            pumps.push(pump(err, ring_err.clone()));
        }
        Some(Self {
            ring_out,
            ring_err,
            pumps,
        })
    }

    /// Collect the tails. A background grandchild may keep a pipe open
    /// after the child exits, so readers are only waited on until
    /// `deadline` passes or `cancel` trips; stragglers are left detached.
    pub(crate) fn finish(
        self,
        deadline: Option<Instant>,
        cancel: &CancelToken,
        poll_interval: Duration,
    ) -> (String, String) {
        loop {
            if self.pumps.iter().all(JoinHandle::is_finished) {
                for handle in self.pumps {
                    let _ = handle.join();
                }
                break;
            }
            let now = Instant::now();
            let expired = deadline.is_some_and(|d| now >= d);
            if expired || cancel.is_cancelled() {
                tracing::debug!(expired, "output pipes still open, not waiting for readers");
                break;
            }
            let mut nap = poll_interval.max(Duration::from_millis(1));
            if let Some(d) = deadline {
                nap = nap.min(d - now);
            }
            std::thread::sleep(nap);
        }
        (
            self.ring_out.to_string_lossy(),
            self.ring_err.to_string_lossy(),
        )
    }
}

fn pump<R: Read + Send + 'static>(mut reader: R, ring: Arc<RingBytes>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut buf = [0u8; PUMP_CHUNK];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => ring.push(&buf[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::debug!(error = %e, "stream pump stopped");
                    break;
                }
            }
        }
    })
}
