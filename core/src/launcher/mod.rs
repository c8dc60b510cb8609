//! Process launching.
//!
//! Workers only see the [`ProcessLauncher`] trait. Each platform gets one
//! implementation that spawns the solver with its streams redirected and
//! blocks the calling worker until the child exits; [`PlatformLauncher`]
//! picks the right one at build time.

mod exit;
mod posix;
mod run;
mod stdio;
mod traits;
pub mod types;
mod wait;
mod windows;

pub use exit::normalize_exit;
pub use posix::PosixLauncher;
pub use traits::{CommandProfile, ProcessLauncher};
pub use types::{InvocationResult, InvocationSpec, InvocationStatus, StdioMode};
pub use windows::{shell_args, WindowsLauncher};

#[cfg(not(windows))]
pub type PlatformLauncher = PosixLauncher;

#[cfg(windows)]
pub type PlatformLauncher = WindowsLauncher;
