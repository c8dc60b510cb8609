use crate::cancel::CancelToken;
use crate::error::{LaunchError, ProfileError};
use crate::task::Task;

use super::types::{InvocationResult, InvocationSpec};

/// Runs one external process and blocks the calling thread until it exits,
/// times out, or is cancelled.
pub trait ProcessLauncher: Send + Sync {
    fn name(&self) -> &str;

    fn launch(
        &self,
        spec: &InvocationSpec,
        cancel: &CancelToken,
    ) -> Result<InvocationResult, LaunchError>;
}

/// Turns a year task into the command line of one solver variant.
pub trait CommandProfile: Send + Sync {
    fn name(&self) -> &str;

    fn build(&self, task: &Task) -> Result<InvocationSpec, ProfileError>;
}
