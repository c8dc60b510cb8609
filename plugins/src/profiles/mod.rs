//! Command profiles, one per solver variant. Each turns a year task into
//! the exact argument vector its solver expects; everything else about a
//! batch (pool, queue, waiting) is shared.

mod augur;
mod hourly;
mod reeds_augur;
mod reflow;

pub use augur::AugurProfile;
pub use hourly::HourlyProfile;
pub use reeds_augur::ReedsAugurProfile;
pub use reflow::ReflowProfile;

use solvebatch_core::error::ProfileError;
use solvebatch_core::task::Task;

/// Parameter keys read from `Task::extra_args`.
pub mod params {
    pub const RESTART_FILE: &str = "restartfile";
    pub const TIMETYPE: &str = "timetype";
    pub const ITERATION: &str = "iteration";
    pub const DIST_PV: &str = "distpv";
    pub const CSP: &str = "csp";
    pub const DR: &str = "dr";
    pub const WATER_SWITCH: &str = "waterswitch";
    pub const MARG_VRE: &str = "marg_vre";
    pub const MARG_DR: &str = "marg_dr";
    pub const MARG_STOR: &str = "marg_stor";
}

pub(crate) fn require<'a>(
    task: &'a Task,
    profile: &'static str,
    param: &'static str,
) -> Result<&'a str, ProfileError> {
    task.arg(param)
        .filter(|v| !v.is_empty())
        .ok_or(ProfileError::MissingParam { profile, param })
}
