use solvebatch_core::error::ProfileError;
use solvebatch_core::launcher::{CommandProfile, InvocationSpec};
use solvebatch_core::task::Task;

use super::{params, require};

const SCRIPT: &str = "ReEDS_Augur/ReEDS_Augur.py";

/// Standalone ReEDS Augur run with the CSP, demand-response and water
/// switches plus the marginal-resource flags. `marg_dr` is passed twice,
/// in the positions the script reads it from.
pub struct ReedsAugurProfile {
    python: String,
}

impl ReedsAugurProfile {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }
}

impl CommandProfile for ReedsAugurProfile {
    fn name(&self) -> &str {
        "reeds_augur"
    }

    fn build(&self, task: &Task) -> Result<InvocationSpec, ProfileError> {
        const NAME: &str = "reeds_augur";
        let timetype = require(task, NAME, params::TIMETYPE)?;
        let csp = require(task, NAME, params::CSP)?;
        let dr = require(task, NAME, params::DR)?;
        let water = require(task, NAME, params::WATER_SWITCH)?;
        let iteration = require(task, NAME, params::ITERATION)?;
        let marg_vre = require(task, NAME, params::MARG_VRE)?;
        let marg_dr = require(task, NAME, params::MARG_DR)?;
        let marg_stor = require(task, NAME, params::MARG_STOR)?;
        let year = task.year.to_string();

        Ok(InvocationSpec::new(self.python.clone()).args([
            SCRIPT,
            task.case_id.as_str(),
            year.as_str(),
            year.as_str(),
            timetype,
            csp,
            dr,
            water,
            iteration,
            marg_vre,
            marg_dr,
            marg_stor,
            marg_dr,
        ]))
    }
}
