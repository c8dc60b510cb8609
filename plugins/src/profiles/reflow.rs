use solvebatch_core::error::ProfileError;
use solvebatch_core::launcher::{CommandProfile, InvocationSpec};
use solvebatch_core::task::Task;

use super::{params, require};

/// GAMS ReFlow curtailment/capacity-credit step.
pub struct ReflowProfile {
    gams: String,
}

impl ReflowProfile {
    pub fn new(gams: impl Into<String>) -> Self {
        Self { gams: gams.into() }
    }
}

impl CommandProfile for ReflowProfile {
    fn name(&self) -> &str {
        "reflow"
    }

    fn build(&self, task: &Task) -> Result<InvocationSpec, ProfileError> {
        let restart = require(task, "reflow", params::RESTART_FILE)?;
        let distpv = require(task, "reflow", params::DIST_PV)?;
        let csp = require(task, "reflow", params::CSP)?;
        let timetype = require(task, "reflow", params::TIMETYPE)?;
        let year = task.year;

        Ok(InvocationSpec::new(self.gams.clone()).args([
            "d_callreflow.gms".to_string(),
            "logOption=2".to_string(),
            "al=1".to_string(),
            "logFile=gamslog.txt".to_string(),
            format!("--restartfile=g00files/{restart}"),
            format!("--case={}", task.case_id),
            format!("--cur_year={year}"),
            format!("--next_year={year}"),
            format!("--DistPVSwitch={distpv}"),
            format!("--calc_csp_cc={csp}"),
            format!("--timetype={timetype}"),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn args(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn builds_reflow_command() {
        let task = Task::new("ref", 2024).with_args(args(&[
            ("restartfile", "ref_2022"),
            ("distpv", "1"),
            ("csp", "0"),
            ("timetype", "int"),
        ]));
        let spec = ReflowProfile::new("gams").build(&task).unwrap();
        assert_eq!(
            spec.args,
            vec![
                "d_callreflow.gms",
                "logOption=2",
                "al=1",
                "logFile=gamslog.txt",
                "--restartfile=g00files/ref_2022",
                "--case=ref",
                "--cur_year=2024",
                "--next_year=2024",
                "--DistPVSwitch=1",
                "--calc_csp_cc=0",
                "--timetype=int",
            ]
        );
    }

    #[test]
    fn distpv_switch_is_required() {
        let task = Task::new("ref", 2024).with_args(args(&[
            ("restartfile", "ref_2022"),
            ("csp", "0"),
            ("timetype", "int"),
        ]));
        let err = ReflowProfile::new("gams").build(&task).unwrap_err();
        assert_eq!(
            err,
            ProfileError::MissingParam {
                profile: "reflow",
                param: "distpv"
            }
        );
    }
}
