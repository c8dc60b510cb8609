use solvebatch_core::error::ProfileError;
use solvebatch_core::launcher::{CommandProfile, InvocationSpec};
use solvebatch_core::task::Task;

use super::{params, require};

/// GAMS 8760 hourly dispatch step. Restart, listing and log files live
/// under the case's run directory.
pub struct HourlyProfile {
    gams: String,
}

impl HourlyProfile {
    pub fn new(gams: impl Into<String>) -> Self {
        Self { gams: gams.into() }
    }
}

impl CommandProfile for HourlyProfile {
    fn name(&self) -> &str {
        "hourly"
    }

    fn build(&self, task: &Task) -> Result<InvocationSpec, ProfileError> {
        let restart = require(task, "hourly", params::RESTART_FILE)?;
        let run_dir = format!("E_Outputs/runs/{}", task.case_id);
        let year = task.year;

        Ok(InvocationSpec::new(self.gams.clone()).args([
            "D_8760/d2_call8760.gms".to_string(),
            format!("--restartfile={run_dir}/g00files/{restart}"),
            format!("o={run_dir}/lstfiles/d2_call8760.lst"),
            format!("--case={}", task.case_id),
            format!("--cur_year={year}"),
            format!("--next_year={year}"),
            "logOption=4".to_string(),
            format!("logFile={run_dir}/8760log.txt"),
            "appendLog=1".to_string(),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn paths_are_scoped_to_the_case_run_dir() {
        let task = Task::new("hi_re", 2036).with_args(BTreeMap::from([(
            "restartfile".to_string(),
            "hi_re_2034".to_string(),
        )]));
        let spec = HourlyProfile::new("gams").build(&task).unwrap();
        assert_eq!(
            spec.command_line(),
            "gams D_8760/d2_call8760.gms \
             --restartfile=E_Outputs/runs/hi_re/g00files/hi_re_2034 \
             o=E_Outputs/runs/hi_re/lstfiles/d2_call8760.lst \
             --case=hi_re --cur_year=2036 --next_year=2036 \
             logOption=4 logFile=E_Outputs/runs/hi_re/8760log.txt appendLog=1"
        );
    }

    #[test]
    fn empty_restart_file_counts_as_missing() {
        let task = Task::new("hi_re", 2036)
            .with_args(BTreeMap::from([("restartfile".to_string(), String::new())]));
        assert!(HourlyProfile::new("gams").build(&task).is_err());
    }
}
