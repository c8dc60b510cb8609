use solvebatch_core::error::ProfileError;
use solvebatch_core::launcher::{CommandProfile, InvocationSpec};
use solvebatch_core::task::Task;

use super::{params, require};

const SCRIPT: &str = "D_Augur/d0_ReEDS_augur.py";

/// Python Augur step: `<python> D_Augur/d0_ReEDS_augur.py <case> <year> <year> <timetype> <iteration>`.
pub struct AugurProfile {
    python: String,
}

impl AugurProfile {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }
}

impl CommandProfile for AugurProfile {
    fn name(&self) -> &str {
        "augur"
    }

    fn build(&self, task: &Task) -> Result<InvocationSpec, ProfileError> {
        let timetype = require(task, "augur", params::TIMETYPE)?;
        let iteration = require(task, "augur", params::ITERATION)?;
        let year = task.year.to_string();

        Ok(InvocationSpec::new(self.python.clone()).args([
            SCRIPT,
            task.case_id.as_str(),
            year.as_str(),
            year.as_str(),
            timetype,
            iteration,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn builds_augur_command() {
        let task = Task::new("ref", 2030).with_args(BTreeMap::from([
            ("timetype".to_string(), "seq".to_string()),
            ("iteration".to_string(), "2".to_string()),
            ("restartfile".to_string(), "ref_2028".to_string()),
        ]));
        let spec = AugurProfile::new("/opt/py/bin/python").build(&task).unwrap();
        assert_eq!(
            spec.command_line(),
            "/opt/py/bin/python D_Augur/d0_ReEDS_augur.py ref 2030 2030 seq 2"
        );
    }

    #[test]
    fn iteration_is_required() {
        let task = Task::new("ref", 2030)
            .with_args(BTreeMap::from([("timetype".to_string(), "seq".to_string())]));
        assert_eq!(
            AugurProfile::new("python").build(&task).unwrap_err(),
            ProfileError::MissingParam {
                profile: "augur",
                param: "iteration"
            }
        );
    }
}
