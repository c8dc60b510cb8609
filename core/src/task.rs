use std::collections::BTreeMap;

use serde::Serialize;

/// One year's worth of solver work. Built by the dispatcher and never
/// modified after it is queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub case_id: String,
    pub year: i32,
    pub extra_args: BTreeMap<String, String>,
}

impl Task {
    pub fn new(case_id: impl Into<String>, year: i32) -> Self {
        Self {
            case_id: case_id.into(),
            year,
            extra_args: BTreeMap::new(),
        }
    }

    pub fn with_args(mut self, extra_args: BTreeMap<String, String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    pub fn arg(&self, key: &str) -> Option<&str> {
        self.extra_args.get(key).map(String::as_str)
    }

    /// Stable label used for log file names and progress lines.
    pub fn label(&self) -> String {
        format!("{}_{}", self.case_id, self.year)
    }
}
