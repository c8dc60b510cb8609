#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use solvebatch_core::api::{
    CancelToken, CommandProfile, DispatchOptions, DispatchRequest, Dispatcher, InvocationResult,
    InvocationSpec, InvocationStatus, LaunchError, ProcessLauncher, ProfileError, Task, YearSet,
};

/// Profile that encodes the year as the second argument so fake launchers
/// can tell tasks apart.
pub struct EchoProfile;

impl CommandProfile for EchoProfile {
    fn name(&self) -> &str {
        "echo"
    }

    fn build(&self, task: &Task) -> Result<InvocationSpec, ProfileError> {
        Ok(InvocationSpec::new("fake-solver")
            .arg(task.case_id.clone())
            .arg(task.year.to_string()))
    }
}

/// Profile that requires a `restartfile` param, like the real solver profiles.
pub struct NeedsRestartProfile;

impl CommandProfile for NeedsRestartProfile {
    fn name(&self) -> &str {
        "needs-restart"
    }

    fn build(&self, task: &Task) -> Result<InvocationSpec, ProfileError> {
        let restart = task.arg("restartfile").ok_or(ProfileError::MissingParam {
            profile: "needs-restart",
            param: "restartfile",
        })?;
        Ok(InvocationSpec::new("fake-solver")
            .arg(task.case_id.clone())
            .arg(task.year.to_string())
            .arg(format!("--restartfile={restart}")))
    }
}

/// In-process launcher: records calls, tracks peak concurrency and can be
/// told to fail, refuse to spawn, or panic for particular years.
#[derive(Default)]
pub struct FakeLauncher {
    pub delay: Duration,
    pub fail_years: Vec<i32>,
    pub spawn_error_years: Vec<i32>,
    pub panic_years: Vec<i32>,
    pub cancel_on_year: Option<(i32, CancelToken)>,
    active: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<Vec<(i32, String)>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self, years: &[i32]) -> Self {
        self.fail_years = years.to_vec();
        self
    }

    pub fn unspawnable(mut self, years: &[i32]) -> Self {
        self.spawn_error_years = years.to_vec();
        self
    }

    pub fn panicking(mut self, years: &[i32]) -> Self {
        self.panic_years = years.to_vec();
        self
    }

    /// Trip `token` while `year` is running.
    pub fn cancelling_on(mut self, year: i32, token: CancelToken) -> Self {
        self.cancel_on_year = Some((year, token));
        self
    }

    /// Years launched, in call order.
    pub fn launched_years(&self) -> Vec<i32> {
        self.calls.lock().unwrap().iter().map(|(y, _)| *y).collect()
    }

    pub fn calls(&self) -> Vec<(i32, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

fn year_of(spec: &InvocationSpec) -> i32 {
    spec.args[1].parse().unwrap()
}

impl ProcessLauncher for FakeLauncher {
    fn name(&self) -> &str {
        "fake"
    }

    fn launch(
        &self,
        spec: &InvocationSpec,
        _cancel: &CancelToken,
    ) -> Result<InvocationResult, LaunchError> {
        let year = year_of(spec);
        if self.spawn_error_years.contains(&year) {
            return Err(LaunchError::Spawn {
                program: spec.program.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        if self.panic_years.contains(&year) {
            panic!("solver exploded for {year}");
        }

        self.calls
            .lock()
            .unwrap()
            .push((year, std::thread::current().name().unwrap_or("").to_string()));

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some((trigger, token)) = &self.cancel_on_year {
            if *trigger == year {
                token.cancel();
            }
        }
        std::thread::sleep(self.delay);

        self.active.fetch_sub(1, Ordering::SeqCst);

        let code = if self.fail_years.contains(&year) { 1 } else { 0 };
        Ok(InvocationResult::new(
            InvocationStatus::Exited { code },
            self.delay.as_millis() as u64,
        ))
    }
}

pub fn dispatcher(launcher: Arc<FakeLauncher>) -> Dispatcher {
    Dispatcher::new(launcher, Arc::new(EchoProfile)).with_options(DispatchOptions::default())
}

pub fn request(years: &[i32], start: i32, end: i32, workers: usize) -> DispatchRequest {
    DispatchRequest {
        case_id: "ref".to_string(),
        years: YearSet::new(years.to_vec()),
        worker_count: workers,
        start_year: start,
        end_year: end,
        params: BTreeMap::new(),
    }
}
