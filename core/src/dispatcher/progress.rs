use std::collections::HashMap;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Terminal progress for a dispatch: one overall bar plus a spinner per
/// task that is currently solving. Only the dispatching thread touches it.
pub struct ProgressMonitor {
    multi: MultiProgress,
    overall: ProgressBar,
    year_bars: HashMap<usize, ProgressBar>,
    enabled: bool,
}

impl ProgressMonitor {
    pub fn new(total_tasks: usize, enabled: bool) -> Self {
        if !enabled {
            return Self::hidden();
        }

        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::stderr());
        let overall = multi.add(ProgressBar::new(total_tasks as u64));

        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} years ({percent}%) {msg}")
        {
            overall.set_style(style.progress_chars("█▓▒░  "));
        }
        overall.set_message("starting...");

        Self {
            multi,
            overall,
            year_bars: HashMap::new(),
            enabled: true,
        }
    }

    pub fn hidden() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            overall: ProgressBar::hidden(),
            year_bars: HashMap::new(),
            enabled: false,
        }
    }

    pub fn start_year(&mut self, seq: usize, year: i32, worker: usize) {
        if !self.enabled {
            return;
        }

        let bar = self.multi.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.green} {msg}") {
            bar.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
        }
        bar.set_message(format!("{year} (worker {worker})"));
        bar.enable_steady_tick(Duration::from_millis(100));

        self.year_bars.insert(seq, bar);
    }

    pub fn finish_year(&mut self, seq: usize, year: i32, label: &str, duration_ms: u64) {
        if !self.enabled {
            return;
        }

        if let Some(bar) = self.year_bars.remove(&seq) {
            bar.finish_with_message(format!("{year} {label} ({duration_ms}ms)"));
        }

        self.overall.inc(1);
    }

    pub fn set_message(&self, msg: &str) {
        if self.enabled {
            self.overall.set_message(msg.to_string());
        }
    }

    pub fn finish(&self, success: bool) {
        if !self.enabled {
            return;
        }

        let msg = if success {
            "all years solved"
        } else {
            "some years failed"
        };

        self.overall.finish_with_message(msg.to_string());
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        for (_, bar) in self.year_bars.drain() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_monitor_is_inert() {
        let mut monitor = ProgressMonitor::new(3, false);
        monitor.start_year(0, 2030, 0);
        monitor.finish_year(0, 2030, "ok", 100);
        monitor.set_message("test");
        monitor.finish(true);
        assert!(monitor.year_bars.is_empty());
    }

    #[test]
    fn finished_years_leave_the_spinner_map() {
        let mut monitor = ProgressMonitor::new(2, true);
        monitor.start_year(0, 2030, 0);
        monitor.start_year(1, 2035, 1);
        monitor.finish_year(0, 2030, "ok", 100);
        assert_eq!(monitor.year_bars.len(), 1);
        monitor.finish_year(1, 2035, "failed", 200);
        monitor.finish(false);
        assert!(monitor.year_bars.is_empty());
    }
}
