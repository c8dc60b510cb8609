use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioArg {
    Null,
    Capture,
    Logfile,
}

/// Worker count as given on the command line. `auto` defers to config
/// (`dispatch.default_workers`, `SOLVEBATCH_WORKERS`, then CPU count).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerCount {
    Auto,
    Fixed(usize),
}

impl FromStr for WorkerCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        s.parse::<usize>()
            .map(Self::Fixed)
            .map_err(|_| format!("expected a number or 'auto', got '{s}'"))
    }
}

/// Run one solver invocation per year, N at a time.
#[derive(Parser, Debug)]
#[command(name = "solvebatch", version, about)]
pub struct Args {
    /// Case (scenario) name passed to every invocation.
    pub case: String,

    /// Number of concurrent solver processes, or `auto`.
    pub workers: WorkerCount,

    /// CSV file whose first row lists candidate years.
    pub year_file: PathBuf,

    /// Restart file name forwarded to the solver.
    pub restart_file: String,

    pub start_year: i32,

    pub end_year: i32,

    pub timetype: String,

    pub iteration: String,

    /// Solver variant: augur, reeds_augur, reflow or hourly. Defaults to `launcher.profile`.
    #[arg(long)]
    pub profile: Option<String>,

    /// Extra solver switch (KEY=VALUE), e.g. `--set distpv=1`.
    /// Can be specified multiple times.
    #[arg(long = "set", value_parser = parse_key_val, action = clap::ArgAction::Append)]
    pub set: Vec<(String, String)>,

    /// Kill a year's solver after this many seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, value_enum)]
    pub stdio: Option<StdioArg>,

    /// Directory for per-year logs when `--stdio logfile`.
    #[arg(long)]
    pub log_dir: Option<String>,

    /// Append a JSONL report here (`stdout:` prints it).
    #[arg(long)]
    pub report: Option<String>,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub no_progress: bool,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' in '{s}'"))?;
    let key = k.trim();
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{s}'"));
    }
    Ok((key.to_string(), v.trim().to_string()))
}
