//! Bounded worker-pool dispatcher for per-year solver runs.
//!
//! # Lifecycle
//!
//! ```text
//! Created      N workers spawned, each blocked on the shared queue
//!   ↓
//! Dispatching  one Job::Run per eligible year, in year-file order
//!   ↓
//! Draining     wait until every task has *finished* (counting join)
//!   ↓
//! ShuttingDown exactly N Job::Stop sent, every worker joined
//!   ↓
//! Done         DispatchReport returned
//! ```
//!
//! Completion order across workers is unspecified; the report is sorted
//! back into enqueue order. A failing year never stops the others.

mod engine;
mod phase;
mod pool;
mod progress;
pub mod types;

pub use engine::Dispatcher;
pub use phase::{DispatchPhase, PhaseTracker, PhaseTransition, TransitionError};
pub use progress::ProgressMonitor;
pub use types::{
    DispatchOptions, DispatchReport, DispatchRequest, PlannedTask, TaskOutcome, TaskReport,
    WorkerReport,
};
