//! Dispatcher lifecycle phases and transition rules.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPhase {
    /// Workers spawned and waiting on the queue.
    Created,
    /// Tasks being enqueued.
    Dispatching,
    /// Waiting until every enqueued task has finished.
    Draining,
    /// Stop messages sent, workers being joined.
    ShuttingDown,
    /// All workers joined.
    Done,
}

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: DispatchPhase,
        to: DispatchPhase,
    },
    #[error("Cannot transition from terminal state {state:?}")]
    FromTerminalState { state: DispatchPhase },
}

pub struct PhaseTransition;

impl PhaseTransition {
    pub fn validate(from: DispatchPhase, to: DispatchPhase) -> Result<(), TransitionError> {
        if Self::is_terminal(from) {
            return Err(TransitionError::FromTerminalState { state: from });
        }

        if Self::next_phase(from) == Some(to) {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition { from, to })
        }
    }

    pub fn next_phase(current: DispatchPhase) -> Option<DispatchPhase> {
        match current {
            DispatchPhase::Created => Some(DispatchPhase::Dispatching),
            DispatchPhase::Dispatching => Some(DispatchPhase::Draining),
            DispatchPhase::Draining => Some(DispatchPhase::ShuttingDown),
            DispatchPhase::ShuttingDown => Some(DispatchPhase::Done),
            DispatchPhase::Done => None,
        }
    }

    pub fn is_terminal(phase: DispatchPhase) -> bool {
        matches!(phase, DispatchPhase::Done)
    }

    pub fn phase_description(phase: DispatchPhase) -> &'static str {
        match phase {
            DispatchPhase::Created => "workers started",
            DispatchPhase::Dispatching => "enqueuing tasks",
            DispatchPhase::Draining => "waiting for tasks",
            DispatchPhase::ShuttingDown => "stopping workers",
            DispatchPhase::Done => "done",
        }
    }
}

/// Current phase plus every phase visited, in order.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    current: DispatchPhase,
    history: Vec<DispatchPhase>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            current: DispatchPhase::Created,
            history: vec![DispatchPhase::Created],
        }
    }

    pub fn current(&self) -> DispatchPhase {
        self.current
    }

    pub fn advance(&mut self, to: DispatchPhase) -> Result<(), TransitionError> {
        PhaseTransition::validate(self.current, to)?;
        tracing::debug!(
            from = ?self.current,
            to = ?to,
            "dispatch phase: {}",
            PhaseTransition::phase_description(to)
        );
        self.current = to;
        self.history.push(to);
        Ok(())
    }

    pub fn into_history(self) -> Vec<DispatchPhase> {
        self.history
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(
            PhaseTransition::validate(DispatchPhase::Created, DispatchPhase::Dispatching).is_ok()
        );
        assert!(
            PhaseTransition::validate(DispatchPhase::Draining, DispatchPhase::ShuttingDown)
                .is_ok()
        );
    }

    #[test]
    fn test_invalid_transitions() {
        // stop messages may never be sent before the drain completes
        assert!(
            PhaseTransition::validate(DispatchPhase::Dispatching, DispatchPhase::ShuttingDown)
                .is_err()
        );
        assert!(PhaseTransition::validate(DispatchPhase::Done, DispatchPhase::Created).is_err());
    }

    #[test]
    fn tracker_records_full_lifecycle() {
        let mut tracker = PhaseTracker::new();
        for phase in [
            DispatchPhase::Dispatching,
            DispatchPhase::Draining,
            DispatchPhase::ShuttingDown,
            DispatchPhase::Done,
        ] {
            tracker.advance(phase).unwrap();
        }
        assert_eq!(tracker.current(), DispatchPhase::Done);
        assert_eq!(tracker.into_history().len(), 5);
    }

    #[test]
    fn tracker_rejects_skipping() {
        let mut tracker = PhaseTracker::new();
        assert!(tracker.advance(DispatchPhase::Draining).is_err());
        assert_eq!(tracker.current(), DispatchPhase::Created);
    }
}
