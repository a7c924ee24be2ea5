use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;

use super::{Suggestion, SuggestionStatus};

/// Lifecycle phase of one suggestion cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseState {
    Idle,
    Capturing,
    IntentDetected,
    ProcessingCloud,
    AwaitingApproval,
    Executing,
    Cooling,
}

impl fmt::Display for PulseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PulseState::Idle => "idle",
            PulseState::Capturing => "capturing",
            PulseState::IntentDetected => "intent_detected",
            PulseState::ProcessingCloud => "processing_cloud",
            PulseState::AwaitingApproval => "awaiting_approval",
            PulseState::Executing => "executing",
            PulseState::Cooling => "cooling",
        };
        write!(f, "{name}")
    }
}

fn allowed(from: PulseState, to: PulseState) -> bool {
    use PulseState::*;

    matches!(
        (from, to),
        (Idle, Capturing)
            | (Capturing, IntentDetected)
            | (Capturing, Idle)
            | (IntentDetected, ProcessingCloud)
            | (IntentDetected, Capturing)
            | (ProcessingCloud, AwaitingApproval)
            | (ProcessingCloud, Idle)
            | (AwaitingApproval, Executing)
            | (AwaitingApproval, Idle)
            | (Executing, Cooling)
            | (Executing, Idle)
            | (Cooling, Idle)
    )
}

struct Inner {
    state: PulseState,
    suggestion: Option<Suggestion>,
}

/// Deterministic state machine owning the cycle phase and the current
/// suggestion behind one lock. All reads return snapshots; the lock is never
/// held across a suspension point.
pub struct PulseMachine {
    inner: Mutex<Inner>,
}

impl PulseMachine {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: PulseState::Idle,
                suggestion: None,
            }),
        }
    }

    pub fn state(&self) -> PulseState {
        self.inner.lock().state
    }

    /// Attempt a transition. Disallowed requests are rejected with a warning
    /// and leave the state untouched. Returning to Idle destroys the current
    /// suggestion. The `(previous, new)` pair is returned for the caller to
    /// publish after the change is visible.
    pub fn transition(&self, to: PulseState) -> Option<(PulseState, PulseState)> {
        let mut inner = self.inner.lock();
        let from = inner.state;

        if !allowed(from, to) {
            drop(inner);
            tracing::warn!("rejected state transition {from} -> {to}");
            return None;
        }

        inner.state = to;
        if to == PulseState::Idle {
            inner.suggestion = None;
        }
        drop(inner);

        tracing::debug!("state {from} -> {to}");
        Some((from, to))
    }

    /// Force the machine back to Idle and drop the suggestion, regardless of
    /// the current state.
    pub fn reset(&self) -> (PulseState, PulseState) {
        let mut inner = self.inner.lock();
        let from = inner.state;
        inner.state = PulseState::Idle;
        inner.suggestion = None;
        drop(inner);

        tracing::info!("machine reset from {from}");
        (from, PulseState::Idle)
    }

    /// Attach the cycle's suggestion. At most one suggestion is live at any
    /// moment; replacing a pending one indicates a driver bug and is logged.
    pub fn set_suggestion(&self, suggestion: Suggestion) {
        let mut inner = self.inner.lock();
        if let Some(existing) = &inner.suggestion {
            if !existing.status.is_terminal() {
                tracing::warn!("replacing live suggestion {}", existing.id);
            }
        }
        inner.suggestion = Some(suggestion);
    }

    /// Snapshot of the current suggestion
    pub fn suggestion(&self) -> Option<Suggestion> {
        self.inner.lock().suggestion.clone()
    }

    /// Update the current suggestion's status, returning the new snapshot
    pub fn update_suggestion_status(&self, status: SuggestionStatus) -> Option<Suggestion> {
        let mut inner = self.inner.lock();
        match &mut inner.suggestion {
            Some(suggestion) => {
                suggestion.status = status;
                Some(suggestion.clone())
            }
            None => None,
        }
    }
}

impl Default for PulseMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionPlan;

    #[test]
    fn test_initial_state_is_idle() {
        let machine = PulseMachine::new();
        assert_eq!(machine.state(), PulseState::Idle);
        assert!(machine.suggestion().is_none());
    }

    #[test]
    fn test_accepted_transitions_land_on_target() {
        let machine = PulseMachine::new();
        let path = [
            PulseState::Capturing,
            PulseState::IntentDetected,
            PulseState::ProcessingCloud,
            PulseState::AwaitingApproval,
            PulseState::Executing,
            PulseState::Cooling,
            PulseState::Idle,
        ];

        for target in path {
            let (_, landed) = machine.transition(target).expect("transition accepted");
            assert_eq!(landed, target);
            assert_eq!(machine.state(), target);
        }
    }

    #[test]
    fn test_rejected_transition_changes_nothing() {
        let machine = PulseMachine::new();

        assert!(machine.transition(PulseState::Executing).is_none());
        assert_eq!(machine.state(), PulseState::Idle);

        machine.transition(PulseState::Capturing).unwrap();
        assert!(machine.transition(PulseState::AwaitingApproval).is_none());
        assert!(machine.transition(PulseState::Capturing).is_none());
        assert_eq!(machine.state(), PulseState::Capturing);
    }

    #[test]
    fn test_capturing_can_fall_back_to_idle() {
        let machine = PulseMachine::new();
        machine.transition(PulseState::Capturing).unwrap();
        assert_eq!(
            machine.transition(PulseState::Idle),
            Some((PulseState::Capturing, PulseState::Idle))
        );
    }

    #[test]
    fn test_returning_to_idle_clears_suggestion() {
        let machine = PulseMachine::new();
        machine.transition(PulseState::Capturing).unwrap();
        machine.transition(PulseState::IntentDetected).unwrap();
        machine.transition(PulseState::ProcessingCloud).unwrap();

        machine.set_suggestion(Suggestion::new("test".into(), 0.9, ActionPlan::default()));
        machine.transition(PulseState::AwaitingApproval).unwrap();
        assert!(machine.suggestion().is_some());

        machine.transition(PulseState::Idle).unwrap();
        assert!(machine.suggestion().is_none());
    }

    #[test]
    fn test_reset_forces_idle_from_any_state() {
        let machine = PulseMachine::new();
        machine.transition(PulseState::Capturing).unwrap();
        machine.transition(PulseState::IntentDetected).unwrap();
        machine.transition(PulseState::ProcessingCloud).unwrap();
        machine.set_suggestion(Suggestion::new("test".into(), 0.9, ActionPlan::default()));

        let (from, to) = machine.reset();
        assert_eq!(from, PulseState::ProcessingCloud);
        assert_eq!(to, PulseState::Idle);
        assert_eq!(machine.state(), PulseState::Idle);
        assert!(machine.suggestion().is_none());
    }

    #[test]
    fn test_update_suggestion_status() {
        let machine = PulseMachine::new();
        assert!(machine
            .update_suggestion_status(SuggestionStatus::Executed)
            .is_none());

        machine.set_suggestion(Suggestion::new("test".into(), 0.9, ActionPlan::default()));
        let updated = machine
            .update_suggestion_status(SuggestionStatus::Executed)
            .unwrap();
        assert_eq!(updated.status, SuggestionStatus::Executed);
        assert_eq!(
            machine.suggestion().unwrap().status,
            SuggestionStatus::Executed
        );
    }
}
