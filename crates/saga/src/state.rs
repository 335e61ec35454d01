//! Saga state machine.

use serde::{Deserialize, Serialize};

/// The state of an order placement saga.
///
/// State transitions:
/// ```text
/// Reserving ──► Fetching ──► Creating ──► Done
///     │             │            │
///     └─────────────┴────────────┴──► Compensating ──► Failed
/// ```
///
/// A failure before anything was reserved goes straight to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SagaState {
    /// Stock is being reserved item by item.
    #[default]
    Reserving,

    /// Every item is reserved; the restaurant is being looked up.
    Fetching,

    /// The order aggregate is being created.
    Creating,

    /// The order exists (terminal state).
    Done,

    /// Reserved stock is being released.
    Compensating,

    /// The saga gave up (terminal state).
    Failed,
}

impl SagaState {
    pub fn can_transition_to(&self, next: SagaState) -> bool {
        matches!(
            (self, next),
            (SagaState::Reserving, SagaState::Fetching)
                | (SagaState::Fetching, SagaState::Creating)
                | (SagaState::Creating, SagaState::Done)
                | (
                    SagaState::Reserving | SagaState::Fetching | SagaState::Creating,
                    SagaState::Compensating | SagaState::Failed
                )
                | (SagaState::Compensating, SagaState::Failed)
        )
    }

    /// Returns true if the saga can begin compensation.
    pub fn can_compensate(&self) -> bool {
        self.can_transition_to(SagaState::Compensating)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SagaState::Done | SagaState::Failed)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SagaState::Reserving => "Reserving",
            SagaState::Fetching => "Fetching",
            SagaState::Creating => "Creating",
            SagaState::Done => "Done",
            SagaState::Compensating => "Compensating",
            SagaState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for SagaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_reserving() {
        assert_eq!(SagaState::default(), SagaState::Reserving);
    }

    #[test]
    fn test_forward_path() {
        assert!(SagaState::Reserving.can_transition_to(SagaState::Fetching));
        assert!(SagaState::Fetching.can_transition_to(SagaState::Creating));
        assert!(SagaState::Creating.can_transition_to(SagaState::Done));
        assert!(!SagaState::Reserving.can_transition_to(SagaState::Creating));
        assert!(!SagaState::Done.can_transition_to(SagaState::Reserving));
    }

    #[test]
    fn test_can_compensate() {
        assert!(SagaState::Reserving.can_compensate());
        assert!(SagaState::Fetching.can_compensate());
        assert!(SagaState::Creating.can_compensate());
        assert!(!SagaState::Compensating.can_compensate());
        assert!(!SagaState::Done.can_compensate());
        assert!(!SagaState::Failed.can_compensate());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!SagaState::Reserving.is_terminal());
        assert!(!SagaState::Compensating.is_terminal());
        assert!(SagaState::Done.is_terminal());
        assert!(SagaState::Failed.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(SagaState::Reserving.to_string(), "Reserving");
        assert_eq!(SagaState::Compensating.to_string(), "Compensating");
        assert_eq!(SagaState::Done.to_string(), "Done");
    }
}
