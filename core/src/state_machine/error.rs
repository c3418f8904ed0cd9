//! Error types for state machine construction

use thiserror::Error;

use super::StateId;

/// A malformed timeline. Only ever produced by `StateMachineBuilder::build`,
/// never during live ticks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateMachineError {
    #[error("state machine has no states")]
    Empty,

    #[error("state {id} is declared more than once")]
    DuplicateState { id: StateId },

    #[error("state {from} transitions to undeclared state {to}")]
    DanglingTransition { from: StateId, to: StateId },

    #[error("state {from} transitions backwards to {to}")]
    BackwardTransition { from: StateId, to: StateId },

    #[error("state {id} has invalid duration {duration}")]
    NegativeDuration { id: StateId, duration: f32 },
}
