//! Encounter timeline
//!
//! A timeline is a forward-only chain of timed states declared with
//! [`StateMachineBuilder`]. Each state resolves on a timer, a live condition, or a
//! branch, and may activate or deactivate components on entry and exit. A state
//! that fails to resolve within its safety window drops the machine into
//! `Unknown`, which keeps the encounter running without timeline guidance.

mod builder;
mod error;
mod machine;
mod state;


pub use builder::{StateBuilder, StateMachineBuilder, StateMachineDefinition};
pub use error::StateMachineError;
pub use machine::{MachineStatus, StateMachine, Step, Transition, UpcomingState};
pub use state::{Advance, BranchSelector, ConditionContext, Predicate, State, StateId};
