//! Error types for encounter construction

use thiserror::Error;

use crate::state_machine::StateMachineError;

/// Errors while spawning an encounter for a newly seen boss
#[derive(Debug, Error)]
pub enum EncounterError {
    #[error("invalid timeline for encounter {name}")]
    Definition {
        name: String,
        #[source]
        source: StateMachineError,
    },
}
