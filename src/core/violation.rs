//! Lifecycle contract violations.

use thiserror::Error;

/// A lifecycle call that would break the enter/exit pairing of a state.
///
/// The offending call is skipped; the state keeps its previous activity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("State '{state}' entered while already active")]
    AlreadyActive { state: String },

    #[error("State '{state}' received {operation} while inactive")]
    NotActive {
        state: String,
        operation: &'static str,
    },
}
