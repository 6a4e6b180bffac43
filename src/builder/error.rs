//! Errors reported while assembling a driver.

use crate::hierarchy::{ConfigurationError, TransitionError};
use thiserror::Error;

/// Errors that can occur when building a driver.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(key) before .build()")]
    MissingInitialState,

    #[error("No states registered. Add at least one with .state(key, state)")]
    NoStates,

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Driver configuration has {} problem(s): {}", errors.len(), summarize(errors))]
    Invalid { errors: Vec<ConfigurationError> },

    #[error("Initial state could not be entered: {0}")]
    InitialStateRejected(#[from] TransitionError),
}

fn summarize(errors: &[ConfigurationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
