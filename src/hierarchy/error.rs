//! Configuration and transition errors for state registries.

use thiserror::Error;

/// Structural mistakes in how a registry was set up.
///
/// Always recoverable: the offending operation is rejected and the registry
/// keeps its last valid configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("State '{key}' is already registered in '{owner}'")]
    DuplicateKey { owner: String, key: String },

    #[error("Cannot register '{key}' in '{owner}' after it has been entered")]
    RegistrationClosed { owner: String, key: String },

    #[error("Default state '{key}' is not registered in '{owner}'")]
    MissingDefaultChild { owner: String, key: String },

    #[error("'{owner}' has no registered states")]
    NoChildStates { owner: String },

    #[error("Guard registered for unknown state '{key}' in '{owner}'")]
    GuardForUnknownKey { owner: String, key: String },

    #[error("State keys must not be empty")]
    EmptyKey,
}

/// Reasons a requested transition did not happen.
///
/// In every case the previously active state remains active.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("State '{key}' is not registered in '{owner}'")]
    UnknownState { owner: String, key: String },

    #[error("Guard blocked transition from '{from}' to '{to}' in '{owner}'")]
    GuardBlocked {
        owner: String,
        from: String,
        to: String,
    },

    #[error("'{owner}' already transitioned this tick, ignoring request for '{key}'")]
    AlreadyTransitioned { owner: String, key: String },

    #[error("'{owner}' is not active, ignoring request for '{key}'")]
    OwnerInactive { owner: String, key: String },

    #[error("'{owner}' has no previous state to return to")]
    NoPreviousState { owner: String },
}
