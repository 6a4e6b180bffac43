//! Hierarchical (composite) states.
//!
//! A composite is a state that is itself a small state machine: it owns a
//! registry of named children, keeps exactly one of them active while it is
//! active, and wraps every forwarded call in parent-level hooks.
//!
//! # Ordering
//!
//! - `enter`: parent hook, then the default child is entered
//! - `update`: parent hook (which may switch children), then the child that
//!   is active after the hook
//! - `exit`: active child first, then the parent hook
//! - transitions: old child exits, then new child enters, nothing in between

mod children;
mod composite;
mod error;

pub use children::ChildStates;
pub use composite::{Composite, CompositeBehavior, Propagation};
pub use error::{ConfigurationError, TransitionError};
