//! Core state machine types.
//!
//! This module contains the building blocks every other module uses:
//! - Behavior units via the `State` trait
//! - `StateSlot`, which owns a state and tracks whether it is active
//! - Guard predicates for transition control
//! - Bounded transition history

mod guard;
mod history;
mod slot;
mod state;
mod violation;

pub use guard::Guard;
pub use history::{TransitionHistory, TransitionRecord};
pub use slot::StateSlot;
pub use state::{AsAny, State};
pub use violation::ContractViolation;
