//! Read-only diagnostics for debug tooling.
//!
//! Snapshots describe which states are registered and which path through the
//! hierarchy is currently active. They serialize to JSON so an external
//! inspector can display them; they are never used to restore a machine.

mod snapshot;

pub use snapshot::{MachineSnapshot, StateSnapshot};
