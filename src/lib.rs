//! Statecraft: a hierarchical state machine runtime
//!
//! Statecraft drives frame-based behaviors (game AI, UI flows, device modes)
//! as a tree of states. A host calls `update` once per tick; the active state
//! runs, and composite states forward the tick to their own active child
//! after running a parent-level hook that may switch children.
//!
//! # Core Concepts
//!
//! - **State**: a behavior unit with `enter`, `exit` and `update` via the `State` trait
//! - **Composite**: a state that owns named children, exactly one active at a time
//! - **Driver**: the top-level owner of the states and the context for one entity
//! - **Guards** and **Rules**: predicates over the context that veto or trigger transitions
//!
//! Every lifecycle call receives the context as `&mut C`; states never store it.
//!
//! # Example
//!
//! ```rust
//! use statecraft::{ChildStates, Composite, CompositeBehavior, ConfigurationError, DriverBuilder};
//! use statecraft::builder::FnState;
//!
//! #[derive(Default)]
//! struct Npc {
//!     noise: u32,
//!     log: Vec<String>,
//! }
//!
//! struct Wander;
//!
//! impl CompositeBehavior<Npc> for Wander {
//!     fn name(&self) -> &str {
//!         "Wander"
//!     }
//!
//!     fn initialize_child_states(
//!         &mut self,
//!         children: &mut ChildStates<Npc>,
//!     ) -> Result<(), ConfigurationError> {
//!         children.add_child_state(
//!             "Stroll",
//!             FnState::new("Stroll").on_update(|npc: &mut Npc| npc.noise += 1),
//!         )?;
//!         children.add_child_state(
//!             "Listen",
//!             FnState::new("Listen").on_enter(|npc: &mut Npc| npc.log.push("listening".into())),
//!         )
//!     }
//!
//!     fn default_child_key(&self) -> &str {
//!         "Stroll"
//!     }
//!
//!     fn on_parent_update(&mut self, npc: &mut Npc, children: &mut ChildStates<Npc>) {
//!         if npc.noise >= 2 {
//!             let _ = children.transition_to_child("Listen", npc);
//!         }
//!     }
//! }
//!
//! let mut driver = DriverBuilder::new()
//!     .state("Wander", Composite::new(Wander))
//!     .initial("Wander")
//!     .build(Npc::default())
//!     .unwrap();
//!
//! for _ in 0..3 {
//!     driver.update();
//! }
//!
//! assert_eq!(driver.snapshot().active_path(), vec!["Wander", "Listen"]);
//! assert_eq!(driver.context().log, vec!["listening"]);
//! ```

pub mod builder;
pub mod core;
pub mod diagnostics;
pub mod driver;
pub mod hierarchy;
pub mod rules;
pub mod settings;

// Re-export commonly used types
pub use builder::{BuildError, DriverBuilder, FnState};
pub use core::{ContractViolation, Guard, State, TransitionHistory, TransitionRecord};
pub use diagnostics::{MachineSnapshot, StateSnapshot};
pub use driver::Driver;
pub use hierarchy::{
    ChildStates, Composite, CompositeBehavior, ConfigurationError, Propagation, TransitionError,
};
pub use rules::{TransitionRule, TransitionRules};
pub use settings::Settings;
