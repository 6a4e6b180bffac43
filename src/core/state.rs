//! Core State trait for behavior units.
//!
//! Every leaf behavior and every composite implements this trait. The
//! framework calls the lifecycle methods; the state never decides on its own
//! when it is entered or exited.

use crate::diagnostics::StateSnapshot;
use std::any::Any;

/// Type-erased access to a concrete state, used for typed lookups of states
/// stored behind `Box<dyn State<C>>`.
///
/// Implemented for every `'static` type; there is no reason to implement it
/// by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Trait for behavior units driven by a state machine.
///
/// `C` is the caller-owned context. It is borrowed mutably for the duration
/// of each call and never retained by the framework.
///
/// # Lifecycle
///
/// - `enter` runs exactly once when the state becomes active
/// - `update` runs once per tick while active
/// - `fixed_update` runs on the host's fixed-rate cadence while active
/// - `handle_input` delivers an opaque payload to the active state
/// - `exit` runs exactly once when the state stops being active
///
/// No method except `enter` is ever called on an inactive state. The same
/// instance is re-entered and re-exited for the whole lifetime of the
/// machine, so `exit` must leave it ready for the next `enter`.
///
/// # Example
///
/// ```rust
/// use statecraft::core::State;
///
/// struct Idle {
///     ticks: u32,
/// }
///
/// impl State<Vec<String>> for Idle {
///     fn name(&self) -> &str {
///         "Idle"
///     }
///
///     fn enter(&mut self, log: &mut Vec<String>) {
///         self.ticks = 0;
///         log.push("idle: enter".to_string());
///     }
///
///     fn exit(&mut self, log: &mut Vec<String>) {
///         log.push(format!("idle: exit after {} ticks", self.ticks));
///     }
///
///     fn update(&mut self, _log: &mut Vec<String>) {
///         self.ticks += 1;
///     }
/// }
/// ```
pub trait State<C>: AsAny {
    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &str;

    fn enter(&mut self, ctx: &mut C);

    fn exit(&mut self, ctx: &mut C);

    fn update(&mut self, ctx: &mut C);

    /// Fixed-rate work that must not vary with tick duration.
    ///
    /// Default implementation does nothing.
    fn fixed_update(&mut self, _ctx: &mut C) {}

    /// Receive an opaque input payload.
    ///
    /// Not guaranteed to be called every tick. Default implementation
    /// ignores the payload.
    fn handle_input(&mut self, _ctx: &mut C, _input: &dyn Any) {}

    /// Describe this state for diagnostics.
    ///
    /// Leaves keep the default; composites describe their active child.
    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::leaf(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        entered: u32,
        updates: u32,
    }

    impl State<Vec<&'static str>> for Counter {
        fn name(&self) -> &str {
            "Counter"
        }

        fn enter(&mut self, log: &mut Vec<&'static str>) {
            self.entered += 1;
            log.push("enter");
        }

        fn exit(&mut self, log: &mut Vec<&'static str>) {
            log.push("exit");
        }

        fn update(&mut self, _log: &mut Vec<&'static str>) {
            self.updates += 1;
        }
    }

    fn counter() -> Counter {
        Counter {
            entered: 0,
            updates: 0,
        }
    }

    #[test]
    fn default_hooks_are_no_ops() {
        let mut state = counter();
        let mut log = Vec::new();

        state.fixed_update(&mut log);
        state.handle_input(&mut log, &42u32);

        assert!(log.is_empty());
        assert_eq!(state.updates, 0);
    }

    #[test]
    fn default_snapshot_describes_leaf() {
        let state = counter();
        let snapshot = state.snapshot();

        assert_eq!(snapshot.name, "Counter");
        assert!(snapshot.current_child.is_none());
        assert!(snapshot.children.is_empty());
    }

    #[test]
    fn boxed_state_downcasts_to_concrete_type() {
        let mut boxed: Box<dyn State<Vec<&'static str>>> = Box::new(counter());
        let mut log = Vec::new();
        boxed.enter(&mut log);

        let state: &mut (dyn State<Vec<&'static str>> + 'static) = &mut *boxed;
        let concrete = state.as_any_mut().downcast_mut::<Counter>();

        assert!(concrete.is_some());
        assert_eq!(concrete.map(|c| c.entered), Some(1));
    }

    #[test]
    fn state_instance_is_reentered() {
        let mut state = counter();
        let mut log = Vec::new();

        state.enter(&mut log);
        state.exit(&mut log);
        state.enter(&mut log);

        assert_eq!(state.entered, 2);
        assert_eq!(log, vec!["enter", "exit", "enter"]);
    }
}
