//! Ownership slot that tracks whether a state is active.

use super::state::State;
use super::violation::ContractViolation;
use crate::diagnostics::StateSnapshot;
use std::any::Any;

/// Owns one state instance and its activity flag.
///
/// Every registry in the crate stores states in slots, so leaf states do not
/// have to track activity themselves. The slot rejects calls that would break
/// the lifecycle contract instead of forwarding them.
pub struct StateSlot<C> {
    state: Box<dyn State<C>>,
    active: bool,
}

impl<C: 'static> StateSlot<C> {
    pub fn new(state: Box<dyn State<C>>) -> Self {
        Self {
            state,
            active: false,
        }
    }

    pub fn name(&self) -> &str {
        self.state.name()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn enter(&mut self, ctx: &mut C) -> Result<(), ContractViolation> {
        if self.active {
            return Err(ContractViolation::AlreadyActive {
                state: self.name().to_string(),
            });
        }
        self.active = true;
        self.state.enter(ctx);
        Ok(())
    }

    pub fn exit(&mut self, ctx: &mut C) -> Result<(), ContractViolation> {
        self.require_active("exit")?;
        self.state.exit(ctx);
        self.active = false;
        Ok(())
    }

    pub fn update(&mut self, ctx: &mut C) -> Result<(), ContractViolation> {
        self.require_active("update")?;
        self.state.update(ctx);
        Ok(())
    }

    pub fn fixed_update(&mut self, ctx: &mut C) -> Result<(), ContractViolation> {
        self.require_active("fixed_update")?;
        self.state.fixed_update(ctx);
        Ok(())
    }

    pub fn handle_input(&mut self, ctx: &mut C, input: &dyn Any) -> Result<(), ContractViolation> {
        self.require_active("handle_input")?;
        self.state.handle_input(ctx, input);
        Ok(())
    }

    pub fn state(&self) -> &dyn State<C> {
        &*self.state
    }

    /// Typed view of the owned state, `None` if it is not an `S`.
    pub fn downcast_ref<S: 'static>(&self) -> Option<&S> {
        let state: &(dyn State<C> + 'static) = &*self.state;
        state.as_any().downcast_ref::<S>()
    }

    pub fn downcast_mut<S: 'static>(&mut self) -> Option<&mut S> {
        let state: &mut (dyn State<C> + 'static) = &mut *self.state;
        state.as_any_mut().downcast_mut::<S>()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let mut snapshot = self.state.snapshot();
        snapshot.active = self.active;
        snapshot
    }

    fn require_active(&self, operation: &'static str) -> Result<(), ContractViolation> {
        if self.active {
            Ok(())
        } else {
            Err(ContractViolation::NotActive {
                state: self.name().to_string(),
                operation,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe;

    impl State<Vec<String>> for Probe {
        fn name(&self) -> &str {
            "Probe"
        }

        fn enter(&mut self, log: &mut Vec<String>) {
            log.push("enter".into());
        }

        fn exit(&mut self, log: &mut Vec<String>) {
            log.push("exit".into());
        }

        fn update(&mut self, log: &mut Vec<String>) {
            log.push("update".into());
        }

        fn handle_input(&mut self, log: &mut Vec<String>, input: &dyn Any) {
            if let Some(key) = input.downcast_ref::<char>() {
                log.push(format!("input {key}"));
            }
        }
    }

    fn slot() -> StateSlot<Vec<String>> {
        StateSlot::new(Box::new(Probe))
    }

    #[test]
    fn new_slot_is_inactive() {
        let slot = slot();
        assert!(!slot.is_active());
        assert_eq!(slot.name(), "Probe");
    }

    #[test]
    fn enter_activates_and_exit_deactivates() {
        let mut slot = slot();
        let mut log = Vec::new();

        slot.enter(&mut log).unwrap();
        assert!(slot.is_active());

        slot.exit(&mut log).unwrap();
        assert!(!slot.is_active());
        assert_eq!(log, vec!["enter", "exit"]);
    }

    #[test]
    fn double_enter_is_rejected() {
        let mut slot = slot();
        let mut log = Vec::new();

        slot.enter(&mut log).unwrap();
        let result = slot.enter(&mut log);

        assert!(matches!(
            result,
            Err(ContractViolation::AlreadyActive { .. })
        ));
        assert_eq!(log, vec!["enter"]);
    }

    #[test]
    fn update_before_enter_is_rejected() {
        let mut slot = slot();
        let mut log = Vec::new();

        let result = slot.update(&mut log);

        assert_eq!(
            result,
            Err(ContractViolation::NotActive {
                state: "Probe".to_string(),
                operation: "update",
            })
        );
        assert!(log.is_empty());
    }

    #[test]
    fn exit_before_enter_is_rejected() {
        let mut slot = slot();
        let mut log = Vec::new();

        assert!(slot.exit(&mut log).is_err());
        assert!(slot.fixed_update(&mut log).is_err());
        assert!(slot.handle_input(&mut log, &'x').is_err());
        assert!(log.is_empty());
    }

    #[test]
    fn input_reaches_active_state() {
        let mut slot = slot();
        let mut log = Vec::new();

        slot.enter(&mut log).unwrap();
        slot.handle_input(&mut log, &'j').unwrap();

        assert_eq!(log, vec!["enter", "input j"]);
    }

    #[test]
    fn downcast_finds_concrete_state() {
        let mut slot = slot();

        assert!(slot.downcast_ref::<Probe>().is_some());
        assert!(slot.downcast_mut::<Probe>().is_some());
        assert!(slot.downcast_ref::<String>().is_none());
    }

    #[test]
    fn snapshot_reports_activity() {
        let mut slot = slot();
        let mut log = Vec::new();

        assert!(!slot.snapshot().active);
        slot.enter(&mut log).unwrap();
        assert!(slot.snapshot().active);
    }
}
