//! Keyed registry of child states with one active child.
//!
//! `ChildStates` is the transition engine shared by composites and the
//! driver. It owns every registered state, remembers which key is active and
//! performs the exit-then-enter switch.

use crate::core::{ContractViolation, Guard, State, StateSlot, TransitionHistory};
use crate::diagnostics::StateSnapshot;
use crate::hierarchy::error::{ConfigurationError, TransitionError};
use crate::settings::Settings;
use std::any::Any;
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Whether the owner is inside an update that limits transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Decision {
    /// Outside an update: any number of transitions is allowed
    Unlimited,
    /// Inside an update, no transition settled yet
    Pending,
    /// Inside an update, a transition already happened
    Settled,
}

/// Registry of named child states, at most one of them active.
///
/// Keys are unique within one registry. Transitions are synchronous: the
/// previous child is exited and the new child entered before
/// [`transition_to_child`](Self::transition_to_child) returns, with no other
/// child call in between.
pub struct ChildStates<C> {
    owner: String,
    slots: HashMap<String, StateSlot<C>>,
    guards: HashMap<String, Guard<C>>,
    current: Option<String>,
    history: TransitionHistory,
    sealed: bool,
    decision: Decision,
}

impl<C: 'static> ChildStates<C> {
    pub fn new(owner: impl Into<String>) -> Self {
        Self::with_settings(owner, &Settings::default())
    }

    pub fn with_settings(owner: impl Into<String>, settings: &Settings) -> Self {
        Self {
            owner: owner.into(),
            slots: HashMap::new(),
            guards: HashMap::new(),
            current: None,
            history: TransitionHistory::new(settings.history_capacity),
            sealed: false,
            decision: Decision::Unlimited,
        }
    }

    /// Name of the composite or driver that owns this registry.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Register `child` under `key`.
    ///
    /// Fails on an empty or duplicate key, and once the owner has been
    /// entered for the first time.
    pub fn add_child_state<S: State<C>>(
        &mut self,
        key: impl Into<String>,
        child: S,
    ) -> Result<(), ConfigurationError> {
        self.add_boxed_child_state(key, Box::new(child))
    }

    pub fn add_boxed_child_state(
        &mut self,
        key: impl Into<String>,
        child: Box<dyn State<C>>,
    ) -> Result<(), ConfigurationError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigurationError::EmptyKey);
        }
        if self.sealed {
            return Err(ConfigurationError::RegistrationClosed {
                owner: self.owner.clone(),
                key,
            });
        }
        if self.slots.contains_key(&key) {
            return Err(ConfigurationError::DuplicateKey {
                owner: self.owner.clone(),
                key,
            });
        }

        tracing::trace!(owner = %self.owner, key = %key, state = child.name(), "registered state");
        self.slots.insert(key, StateSlot::new(child));
        Ok(())
    }

    /// Attach a guard that must pass before `key` can be entered.
    ///
    /// Replaces any guard previously attached to the same key.
    pub fn add_guard(&mut self, key: impl Into<String>, guard: Guard<C>) {
        self.guards.insert(key.into(), guard);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.slots.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn current_key(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Key that was active before the current one.
    pub fn previous_key(&self) -> Option<&str> {
        self.history.previous()
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    pub fn is_child_active(&self, key: &str) -> bool {
        self.slots.get(key).is_some_and(StateSlot::is_active)
    }

    /// Whether `key` is registered and its guard (if any) accepts `ctx`.
    pub fn can_transition_to(&self, key: &str, ctx: &C) -> bool {
        self.contains(key) && self.guards.get(key).is_none_or(|guard| guard.check(ctx))
    }

    pub fn current_child(&self) -> Option<&dyn State<C>> {
        let key = self.current.as_deref()?;
        self.slots.get(key).map(StateSlot::state)
    }

    /// Typed access to the child registered under `key`.
    pub fn child<S: 'static>(&self, key: &str) -> Option<&S> {
        self.slots.get(key)?.downcast_ref::<S>()
    }

    pub fn child_mut<S: 'static>(&mut self, key: &str) -> Option<&mut S> {
        self.slots.get_mut(key)?.downcast_mut::<S>()
    }

    /// Make `key` the active child.
    ///
    /// - unregistered key: error, the current child stays active
    /// - `key` already active: no-op, the child is neither exited nor re-entered
    /// - guard rejects `ctx`: error, the current child stays active
    /// - a transition already settled during the owner's current update: error
    ///
    /// Otherwise the current child is exited, the key is switched and the new
    /// child is entered.
    pub fn transition_to_child(&mut self, key: &str, ctx: &mut C) -> Result<(), TransitionError> {
        self.switch_to(key, ctx, true)
    }

    /// Activate the owner's default child. Guards are not consulted so an
    /// active owner always ends up with an active child.
    pub(crate) fn enter_default(&mut self, key: &str, ctx: &mut C) -> Result<(), TransitionError> {
        self.switch_to(key, ctx, false)
    }

    fn switch_to(&mut self, key: &str, ctx: &mut C, guarded: bool) -> Result<(), TransitionError> {
        if !self.slots.contains_key(key) {
            tracing::warn!(owner = %self.owner, key, "transition to unregistered state rejected");
            return Err(TransitionError::UnknownState {
                owner: self.owner.clone(),
                key: key.to_string(),
            });
        }

        if self.current.as_deref() == Some(key) {
            tracing::trace!(owner = %self.owner, key, "state already active, transition skipped");
            return Ok(());
        }

        if self.decision == Decision::Settled {
            tracing::warn!(owner = %self.owner, key, "second transition in one tick rejected");
            return Err(TransitionError::AlreadyTransitioned {
                owner: self.owner.clone(),
                key: key.to_string(),
            });
        }

        if let Some(guard) = self.guards.get(key).filter(|_| guarded) {
            if !guard.check(ctx) {
                let from = self.current.clone().unwrap_or_default();
                tracing::debug!(owner = %self.owner, from = %from, to = key, "guard blocked transition");
                return Err(TransitionError::GuardBlocked {
                    owner: self.owner.clone(),
                    from,
                    to: key.to_string(),
                });
            }
        }

        let previous = self.current.take();
        if let Some(slot) = previous.as_deref().and_then(|k| self.slots.get_mut(k)) {
            report(&self.owner, slot.exit(ctx));
        }

        self.history.record(previous.as_deref(), key);
        self.current = Some(key.to_string());
        if let Some(slot) = self.slots.get_mut(key) {
            report(&self.owner, slot.enter(ctx));
        }

        if self.decision == Decision::Pending {
            self.decision = Decision::Settled;
        }

        tracing::debug!(
            owner = %self.owner,
            from = previous.as_deref().unwrap_or("-"),
            to = key,
            "transitioned"
        );
        Ok(())
    }

    /// Exit the active child, leaving no child active.
    pub(crate) fn exit_current(&mut self, ctx: &mut C) {
        let Some(key) = self.current.take() else {
            return;
        };
        if let Some(slot) = self.slots.get_mut(&key) {
            report(&self.owner, slot.exit(ctx));
        }
    }

    pub(crate) fn update_current(&mut self, ctx: &mut C) {
        if let Some(slot) = self.current_slot_mut() {
            let result = slot.update(ctx);
            report(&self.owner, result);
        }
    }

    pub(crate) fn fixed_update_current(&mut self, ctx: &mut C) {
        if let Some(slot) = self.current_slot_mut() {
            let result = slot.fixed_update(ctx);
            report(&self.owner, result);
        }
    }

    pub(crate) fn handle_input_current(&mut self, ctx: &mut C, input: &dyn Any) {
        if let Some(slot) = self.current_slot_mut() {
            let result = slot.handle_input(ctx, input);
            report(&self.owner, result);
        }
    }

    /// Check the registry is usable with `default_key` as its entry state.
    ///
    /// Accumulates every problem rather than stopping at the first one.
    pub fn validate(&self, default_key: &str) -> Validation<(), NonEmptyVec<ConfigurationError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigurationError>>> = Vec::new();

        if self.slots.is_empty() {
            checks.push(Validation::fail(ConfigurationError::NoChildStates {
                owner: self.owner.clone(),
            }));
        }

        if !self.slots.contains_key(default_key) {
            checks.push(Validation::fail(ConfigurationError::MissingDefaultChild {
                owner: self.owner.clone(),
                key: default_key.to_string(),
            }));
        }

        let mut guarded: Vec<&String> = self.guards.keys().collect();
        guarded.sort_unstable();
        for key in guarded {
            if !self.slots.contains_key(key) {
                checks.push(Validation::fail(ConfigurationError::GuardForUnknownKey {
                    owner: self.owner.clone(),
                    key: key.clone(),
                }));
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Describe this registry as the children of a state called `name`.
    pub fn snapshot(&self, name: &str, active: bool) -> StateSnapshot {
        StateSnapshot {
            name: name.to_string(),
            active,
            current_child: self.current.clone(),
            previous_child: self.previous_key().map(str::to_string),
            children: self.keys().into_iter().map(str::to_string).collect(),
            active_child: self
                .current
                .as_deref()
                .and_then(|key| self.slots.get(key))
                .map(|slot| Box::new(slot.snapshot())),
        }
    }

    pub(crate) fn seal(&mut self) {
        self.sealed = true;
    }

    pub(crate) fn open_decision(&mut self) {
        self.decision = Decision::Pending;
    }

    pub(crate) fn close_decision(&mut self) {
        self.decision = Decision::Unlimited;
    }

    pub(crate) fn is_decision_settled(&self) -> bool {
        self.decision == Decision::Settled
    }

    fn current_slot_mut(&mut self) -> Option<&mut StateSlot<C>> {
        let key = self.current.as_deref()?;
        self.slots.get_mut(key)
    }
}

fn report(owner: &str, result: Result<(), ContractViolation>) {
    if let Err(violation) = result {
        tracing::error!(owner, %violation, "lifecycle contract violated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Trace = Vec<String>;

    struct Leaf(&'static str);

    impl State<Trace> for Leaf {
        fn name(&self) -> &str {
            self.0
        }

        fn enter(&mut self, trace: &mut Trace) {
            trace.push(format!("{}.Enter", self.0));
        }

        fn exit(&mut self, trace: &mut Trace) {
            trace.push(format!("{}.Exit", self.0));
        }

        fn update(&mut self, trace: &mut Trace) {
            trace.push(format!("{}.Update", self.0));
        }

        fn fixed_update(&mut self, trace: &mut Trace) {
            trace.push(format!("{}.FixedUpdate", self.0));
        }
    }

    fn registry() -> ChildStates<Trace> {
        let mut children = ChildStates::new("Parent");
        children.add_child_state("A", Leaf("A")).unwrap();
        children.add_child_state("B", Leaf("B")).unwrap();
        children
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut children = registry();
        let result = children.add_child_state("A", Leaf("A2"));

        assert_eq!(
            result,
            Err(ConfigurationError::DuplicateKey {
                owner: "Parent".to_string(),
                key: "A".to_string(),
            })
        );
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn empty_key_is_rejected() {
        let mut children = registry();
        assert_eq!(
            children.add_child_state("", Leaf("Nameless")),
            Err(ConfigurationError::EmptyKey)
        );
    }

    #[test]
    fn sealed_registry_rejects_new_children() {
        let mut children = registry();
        children.seal();

        let result = children.add_child_state("C", Leaf("C"));
        assert!(matches!(
            result,
            Err(ConfigurationError::RegistrationClosed { .. })
        ));
        assert!(!children.contains("C"));
    }

    #[test]
    fn keys_are_sorted() {
        let children = registry();
        assert_eq!(children.keys(), vec!["A", "B"]);
    }

    #[test]
    fn first_transition_enters_without_exit() {
        let mut children = registry();
        let mut trace = Trace::new();

        children.transition_to_child("A", &mut trace).unwrap();

        assert_eq!(trace, vec!["A.Enter"]);
        assert_eq!(children.current_key(), Some("A"));
        assert!(children.is_child_active("A"));
        assert!(!children.is_child_active("B"));
    }

    #[test]
    fn transition_exits_before_entering() {
        let mut children = registry();
        let mut trace = Trace::new();

        children.transition_to_child("A", &mut trace).unwrap();
        children.transition_to_child("B", &mut trace).unwrap();

        assert_eq!(trace, vec!["A.Enter", "A.Exit", "B.Enter"]);
        assert_eq!(children.current_key(), Some("B"));
        assert_eq!(children.previous_key(), Some("A"));
    }

    #[test]
    fn unknown_key_keeps_current_child() {
        let mut children = registry();
        let mut trace = Trace::new();
        children.transition_to_child("A", &mut trace).unwrap();

        let result = children.transition_to_child("Z", &mut trace);

        assert!(matches!(result, Err(TransitionError::UnknownState { .. })));
        assert_eq!(children.current_key(), Some("A"));
        assert_eq!(trace, vec!["A.Enter"]);
    }

    #[test]
    fn same_key_transition_is_a_no_op() {
        let mut children = registry();
        let mut trace = Trace::new();
        children.transition_to_child("A", &mut trace).unwrap();

        children.transition_to_child("A", &mut trace).unwrap();

        assert_eq!(trace, vec!["A.Enter"]);
        assert_eq!(children.history().len(), 1);
    }

    #[test]
    fn guard_blocks_transition() {
        let mut children = registry();
        children.add_guard("B", Guard::new(|trace: &Trace| trace.len() > 5));
        let mut trace = Trace::new();
        children.transition_to_child("A", &mut trace).unwrap();

        let result = children.transition_to_child("B", &mut trace);

        assert_eq!(
            result,
            Err(TransitionError::GuardBlocked {
                owner: "Parent".to_string(),
                from: "A".to_string(),
                to: "B".to_string(),
            })
        );
        assert_eq!(children.current_key(), Some("A"));
        assert!(!children.can_transition_to("B", &trace));
        assert!(children.can_transition_to("A", &trace));
    }

    #[test]
    fn default_entry_skips_guards() {
        let mut children = registry();
        children.add_guard("A", Guard::new(|_: &Trace| false));
        let mut trace = Trace::new();

        assert!(children.transition_to_child("A", &mut trace).is_err());
        children.enter_default("A", &mut trace).unwrap();

        assert_eq!(children.current_key(), Some("A"));
        assert_eq!(trace, vec!["A.Enter"]);
        assert!(children.enter_default("Nowhere", &mut trace).is_err());
    }

    #[test]
    fn history_capacity_from_settings_is_not_preallocated() {
        let settings =
            Settings::from_json(r#"{"history_capacity": 18446744073709551615}"#).unwrap();
        let mut children = ChildStates::with_settings("Parent", &settings);
        children.add_child_state("A", Leaf("A")).unwrap();
        let mut trace = Trace::new();

        children.transition_to_child("A", &mut trace).unwrap();

        assert_eq!(children.history().capacity(), usize::MAX);
        assert_eq!(children.history().get_path(), vec!["A"]);
    }

    #[test]
    fn settled_decision_rejects_second_transition() {
        let mut children = registry();
        let mut trace = Trace::new();
        children.transition_to_child("A", &mut trace).unwrap();

        children.open_decision();
        children.transition_to_child("B", &mut trace).unwrap();
        assert!(children.is_decision_settled());

        let second = children.transition_to_child("A", &mut trace);
        assert!(matches!(
            second,
            Err(TransitionError::AlreadyTransitioned { .. })
        ));
        assert_eq!(children.current_key(), Some("B"));

        children.close_decision();
        children.transition_to_child("A", &mut trace).unwrap();
        assert_eq!(children.current_key(), Some("A"));
    }

    #[test]
    fn forwarding_reaches_only_the_active_child() {
        let mut children = registry();
        let mut trace = Trace::new();

        children.update_current(&mut trace);
        assert!(trace.is_empty());

        children.transition_to_child("B", &mut trace).unwrap();
        children.update_current(&mut trace);
        children.fixed_update_current(&mut trace);

        assert_eq!(trace, vec!["B.Enter", "B.Update", "B.FixedUpdate"]);
    }

    #[test]
    fn exit_current_clears_active_key() {
        let mut children = registry();
        let mut trace = Trace::new();
        children.transition_to_child("A", &mut trace).unwrap();

        children.exit_current(&mut trace);

        assert_eq!(trace, vec!["A.Enter", "A.Exit"]);
        assert!(children.current_key().is_none());
        assert!(!children.is_child_active("A"));
    }

    #[test]
    fn validate_accumulates_all_problems() {
        let mut children: ChildStates<Trace> = ChildStates::new("Empty");
        children.add_guard("Ghost", Guard::always());

        match children.validate("Missing") {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigurationError::NoChildStates { .. })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigurationError::MissingDefaultChild { .. })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigurationError::GuardForUnknownKey { .. })));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn validate_succeeds_for_complete_registry() {
        let children = registry();
        assert!(children.validate("A").is_success());
    }

    #[test]
    fn typed_child_access() {
        let mut children = registry();

        assert_eq!(children.child::<Leaf>("A").map(|leaf| leaf.0), Some("A"));
        assert!(children.child_mut::<Leaf>("B").is_some());
        assert!(children.child::<String>("A").is_none());
        assert!(children.child::<Leaf>("Z").is_none());
    }

    #[test]
    fn snapshot_describes_active_child() {
        let mut children = registry();
        let mut trace = Trace::new();
        children.transition_to_child("A", &mut trace).unwrap();
        children.transition_to_child("B", &mut trace).unwrap();

        let snapshot = children.snapshot("Parent", true);

        assert_eq!(snapshot.current_child.as_deref(), Some("B"));
        assert_eq!(snapshot.previous_child.as_deref(), Some("A"));
        assert_eq!(snapshot.children, vec!["A", "B"]);
        assert_eq!(snapshot.active_path(), vec!["Parent", "B"]);
        assert!(snapshot.active_child.map(|c| c.active).unwrap_or(false));
    }
}
