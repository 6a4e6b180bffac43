//! Top-level driver that owns the context and ticks the active state.

use crate::core::TransitionHistory;
use crate::diagnostics::MachineSnapshot;
use crate::hierarchy::{ChildStates, TransitionError};
use crate::rules::TransitionRules;
use std::any::Any;

/// Runs a state hierarchy for one host entity.
///
/// The driver owns the top-level registry and the context. Every lifecycle
/// call borrows the context mutably for its duration; nothing in the
/// hierarchy keeps a reference to it.
///
/// Unlike a composite update, external calls to
/// [`transition_to`](Self::transition_to) are not limited per tick.
pub struct Driver<C> {
    name: String,
    context: C,
    states: ChildStates<C>,
    rules: Option<TransitionRules<C>>,
}

impl<C: 'static> Driver<C> {
    /// Assemble a driver from an already validated registry.
    ///
    /// The registry must already have its initial state entered.
    pub(crate) fn from_parts(
        name: String,
        context: C,
        states: ChildStates<C>,
        rules: Option<TransitionRules<C>>,
    ) -> Self {
        Self {
            name,
            context,
            states,
            rules,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Update the active state, then apply the first matching rule.
    ///
    /// A rule match transitions immediately, so the new state receives the
    /// next tick.
    pub fn update(&mut self) {
        self.states.update_current(&mut self.context);
        self.apply_rules();
    }

    pub fn fixed_update(&mut self) {
        self.states.fixed_update_current(&mut self.context);
    }

    pub fn handle_input(&mut self, input: &dyn Any) {
        self.states.handle_input_current(&mut self.context, input);
    }

    /// Switch the active top-level state.
    ///
    /// Unknown keys and guard rejections leave the current state active.
    /// Transitioning to the active key is a no-op.
    pub fn transition_to(&mut self, key: &str) -> Result<(), TransitionError> {
        self.states.transition_to_child(key, &mut self.context)
    }

    /// Re-enter the state that was active before the current one.
    pub fn transition_to_previous(&mut self) -> Result<(), TransitionError> {
        let key = self
            .states
            .previous_key()
            .map(str::to_string)
            .ok_or_else(|| TransitionError::NoPreviousState {
                owner: self.name.clone(),
            })?;
        self.transition_to(&key)
    }

    pub fn current_key(&self) -> Option<&str> {
        self.states.current_key()
    }

    /// Name reported by the active state, or `""` when none is active.
    pub fn current_state_name(&self) -> &str {
        self.states.current_child().map_or("", |state| state.name())
    }

    pub fn previous_key(&self) -> Option<&str> {
        self.states.previous_key()
    }

    pub fn is_in_state(&self, key: &str) -> bool {
        self.current_key() == Some(key)
    }

    pub fn is_in_any_state(&self, keys: &[&str]) -> bool {
        self.current_key().is_some_and(|current| keys.contains(&current))
    }

    /// Registered top-level keys, sorted.
    pub fn registered_states(&self) -> Vec<&str> {
        self.states.keys()
    }

    pub fn history(&self) -> &TransitionHistory {
        self.states.history()
    }

    pub fn can_transition_to(&self, key: &str) -> bool {
        self.states.can_transition_to(key, &self.context)
    }

    pub fn rules(&self) -> Option<&TransitionRules<C>> {
        self.rules.as_ref()
    }

    pub fn state<S: 'static>(&self, key: &str) -> Option<&S> {
        self.states.child::<S>(key)
    }

    pub fn state_mut<S: 'static>(&mut self, key: &str) -> Option<&mut S> {
        self.states.child_mut::<S>(key)
    }

    /// Typed state together with the context, for calls that need both.
    ///
    /// Typical use is a domain trigger on a composite, which then asks it to
    /// switch children:
    ///
    /// ```rust,ignore
    /// if let Some((alert, ctx)) = driver.state_and_context_mut::<AlertState>("Alert") {
    ///     alert.transition_to_child("Searching", ctx)?;
    /// }
    /// ```
    pub fn state_and_context_mut<S: 'static>(&mut self, key: &str) -> Option<(&mut S, &mut C)> {
        let state = self.states.child_mut::<S>(key)?;
        Some((state, &mut self.context))
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        let root = self
            .states
            .snapshot(&self.name, true)
            .active_child
            .map(|child| *child);

        MachineSnapshot {
            name: self.name.clone(),
            current_key: self.current_key().map(str::to_string),
            previous_key: self.previous_key().map(str::to_string),
            registered: self
                .registered_states()
                .into_iter()
                .map(str::to_string)
                .collect(),
            history: self.history().records().cloned().collect(),
            root,
        }
    }

    /// Exit the active state and hand the context back.
    pub fn shutdown(mut self) -> C {
        tracing::debug!(driver = %self.name, "shutting down");
        self.states.exit_current(&mut self.context);
        self.context
    }

    fn apply_rules(&mut self) {
        let Some(rules) = self.rules.as_ref() else {
            return;
        };
        let Some(current) = self.states.current_key() else {
            return;
        };
        let Some(target) = rules.evaluate(current, &self.context) else {
            return;
        };

        tracing::debug!(driver = %self.name, to = target, "transition rule matched");
        if let Err(error) = self.states.transition_to_child(target, &mut self.context) {
            tracing::warn!(driver = %self.name, %error, "rule transition rejected");
        }
    }
}

impl<C> std::fmt::Debug for Driver<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
