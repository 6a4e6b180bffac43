//! Composite states that drive a nested state machine of children.

use crate::core::{ContractViolation, State, TransitionHistory};
use crate::diagnostics::StateSnapshot;
use crate::hierarchy::children::ChildStates;
use crate::hierarchy::error::{ConfigurationError, TransitionError};
use crate::rules::TransitionRules;
use crate::settings::Settings;
use std::any::Any;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Whether an input payload continues down to the active child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Propagation {
    #[default]
    Continue,
    Stop,
}

/// Domain half of a composite state: child registration and parent hooks.
///
/// The framework half, [`Composite`], owns the children and applies the
/// lifecycle ordering around these hooks:
///
/// - enter: `on_parent_enter`, then the default child is entered
/// - update: `on_parent_update` first, then the child that is active after
///   the hook is updated
/// - exit: the active child is exited, then `on_parent_exit`
///
/// # Example
///
/// ```rust
/// use statecraft::core::State;
/// use statecraft::hierarchy::{ChildStates, Composite, CompositeBehavior, ConfigurationError};
///
/// struct Senses {
///     suspicion: f32,
/// }
///
/// struct Watch;
///
/// impl State<Senses> for Watch {
///     fn name(&self) -> &str { "Watch" }
///     fn enter(&mut self, _: &mut Senses) {}
///     fn exit(&mut self, _: &mut Senses) {}
///     fn update(&mut self, senses: &mut Senses) { senses.suspicion += 0.25; }
/// }
///
/// struct Investigate;
///
/// impl State<Senses> for Investigate {
///     fn name(&self) -> &str { "Investigate" }
///     fn enter(&mut self, _: &mut Senses) {}
///     fn exit(&mut self, _: &mut Senses) {}
///     fn update(&mut self, _: &mut Senses) {}
/// }
///
/// struct Patrol;
///
/// impl CompositeBehavior<Senses> for Patrol {
///     fn name(&self) -> &str { "Patrol" }
///
///     fn initialize_child_states(
///         &mut self,
///         children: &mut ChildStates<Senses>,
///     ) -> Result<(), ConfigurationError> {
///         children.add_child_state("Watch", Watch)?;
///         children.add_child_state("Investigate", Investigate)
///     }
///
///     fn default_child_key(&self) -> &str { "Watch" }
///
///     fn on_parent_update(&mut self, senses: &mut Senses, children: &mut ChildStates<Senses>) {
///         if senses.suspicion >= 0.5 {
///             let _ = children.transition_to_child("Investigate", senses);
///         }
///     }
/// }
///
/// let mut senses = Senses { suspicion: 0.0 };
/// let mut patrol = Composite::new(Patrol);
///
/// patrol.enter(&mut senses);
/// assert_eq!(patrol.current_child_key(), Some("Watch"));
///
/// patrol.update(&mut senses);
/// patrol.update(&mut senses);
/// patrol.update(&mut senses);
/// assert_eq!(patrol.current_child_key(), Some("Investigate"));
/// ```
pub trait CompositeBehavior<C>: 'static {
    fn name(&self) -> &str;

    /// Register the children. Runs once, before the first enter.
    fn initialize_child_states(
        &mut self,
        children: &mut ChildStates<C>,
    ) -> Result<(), ConfigurationError>;

    /// Key entered whenever the composite is entered.
    fn default_child_key(&self) -> &str;

    fn on_parent_enter(&mut self, _ctx: &mut C) {}

    /// Runs before the active child is updated.
    ///
    /// A transition requested here is visible to the same update: the newly
    /// entered child receives this tick's `update`. Only one transition may
    /// settle per update; further requests return
    /// [`TransitionError::AlreadyTransitioned`].
    fn on_parent_update(&mut self, _ctx: &mut C, _children: &mut ChildStates<C>) {}

    /// Runs after the active child has been exited.
    fn on_parent_exit(&mut self, _ctx: &mut C) {}

    fn on_parent_fixed_update(&mut self, _ctx: &mut C) {}

    /// Inspect input before the active child sees it.
    fn on_parent_handle_input(&mut self, _ctx: &mut C, _input: &dyn Any) -> Propagation {
        Propagation::Continue
    }
}

/// A state that owns a registry of children, exactly one active while the
/// composite is active.
///
/// Composites implement [`State`] themselves, so a child may be another
/// composite and hierarchies nest to any depth.
pub struct Composite<C, B> {
    behavior: B,
    children: ChildStates<C>,
    rules: Option<TransitionRules<C>>,
    initialized: bool,
    active: bool,
}

impl<C: 'static, B: CompositeBehavior<C>> Composite<C, B> {
    pub fn new(behavior: B) -> Self {
        Self::with_settings(behavior, &Settings::default())
    }

    pub fn with_settings(behavior: B, settings: &Settings) -> Self {
        let children = ChildStates::with_settings(behavior.name(), settings);
        Self {
            behavior,
            children,
            rules: None,
            initialized: false,
            active: false,
        }
    }

    /// Evaluate `rules` during each update when the parent hook did not
    /// transition itself.
    pub fn with_rules(mut self, rules: TransitionRules<C>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Run the one-time child registration and validate the result.
    ///
    /// Called automatically by the first `enter`. Subsequent calls do
    /// nothing and succeed.
    pub fn initialize(&mut self) -> Validation<(), NonEmptyVec<ConfigurationError>> {
        if self.initialized {
            return Validation::success(());
        }
        self.initialized = true;

        let registration = match self.behavior.initialize_child_states(&mut self.children) {
            Ok(()) => Validation::success(()),
            Err(err) => Validation::fail(err),
        };
        let structure = self.children.validate(self.behavior.default_child_key());

        Validation::all_vec(vec![registration, structure]).map(|_| ())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }

    pub fn children(&self) -> &ChildStates<C> {
        &self.children
    }

    /// Register a child outside `initialize_child_states`.
    ///
    /// Must happen before the first enter.
    pub fn add_child_state<S: State<C>>(
        &mut self,
        key: impl Into<String>,
        child: S,
    ) -> Result<(), ConfigurationError> {
        self.children.add_child_state(key, child)
    }

    pub fn default_child_key(&self) -> &str {
        self.behavior.default_child_key()
    }

    pub fn current_child_key(&self) -> Option<&str> {
        self.children.current_key()
    }

    pub fn previous_child_key(&self) -> Option<&str> {
        self.children.previous_key()
    }

    pub fn history(&self) -> &TransitionHistory {
        self.children.history()
    }

    pub fn has_child_state(&self, key: &str) -> bool {
        self.children.contains(key)
    }

    pub fn can_transition_to_child(&self, key: &str, ctx: &C) -> bool {
        self.children.can_transition_to(key, ctx)
    }

    /// Switch the active child from outside the composite.
    ///
    /// Same semantics as [`ChildStates::transition_to_child`], except that an
    /// inactive composite rejects the request with
    /// [`TransitionError::OwnerInactive`] and enters nothing.
    pub fn transition_to_child(&mut self, key: &str, ctx: &mut C) -> Result<(), TransitionError> {
        if !self.active {
            tracing::warn!(
                owner = self.behavior.name(),
                key,
                "transition on inactive composite rejected"
            );
            return Err(TransitionError::OwnerInactive {
                owner: self.behavior.name().to_string(),
                key: key.to_string(),
            });
        }
        self.children.transition_to_child(key, ctx)
    }

    pub fn child<S: 'static>(&self, key: &str) -> Option<&S> {
        self.children.child::<S>(key)
    }

    pub fn child_mut<S: 'static>(&mut self, key: &str) -> Option<&mut S> {
        self.children.child_mut::<S>(key)
    }

    fn violation(&self, operation: &'static str) {
        let violation = ContractViolation::NotActive {
            state: self.behavior.name().to_string(),
            operation,
        };
        tracing::error!(%violation, "lifecycle contract violated");
    }

    fn apply_rules(&mut self, ctx: &mut C) {
        let Some(rules) = self.rules.as_ref() else {
            return;
        };
        let next = self
            .children
            .current_key()
            .and_then(|current| rules.evaluate(current, ctx));
        if let Some(next) = next {
            if let Err(err) = self.children.transition_to_child(next, ctx) {
                tracing::debug!(owner = self.behavior.name(), %err, "rule transition not taken");
            }
        }
    }
}

impl<C: 'static, B: CompositeBehavior<C>> State<C> for Composite<C, B> {
    fn name(&self) -> &str {
        self.behavior.name()
    }

    fn enter(&mut self, ctx: &mut C) {
        if self.active {
            let violation = ContractViolation::AlreadyActive {
                state: self.behavior.name().to_string(),
            };
            tracing::error!(%violation, "lifecycle contract violated");
            return;
        }

        if let Validation::Failure(errors) = self.initialize() {
            for err in errors.iter() {
                tracing::error!(owner = self.behavior.name(), %err, "invalid child configuration");
            }
        }
        self.children.seal();
        self.active = true;

        tracing::debug!(state = self.behavior.name(), "entering composite");
        self.behavior.on_parent_enter(ctx);

        let default = self.behavior.default_child_key();
        if let Err(err) = self.children.enter_default(default, ctx) {
            tracing::error!(owner = self.behavior.name(), %err, "default child not entered");
        }
    }

    fn update(&mut self, ctx: &mut C) {
        if !self.active {
            self.violation("update");
            return;
        }

        self.children.open_decision();
        self.behavior.on_parent_update(ctx, &mut self.children);
        if !self.children.is_decision_settled() {
            self.apply_rules(ctx);
        }
        self.children.close_decision();

        self.children.update_current(ctx);
    }

    fn exit(&mut self, ctx: &mut C) {
        if !self.active {
            self.violation("exit");
            return;
        }

        self.children.exit_current(ctx);
        self.behavior.on_parent_exit(ctx);
        self.active = false;
        tracing::debug!(state = self.behavior.name(), "exited composite");
    }

    fn fixed_update(&mut self, ctx: &mut C) {
        if !self.active {
            self.violation("fixed_update");
            return;
        }

        self.behavior.on_parent_fixed_update(ctx);
        self.children.fixed_update_current(ctx);
    }

    fn handle_input(&mut self, ctx: &mut C, input: &dyn Any) {
        if !self.active {
            self.violation("handle_input");
            return;
        }

        if self.behavior.on_parent_handle_input(ctx, input) == Propagation::Continue {
            self.children.handle_input_current(ctx, input);
        }
    }

    fn snapshot(&self) -> StateSnapshot {
        self.children.snapshot(self.behavior.name(), self.active)
    }
}
