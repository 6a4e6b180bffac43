//! Builder for constructing drivers.

use crate::builder::error::BuildError;
use crate::core::{Guard, State};
use crate::driver::Driver;
use crate::hierarchy::ChildStates;
use crate::rules::TransitionRules;
use crate::settings::Settings;
use stillwater::validation::Validation;

const DEFAULT_NAME: &str = "driver";

/// Builder for constructing a [`Driver`] with a fluent API.
///
/// Registration problems are collected and reported by
/// [`build`](Self::build), which also enters the initial state.
///
/// # Example
///
/// ```rust
/// use statecraft::builder::{DriverBuilder, FnState};
///
/// let driver = DriverBuilder::new()
///     .name("door")
///     .state("Closed", FnState::new("Closed"))
///     .state("Open", FnState::new("Open"))
///     .initial("Closed")
///     .build(0u32)
///     .unwrap();
///
/// assert!(driver.is_in_state("Closed"));
/// ```
pub struct DriverBuilder<C> {
    name: String,
    states: Vec<(String, Box<dyn State<C>>)>,
    guards: Vec<(String, Guard<C>)>,
    initial: Option<String>,
    rules: Option<TransitionRules<C>>,
    settings: Settings,
}

impl<C: 'static> DriverBuilder<C> {
    pub fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            states: Vec::new(),
            guards: Vec::new(),
            initial: None,
            rules: None,
            settings: Settings::default(),
        }
    }

    /// Name used in logs, errors and snapshots.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Register a top-level state under `key`.
    pub fn state<S: State<C>>(self, key: impl Into<String>, state: S) -> Self {
        self.boxed_state(key, Box::new(state))
    }

    pub fn boxed_state(mut self, key: impl Into<String>, state: Box<dyn State<C>>) -> Self {
        self.states.push((key.into(), state));
        self
    }

    /// Set the state entered by [`build`](Self::build) (required).
    pub fn initial(mut self, key: impl Into<String>) -> Self {
        self.initial = Some(key.into());
        self
    }

    /// Guard entry into `key`.
    pub fn guard(mut self, key: impl Into<String>, guard: Guard<C>) -> Self {
        self.guards.push((key.into(), guard));
        self
    }

    /// Guard entry into `key` with a closure.
    pub fn when<F>(self, key: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + 'static,
    {
        self.guard(key, Guard::new(predicate))
    }

    /// Rules evaluated after every update.
    pub fn rules(mut self, rules: TransitionRules<C>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Validate the configuration and enter the initial state.
    pub fn build(self, mut context: C) -> Result<Driver<C>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let mut states = ChildStates::with_settings(self.name.clone(), &self.settings);
        for (key, state) in self.states {
            states.add_boxed_child_state(key, state)?;
        }
        for (key, guard) in self.guards {
            states.add_guard(key, guard);
        }

        if let Validation::Failure(errors) = states.validate(&initial) {
            return Err(BuildError::Invalid {
                errors: errors.iter().cloned().collect(),
            });
        }

        states.seal();
        states.transition_to_child(&initial, &mut context)?;

        tracing::debug!(driver = %self.name, initial = %initial, states = states.len(), "driver built");
        Ok(Driver::from_parts(self.name, context, states, self.rules))
    }
}

impl<C: 'static> Default for DriverBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
