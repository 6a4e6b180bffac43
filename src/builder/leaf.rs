//! Leaf states assembled from closures.

use crate::core::State;
use std::any::Any;

type Hook<C> = Box<dyn FnMut(&mut C)>;
type InputHook<C> = Box<dyn FnMut(&mut C, &dyn Any)>;

/// A leaf state whose lifecycle methods are closures.
///
/// Useful for small states that only touch the context. Hooks that are not
/// set do nothing.
///
/// # Example
///
/// ```rust
/// use statecraft::builder::FnState;
/// use statecraft::core::State;
///
/// let mut idle = FnState::new("Idle")
///     .on_enter(|log: &mut Vec<String>| log.push("idle".to_string()))
///     .on_update(|log: &mut Vec<String>| log.push("waiting".to_string()));
///
/// let mut log = Vec::new();
/// idle.enter(&mut log);
/// idle.update(&mut log);
/// assert_eq!(log, vec!["idle", "waiting"]);
/// ```
pub struct FnState<C> {
    name: String,
    enter: Option<Hook<C>>,
    exit: Option<Hook<C>>,
    update: Option<Hook<C>>,
    fixed_update: Option<Hook<C>>,
    input: Option<InputHook<C>>,
}

impl<C> FnState<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enter: None,
            exit: None,
            update: None,
            fixed_update: None,
            input: None,
        }
    }

    pub fn on_enter<F: FnMut(&mut C) + 'static>(mut self, hook: F) -> Self {
        self.enter = Some(Box::new(hook));
        self
    }

    pub fn on_exit<F: FnMut(&mut C) + 'static>(mut self, hook: F) -> Self {
        self.exit = Some(Box::new(hook));
        self
    }

    pub fn on_update<F: FnMut(&mut C) + 'static>(mut self, hook: F) -> Self {
        self.update = Some(Box::new(hook));
        self
    }

    pub fn on_fixed_update<F: FnMut(&mut C) + 'static>(mut self, hook: F) -> Self {
        self.fixed_update = Some(Box::new(hook));
        self
    }

    pub fn on_input<F: FnMut(&mut C, &dyn Any) + 'static>(mut self, hook: F) -> Self {
        self.input = Some(Box::new(hook));
        self
    }
}

impl<C: 'static> State<C> for FnState<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn enter(&mut self, ctx: &mut C) {
        if let Some(hook) = self.enter.as_mut() {
            hook(ctx);
        }
    }

    fn exit(&mut self, ctx: &mut C) {
        if let Some(hook) = self.exit.as_mut() {
            hook(ctx);
        }
    }

    fn update(&mut self, ctx: &mut C) {
        if let Some(hook) = self.update.as_mut() {
            hook(ctx);
        }
    }

    fn fixed_update(&mut self, ctx: &mut C) {
        if let Some(hook) = self.fixed_update.as_mut() {
            hook(ctx);
        }
    }

    fn handle_input(&mut self, ctx: &mut C, input: &dyn Any) {
        if let Some(hook) = self.input.as_mut() {
            hook(ctx, input);
        }
    }
}
