//! Guard predicates for controlling transitions.
//!
//! Guards are boolean functions over the context that decide whether a
//! transition into a state may happen. They must not mutate anything; the
//! context is only borrowed immutably.

use std::fmt;
use std::rc::Rc;

/// Predicate that determines whether a transition can execute.
///
/// # Example
///
/// ```rust
/// use statecraft::core::Guard;
///
/// struct Senses {
///     suspicion: f32,
/// }
///
/// let alarmed = Guard::new(|senses: &Senses| senses.suspicion >= 0.3);
///
/// assert!(alarmed.check(&Senses { suspicion: 0.5 }));
/// assert!(!alarmed.check(&Senses { suspicion: 0.1 }));
/// ```
pub struct Guard<C> {
    predicate: Rc<dyn Fn(&C) -> bool>,
}

impl<C> Guard<C> {
    /// Create a guard from a predicate function.
    ///
    /// The predicate should be deterministic for a given context.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + 'static,
    {
        Self {
            predicate: Rc::new(predicate),
        }
    }

    /// Guard that always allows the transition.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    pub fn check(&self, ctx: &C) -> bool {
        (self.predicate)(ctx)
    }

    /// Both guards must pass.
    pub fn and(self, other: Guard<C>) -> Self
    where
        C: 'static,
    {
        Self::new(move |ctx| self.check(ctx) && other.check(ctx))
    }

    pub fn negate(self) -> Self
    where
        C: 'static,
    {
        Self::new(move |ctx| !self.check(ctx))
    }
}

impl<C> Clone for Guard<C> {
    fn clone(&self) -> Self {
        Self {
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
