//! A single conditional transition rule.

use crate::core::Guard;
use std::fmt;

/// Transition from `from` to `to`, taken when `condition` accepts the context.
///
/// Among rules with the same source, higher `priority` is evaluated first.
pub struct TransitionRule<C> {
    pub(crate) from: String,
    pub(crate) to: String,
    pub(crate) condition: Guard<C>,
    pub(crate) priority: i32,
}

impl<C> TransitionRule<C> {
    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn matches(&self, ctx: &C) -> bool {
        self.condition.check(ctx)
    }
}

impl<C> fmt::Display for TransitionRule<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} (priority: {})", self.from, self.to, self.priority)
    }
}

impl<C> fmt::Debug for TransitionRule<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionRule")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}
