//! Priority-ordered table of conditional transitions.

use crate::core::Guard;
use crate::hierarchy::ConfigurationError;
use crate::rules::rule::TransitionRule;
use std::collections::HashMap;

/// Conditional `from -> to` rules, grouped by source key.
///
/// Rules for one source are kept sorted by descending priority; rules with
/// equal priority keep their insertion order.
///
/// # Example
///
/// ```rust
/// use statecraft::rules::TransitionRules;
///
/// struct Senses {
///     suspicion: f32,
///     target_visible: bool,
/// }
///
/// let mut rules = TransitionRules::new();
/// rules.add_rule("Patrol", "Alert", |s: &Senses| s.suspicion >= 0.3, 0).unwrap();
/// rules.add_rule("Patrol", "Combat", |s: &Senses| s.target_visible, 10).unwrap();
///
/// let senses = Senses { suspicion: 0.5, target_visible: true };
/// assert_eq!(rules.evaluate("Patrol", &senses), Some("Combat"));
///
/// let senses = Senses { suspicion: 0.5, target_visible: false };
/// assert_eq!(rules.evaluate("Patrol", &senses), Some("Alert"));
/// ```
pub struct TransitionRules<C> {
    rules: HashMap<String, Vec<TransitionRule<C>>>,
}

impl<C: 'static> Default for TransitionRules<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> TransitionRules<C> {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Add a rule. Both keys must be non-empty.
    pub fn add_rule<F>(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        condition: F,
        priority: i32,
    ) -> Result<(), ConfigurationError>
    where
        F: Fn(&C) -> bool + 'static,
    {
        self.add_guarded_rule(from, to, Guard::new(condition), priority)
    }

    pub fn add_guarded_rule(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        condition: Guard<C>,
        priority: i32,
    ) -> Result<(), ConfigurationError> {
        let (from, to) = (from.into(), to.into());
        if from.is_empty() || to.is_empty() {
            return Err(ConfigurationError::EmptyKey);
        }

        let rules = self.rules.entry(from.clone()).or_default();
        rules.push(TransitionRule {
            from,
            to,
            condition,
            priority,
        });
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(())
    }

    /// Target of the first rule from `current` whose condition holds.
    pub fn evaluate(&self, current: &str, ctx: &C) -> Option<&str> {
        self.rules
            .get(current)?
            .iter()
            .find(|rule| rule.matches(ctx))
            .map(TransitionRule::to)
    }

    /// Distinct targets reachable from `from`, in evaluation order.
    pub fn possible_transitions(&self, from: &str) -> Vec<&str> {
        let mut targets: Vec<&str> = Vec::new();
        for rule in self.rules.get(from).into_iter().flatten() {
            if !targets.contains(&rule.to()) {
                targets.push(rule.to());
            }
        }
        targets
    }

    pub fn has_rule(&self, from: &str, to: &str) -> bool {
        self.rules
            .get(from)
            .is_some_and(|rules| rules.iter().any(|rule| rule.to == to))
    }

    pub fn rule_count(&self, from: &str) -> usize {
        self.rules.get(from).map_or(0, Vec::len)
    }

    pub fn rules_from(&self, from: &str) -> &[TransitionRule<C>] {
        self.rules.get(from).map_or(&[], Vec::as_slice)
    }

    pub fn remove_rules_from(&mut self, from: &str) {
        self.rules.remove(from);
    }

    pub fn remove_rule(&mut self, from: &str, to: &str) {
        if let Some(rules) = self.rules.get_mut(from) {
            rules.retain(|rule| rule.to != to);
        }
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Source keys that have at least one rule, sorted.
    pub fn states_with_rules(&self) -> Vec<&str> {
        let mut states: Vec<&str> = self
            .rules
            .iter()
            .filter(|(_, rules)| !rules.is_empty())
            .map(|(from, _)| from.as_str())
            .collect();
        states.sort_unstable();
        states
    }
}
