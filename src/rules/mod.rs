//! Declarative transition rules.
//!
//! Rules move the decision "when do we leave this state" out of hand-written
//! hooks: each rule names a source key, a target key, a condition over the
//! context and a priority. A composite evaluates its rules during update when
//! its own hook did not transition; the driver evaluates its rules after each
//! update.

mod rule;
mod table;

pub use rule::TransitionRule;
pub use table::TransitionRules;
