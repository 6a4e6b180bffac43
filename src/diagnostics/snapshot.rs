//! Serializable descriptions of a running hierarchy.

use crate::core::TransitionRecord;
use serde::{Deserialize, Serialize};

/// Description of one state and, for composites, its active subtree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub name: String,
    pub active: bool,
    /// Key of the active child, for composites
    pub current_child: Option<String>,
    /// Key of the child that was active before the current one
    pub previous_child: Option<String>,
    /// Registered child keys in sorted order; empty for leaves
    pub children: Vec<String>,
    pub active_child: Option<Box<StateSnapshot>>,
}

impl StateSnapshot {
    /// Snapshot of a leaf. Activity is filled in by the owning slot.
    pub fn leaf(name: &str) -> Self {
        Self {
            name: name.to_string(),
            active: false,
            current_child: None,
            previous_child: None,
            children: Vec::new(),
            active_child: None,
        }
    }

    pub fn is_composite(&self) -> bool {
        !self.children.is_empty()
    }

    /// Names from this state down to the deepest active descendant.
    pub fn active_path(&self) -> Vec<&str> {
        let mut path = vec![self.name.as_str()];
        let mut node = self;
        while let Some(child) = node.active_child.as_deref() {
            path.push(child.name.as_str());
            node = child;
        }
        path
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Description of a whole driver: its registry, history and active tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub name: String,
    pub current_key: Option<String>,
    pub previous_key: Option<String>,
    pub registered: Vec<String>,
    pub history: Vec<TransitionRecord>,
    pub root: Option<StateSnapshot>,
}

impl MachineSnapshot {
    /// Names from the top-level state down to the active leaf.
    pub fn active_path(&self) -> Vec<&str> {
        self.root
            .as_ref()
            .map(StateSnapshot::active_path)
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
