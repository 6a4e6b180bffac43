//! Runtime settings shared by composites and drivers.

use serde::{Deserialize, Serialize};

/// Number of transitions each registry remembers unless configured otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Tunables for state registries.
///
/// Missing fields fall back to their defaults, so a partial JSON document is
/// accepted.
///
/// ```rust
/// use statecraft::Settings;
///
/// let settings = Settings::from_json(r#"{ "history_capacity": 3 }"#).unwrap();
/// assert_eq!(settings.history_capacity, 3);
///
/// let defaults = Settings::from_json("{}").unwrap();
/// assert_eq!(defaults, Settings::default());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Transitions kept per registry; `0` disables history.
    pub history_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keeps_ten_transitions() {
        assert_eq!(Settings::default().history_capacity, 10);
    }

    #[test]
    fn json_overrides_defaults() {
        let settings = Settings::from_json(r#"{"history_capacity": 0}"#).unwrap();
        assert_eq!(settings.history_capacity, 0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Settings::from_json("history_capacity = 3").is_err());
    }

    #[test]
    fn builder_style_override() {
        let settings = Settings::default().with_history_capacity(2);
        assert_eq!(settings.history_capacity, 2);
    }
}
