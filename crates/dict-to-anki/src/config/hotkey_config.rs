use crate::config::default_combination;

use serde::{Deserialize, Serialize};

/// Global hotkey configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Canonical combination string (`ctrl+alt+d`). An empty string is the
    /// disabled state after a reset -- kept as a string, not an `Option`, so
    /// the disabled state survives serialization.
    #[serde(default = "default_combination")]
    pub combination: String,
}

impl HotkeyConfig {
    /// The configured combination string, `None` when disabled.
    pub fn active_combination(&self) -> Option<&str> {
        let combination = self.combination.trim();
        if combination.is_empty() {
            None
        } else {
            Some(combination)
        }
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            combination: default_combination(),
        }
    }
}
