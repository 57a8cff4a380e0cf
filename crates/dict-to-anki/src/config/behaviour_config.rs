use crate::config::default_show_notifications;

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Deck that captures are filed into without asking. `None` shows the
    /// deck picker on every capture.
    #[serde(default)]
    pub default_deck: Option<String>,
    /// Whether transient messages surface as desktop notifications.
    #[serde(default = "default_show_notifications")]
    pub show_notifications: bool,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            default_deck: None,
            show_notifications: default_show_notifications(),
        }
    }
}
