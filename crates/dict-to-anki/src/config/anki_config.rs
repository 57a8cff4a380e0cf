use crate::config::default_ankiconnect_url;

use serde::{Deserialize, Serialize};

/// AnkiConnect backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnkiConfig {
    /// AnkiConnect endpoint URL.
    #[serde(default = "default_ankiconnect_url")]
    pub url: String,
}

impl Default for AnkiConfig {
    fn default() -> Self {
        Self {
            url: default_ankiconnect_url(),
        }
    }
}
