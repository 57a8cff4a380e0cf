use crate::config::{default_lookup_timeout_secs, default_max_definitions};

use serde::{Deserialize, Serialize};

/// Dictionary lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Request timeout for dictionary API calls, in seconds.
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,
    /// Maximum number of definitions on one card.
    #[serde(default = "default_max_definitions")]
    pub max_definitions: usize,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_secs: default_lookup_timeout_secs(),
            max_definitions: default_max_definitions(),
        }
    }
}
