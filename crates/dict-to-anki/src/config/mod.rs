mod anki_config;
mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod dictionary_config;
mod hotkey_config;

pub(crate) use {
    anki_config::AnkiConfig, behaviour_config::BehaviourConfig, config::Config,
    dictionary_config::DictionaryConfig, hotkey_config::HotkeyConfig,
};

pub(crate) const DEFAULT_HOTKEY: &str = "ctrl+alt+d";
pub(crate) const DEFAULT_ANKICONNECT_URL: &str = "http://localhost:8765";
pub(crate) const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 5;
pub(crate) const DEFAULT_MAX_DEFINITIONS: usize = 3;
pub(crate) const DEFAULT_SHOW_NOTIFICATIONS: bool = true;

pub(crate) fn default_combination() -> String {
    DEFAULT_HOTKEY.to_string()
}

pub(crate) fn default_ankiconnect_url() -> String {
    DEFAULT_ANKICONNECT_URL.to_string()
}

pub(crate) fn default_lookup_timeout_secs() -> u64 {
    DEFAULT_LOOKUP_TIMEOUT_SECS
}

pub(crate) fn default_max_definitions() -> usize {
    DEFAULT_MAX_DEFINITIONS
}

pub(crate) fn default_show_notifications() -> bool {
    DEFAULT_SHOW_NOTIFICATIONS
}
