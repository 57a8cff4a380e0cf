use crate::config::Config;

use std::fs;

use uuid::Uuid;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("{}-{}.toml", name, Uuid::new_v4()))
}

/// WHAT: A saved hotkey combination reloads byte-identically
/// WHY: Persisting and reloading must yield the identical canonical string
#[test]
#[allow(clippy::unwrap_used)]
fn given_saved_config_when_reloading_then_hotkey_round_trips() {
    // Given: A config with a recorded combination
    let path = temp_path("config-roundtrip");
    let mut config = Config::default();
    config.hotkey.combination = "alt+shift+k".to_string();
    config.behaviour.default_deck = Some("Vocab".to_string());

    // When: Saved and reloaded
    config.save_to(&path).unwrap();
    let reloaded = Config::load_from(&path).unwrap();

    // Then: The canonical string and the rest of the settings survive
    assert_eq!(reloaded.hotkey.combination, "alt+shift+k");
    assert_eq!(reloaded.hotkey.active_combination(), Some("alt+shift+k"));
    assert_eq!(reloaded.behaviour.default_deck.as_deref(), Some("Vocab"));
    assert!(reloaded.behaviour.show_notifications);

    let _ = fs::remove_file(&path);
}

/// WHAT: The disabled hotkey state survives a save/reload cycle
/// WHY: A reset must not silently revert to the default combination
#[test]
#[allow(clippy::unwrap_used)]
fn given_reset_hotkey_when_reloading_then_still_disabled() {
    let path = temp_path("config-disabled");
    let mut config = Config::default();
    config.hotkey.combination = String::new();

    config.save_to(&path).unwrap();
    let reloaded = Config::load_from(&path).unwrap();

    assert_eq!(reloaded.hotkey.active_combination(), None);

    let _ = fs::remove_file(&path);
}

/// WHAT: Missing sections fall back to documented defaults
/// WHY: Hand-edited or older config files must still load
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_file_when_loading_then_defaults() {
    let path = temp_path("config-empty");
    fs::write(&path, "").unwrap();

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.hotkey.combination, "ctrl+alt+d");
    assert_eq!(config.anki.url, "http://localhost:8765");
    assert_eq!(config.dictionary.lookup_timeout_secs, 5);
    assert_eq!(config.dictionary.max_definitions, 3);
    assert_eq!(config.behaviour.default_deck, None);

    let _ = fs::remove_file(&path);
}

/// WHAT: A corrupt file is a load error, not a panic
/// WHY: Startup falls back to defaults on configuration errors
#[test]
#[allow(clippy::unwrap_used)]
fn given_corrupt_file_when_loading_then_error() {
    let path = temp_path("config-corrupt");
    fs::write(&path, "this is {{{ not toml").unwrap();

    assert!(Config::load_from(&path).is_err());

    let _ = fs::remove_file(&path);
}
