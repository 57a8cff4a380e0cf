use crate::{HotkeyCombination, KeyToken};

fn tokens(names: &[&str]) -> Vec<KeyToken> {
    names.iter().filter_map(|n| KeyToken::new(n)).collect()
}

/// WHAT: Serialization sorts modifiers before regular tokens, each group alphabetically
/// WHY: Recording the same chord in any order must persist identically
#[test]
#[allow(clippy::unwrap_used)]
fn given_unordered_tokens_when_building_combination_then_canonical_order() {
    // Given: Tokens in the order a user might release them
    let combination = HotkeyCombination::from_tokens(tokens(&["d", "ctrl", "alt"])).unwrap();

    // Then: Modifiers first, alphabetical within each group
    assert_eq!(combination.to_string(), "alt+ctrl+d");
}

/// WHAT: A combination without a modifier or without a regular key is invalid
/// WHY: Invalid combinations are never persisted or bound
#[test]
fn given_deficient_token_sets_when_building_combination_then_none() {
    assert_eq!(HotkeyCombination::from_tokens(tokens(&["d", "x"])), None);
    assert_eq!(HotkeyCombination::from_tokens(tokens(&["ctrl", "shift"])), None);
    assert_eq!(HotkeyCombination::from_tokens(tokens(&["d"])), None);
    assert_eq!(HotkeyCombination::from_tokens(Vec::new()), None);
}

/// WHAT: Parse and display round-trip byte-identically
/// WHY: A reloaded combination must match what was persisted
#[test]
#[allow(clippy::unwrap_used)]
fn given_canonical_string_when_round_tripping_then_identical() {
    let combination: HotkeyCombination = "ctrl+alt+d".parse().unwrap();

    assert_eq!(combination.to_string(), "ctrl+alt+d");
}

/// WHAT: Parsing canonicalizes case and token order
/// WHY: Hand-edited config values should still resolve to the canonical form
#[test]
#[allow(clippy::unwrap_used)]
fn given_uncanonical_string_when_parsing_then_canonicalized() {
    let combination: HotkeyCombination = "D+Ctrl+ALT".parse().unwrap();

    assert_eq!(combination.to_string(), "alt+ctrl+d");
    assert_eq!(combination.display_upper(), "ALT+CTRL+D");
}

/// WHAT: Invalid strings fail to parse
/// WHY: A corrupt persisted value falls back to the disabled hotkey, not a panic
#[test]
fn given_invalid_strings_when_parsing_then_error() {
    assert!("d".parse::<HotkeyCombination>().is_err());
    assert!("ctrl+shift".parse::<HotkeyCombination>().is_err());
    assert!("".parse::<HotkeyCombination>().is_err());
    assert!("++".parse::<HotkeyCombination>().is_err());
}

/// WHAT: Duplicate tokens collapse
/// WHY: Key auto-repeat while recording must not produce duplicate entries
#[test]
#[allow(clippy::unwrap_used)]
fn given_repeated_tokens_when_building_combination_then_deduplicated() {
    let combination =
        HotkeyCombination::from_tokens(tokens(&["ctrl", "ctrl", "d", "d"])).unwrap();

    assert_eq!(combination.to_string(), "ctrl+d");
    assert_eq!(combination.regular_count(), 1);
}
