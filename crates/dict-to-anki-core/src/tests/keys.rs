use crate::KeyToken;

/// WHAT: Token names canonicalize to lower-case
/// WHY: Equality between persisted and recorded tokens is case-insensitive
#[test]
#[allow(clippy::unwrap_used)]
fn given_mixed_case_name_when_creating_token_then_lower_case() {
    // Given: A name as a platform might report it
    let token = KeyToken::new("CTRL").unwrap();

    // Then: Canonical form is lower-case and classified as a modifier
    assert_eq!(token.as_str(), "ctrl");
    assert!(token.is_modifier());
}

/// WHAT: The command key collapses to `win`
/// WHY: Persisted combinations use a single spelling across platforms
#[test]
#[allow(clippy::unwrap_used)]
fn given_cmd_when_creating_token_then_normalized_to_win() {
    let token = KeyToken::new("Cmd").unwrap();

    assert_eq!(token.as_str(), "win");
    assert!(token.is_modifier());
}

/// WHAT: Empty and whitespace names are rejected
/// WHY: Unresolvable keys must be dropped, not recorded as empty tokens
#[test]
fn given_blank_name_when_creating_token_then_none() {
    assert_eq!(KeyToken::new(""), None);
    assert_eq!(KeyToken::new("   "), None);
}

/// WHAT: Regular keys are not modifiers
/// WHY: Combination validity depends on the modifier/regular split
#[test]
#[allow(clippy::unwrap_used)]
fn given_letter_when_creating_token_then_not_a_modifier() {
    assert!(!KeyToken::new("d").unwrap().is_modifier());
    assert!(!KeyToken::new("f5").unwrap().is_modifier());
}

/// WHAT: Virtual-key codes decode for letters, digits and function keys
/// WHY: Keys pressed while a modifier is held arrive as bare codes
#[test]
#[allow(clippy::unwrap_used)]
fn given_known_virtual_key_codes_when_decoding_then_canonical_tokens() {
    assert_eq!(KeyToken::from_virtual_key(65).unwrap().as_str(), "a");
    assert_eq!(KeyToken::from_virtual_key(90).unwrap().as_str(), "z");
    assert_eq!(KeyToken::from_virtual_key(48).unwrap().as_str(), "0");
    assert_eq!(KeyToken::from_virtual_key(57).unwrap().as_str(), "9");
    assert_eq!(KeyToken::from_virtual_key(112).unwrap().as_str(), "f1");
    assert_eq!(KeyToken::from_virtual_key(123).unwrap().as_str(), "f12");
}

/// WHAT: Codes outside the decode table yield None
/// WHY: Decoding is total -- unknown keys are silently ignored, never raised
#[test]
fn given_unknown_virtual_key_codes_when_decoding_then_none() {
    assert_eq!(KeyToken::from_virtual_key(47), None);
    assert_eq!(KeyToken::from_virtual_key(91), None);
    assert_eq!(KeyToken::from_virtual_key(111), None);
    assert_eq!(KeyToken::from_virtual_key(124), None);
    assert_eq!(KeyToken::from_virtual_key(0), None);
}
