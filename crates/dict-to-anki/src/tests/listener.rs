use crate::listener::normalize;

use rdev::Key;

fn name_of(key: Key, name: Option<&str>) -> Option<String> {
    normalize(key, name).map(|token| token.as_str().to_string())
}

/// WHAT: Left/right modifier variants collapse to the plain modifier
/// WHY: A combination must not distinguish which shift key was held
#[test]
fn given_modifier_variants_when_normalizing_then_collapsed() {
    assert_eq!(name_of(Key::ControlLeft, None), Some("ctrl".to_string()));
    assert_eq!(name_of(Key::ControlRight, None), Some("ctrl".to_string()));
    assert_eq!(name_of(Key::Alt, None), Some("alt".to_string()));
    assert_eq!(name_of(Key::AltGr, None), Some("alt".to_string()));
    assert_eq!(name_of(Key::ShiftLeft, None), Some("shift".to_string()));
    assert_eq!(name_of(Key::ShiftRight, None), Some("shift".to_string()));
}

/// WHAT: The OS/command key collapses to win
/// WHY: Persisted combinations use one spelling across platforms
#[test]
fn given_meta_keys_when_normalizing_then_win() {
    assert_eq!(name_of(Key::MetaLeft, None), Some("win".to_string()));
    assert_eq!(name_of(Key::MetaRight, None), Some("win".to_string()));
}

/// WHAT: Printable characters use the OS-supplied name, lower-cased
/// WHY: The character reflects the active keyboard layout
#[test]
fn given_printable_name_when_normalizing_then_lower_cased_character() {
    assert_eq!(name_of(Key::KeyD, Some("D")), Some("d".to_string()));
    assert_eq!(name_of(Key::KeyD, Some("d")), Some("d".to_string()));
    assert_eq!(name_of(Key::Num3, Some("3")), Some("3".to_string()));
}

/// WHAT: Keys without a printable name decode from the key identity
/// WHY: A letter pressed while a modifier is held arrives with no character
#[test]
fn given_no_name_when_normalizing_then_key_identity() {
    assert_eq!(name_of(Key::KeyD, None), Some("d".to_string()));
    assert_eq!(name_of(Key::Num3, None), Some("3".to_string()));
    assert_eq!(name_of(Key::F8, None), Some("f8".to_string()));
    assert_eq!(name_of(Key::Space, Some(" ")), Some("space".to_string()));
    assert_eq!(name_of(Key::Escape, Some("\u{1b}")), Some("esc".to_string()));
}

/// WHAT: Unknown key codes decode through the virtual-key table
/// WHY: Platforms report some keys only as raw codes
#[test]
fn given_unknown_key_codes_when_normalizing_then_virtual_key_decode() {
    assert_eq!(name_of(Key::Unknown(68), None), Some("d".to_string()));
    assert_eq!(name_of(Key::Unknown(55), None), Some("7".to_string()));
    assert_eq!(name_of(Key::Unknown(119), None), Some("f8".to_string()));
    assert_eq!(name_of(Key::Unknown(255), None), None);
}

/// WHAT: Unresolvable keys normalize to nothing
/// WHY: Callers ignore them instead of recording junk tokens
#[test]
fn given_unresolvable_keys_when_normalizing_then_none() {
    assert_eq!(name_of(Key::CapsLock, None), None);
    assert_eq!(name_of(Key::PrintScreen, None), None);
}
