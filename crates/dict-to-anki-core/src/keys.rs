//! Canonical key tokens.
//!
//! A token is the lower-case logical name of one key (`ctrl`, `a`, `f5`).
//! Left/right modifier variants and the OS/command key are collapsed at the
//! platform boundary; this module owns the canonical spelling and the
//! virtual-key decode table shared by all platforms.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical modifier names. `cmd` is accepted on input but normalized to
/// `win`, so persisted combinations use a single spelling.
const MODIFIERS: [&str; 5] = ["alt", "cmd", "ctrl", "shift", "win"];

/// One canonical key name: a modifier (`ctrl`, `alt`, `shift`, `win`) or a
/// regular token (letter, digit, function-key or other named key).
///
/// Equality is case-insensitive; the stored form is always lower-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyToken(String);

impl KeyToken {
    /// Canonicalize a raw key name.
    ///
    /// Returns `None` for empty or all-whitespace names so callers can drop
    /// unresolvable keys without special-casing.
    pub fn new(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }
        if name == "cmd" {
            return Some(Self("win".to_string()));
        }
        Some(Self(name))
    }

    /// Decode a virtual-key code: A–Z, 0–9 and F1–F12.
    ///
    /// Covers key events that arrive with neither a character nor a key name
    /// (a letter pressed while a modifier is held). Codes outside these
    /// ranges yield `None` and are ignored by all callers; decoding never
    /// fails loudly.
    pub fn from_virtual_key(code: u32) -> Option<Self> {
        match code {
            // A-Z: shift down into ASCII lower-case.
            65..=90 => char::from_u32(code + 32).map(|c| Self(c.to_string())),
            // 0-9.
            48..=57 => char::from_u32(code).map(|c| Self(c.to_string())),
            // F1-F12.
            112..=123 => Some(Self(format!("f{}", code - 111))),
            _ => None,
        }
    }

    /// Whether this token is one of the modifier keys.
    pub fn is_modifier(&self) -> bool {
        MODIFIERS.contains(&self.0.as_str())
    }

    /// The canonical lower-case name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
