//! Hotkey combinations.

use crate::{CoreError, KeyToken};

use std::{collections::BTreeSet, fmt, panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// A set of simultaneously-pressed keys bound to trigger capture.
///
/// Serialized as `mod1+mod2+...+regular1+...` with modifiers sorted before
/// regular tokens and each group alphabetically sorted, so recording
/// `Ctrl+Alt+D` and `Alt+Ctrl+D` yields the identical string. A combination
/// is only constructible when it has at least one modifier and at least one
/// regular token; the serialized form round-trips byte-identically through
/// [`FromStr`]/[`fmt::Display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyCombination {
    modifiers: BTreeSet<KeyToken>,
    regulars: BTreeSet<KeyToken>,
}

impl HotkeyCombination {
    /// Build a combination from recorded tokens.
    ///
    /// Returns `None` unless the tokens contain at least one modifier and
    /// one regular key. Duplicate tokens collapse.
    pub fn from_tokens<I>(tokens: I) -> Option<Self>
    where
        I: IntoIterator<Item = KeyToken>,
    {
        let mut modifiers = BTreeSet::new();
        let mut regulars = BTreeSet::new();

        for token in tokens {
            if token.is_modifier() {
                modifiers.insert(token);
            } else {
                regulars.insert(token);
            }
        }

        if modifiers.is_empty() || regulars.is_empty() {
            return None;
        }

        Some(Self { modifiers, regulars })
    }

    /// Modifier tokens in canonical (alphabetical) order.
    pub fn modifiers(&self) -> impl Iterator<Item = &KeyToken> {
        self.modifiers.iter()
    }

    /// Regular tokens in canonical (alphabetical) order.
    pub fn regulars(&self) -> impl Iterator<Item = &KeyToken> {
        self.regulars.iter()
    }

    /// Number of regular (non-modifier) tokens.
    pub fn regular_count(&self) -> usize {
        self.regulars.len()
    }

    /// Upper-cased display form for UI surfaces (`CTRL+ALT+D`).
    pub fn display_upper(&self) -> String {
        self.to_string().to_uppercase()
    }
}

impl fmt::Display for HotkeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for token in self.modifiers.iter().chain(self.regulars.iter()) {
            if !first {
                f.write_str("+")?;
            }
            f.write_str(token.as_str())?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for HotkeyCombination {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = s.split('+').filter_map(KeyToken::new);
        Self::from_tokens(tokens).ok_or_else(|| CoreError::InvalidCombination {
            combination: s.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
