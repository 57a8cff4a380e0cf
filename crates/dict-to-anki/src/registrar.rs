//! Global hotkey ownership.
//!
//! Owns the `GlobalHotKeyManager` and at most one active binding. Must live
//! on the main thread -- tao's event loop pumps the Windows messages needed
//! for `WM_HOTKEY` delivery -- and must be kept alive for the binding to
//! remain registered.

use crate::{AppError, AppResult};

use std::panic::Location;

use dict_to_anki_core::HotkeyCombination;
use error_location::ErrorLocation;
use global_hotkey::{
    GlobalHotKeyManager,
    hotkey::{Code, HotKey, Modifiers},
};
use tracing::{info, warn};

/// Registrar for the capture hotkey.
pub struct HotkeyRegistrar {
    manager: GlobalHotKeyManager,
    /// OS-level binding currently registered, if any.
    bound: Option<HotKey>,
    /// The combination this registrar answers for, kept across suspends.
    combination: Option<HotkeyCombination>,
}

impl HotkeyRegistrar {
    /// Create the manager. Fails when the platform refuses a hotkey hook.
    #[track_caller]
    pub fn new() -> AppResult<Self> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            manager,
            bound: None,
            combination: None,
        })
    }

    /// Bind the capture hotkey, replacing any previous binding.
    #[track_caller]
    pub fn bind(&mut self, combination: &HotkeyCombination) -> AppResult<()> {
        let hotkey = to_hotkey(combination)?;

        self.unregister_current();

        self.manager
            .register(hotkey)
            .map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to register {}: {}", combination, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.bound = Some(hotkey);
        self.combination = Some(combination.clone());

        info!(hotkey = %combination, "Global hotkey registered");

        Ok(())
    }

    /// Unregister while keeping the combination, so the chord being recorded
    /// is not intercepted as the old hotkey.
    pub fn suspend(&mut self) {
        self.unregister_current();
    }

    /// Re-register the kept combination after a recording that produced no
    /// new one. No-op when nothing is kept or the binding is still live.
    pub fn resume(&mut self) -> AppResult<()> {
        if self.bound.is_some() {
            return Ok(());
        }
        let Some(combination) = self.combination.clone() else {
            return Ok(());
        };
        self.bind(&combination)
    }

    /// Drop any binding and forget the combination -- the disabled state.
    pub fn clear(&mut self) {
        self.unregister_current();
        self.combination = None;
        info!("Global hotkey cleared");
    }

    /// The combination this registrar answers for, bound or suspended.
    pub fn combination(&self) -> Option<&HotkeyCombination> {
        self.combination.as_ref()
    }

    fn unregister_current(&mut self) {
        if let Some(hotkey) = self.bound.take() {
            if let Err(e) = self.manager.unregister(hotkey) {
                warn!(error = %e, "Failed to unregister previous hotkey");
            }
        }
    }
}

/// Translate a combination into an OS-level hotkey.
///
/// The OS API accepts exactly one non-modifier key per binding; recorded
/// combinations with more regular tokens are valid to persist but cannot be
/// bound, and the caller leaves the hotkey disabled.
#[track_caller]
pub(crate) fn to_hotkey(combination: &HotkeyCombination) -> AppResult<HotKey> {
    if combination.regular_count() != 1 {
        return Err(AppError::HotkeyNotRepresentable {
            combination: combination.to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let mut modifiers = Modifiers::empty();
    for modifier in combination.modifiers() {
        modifiers |= match modifier.as_str() {
            "ctrl" => Modifiers::CONTROL,
            "alt" => Modifiers::ALT,
            "shift" => Modifiers::SHIFT,
            // `cmd` is canonicalized to `win` before it gets here.
            _ => Modifiers::SUPER,
        };
    }

    // Exactly one regular token, checked above.
    let code = match combination.regulars().next() {
        Some(token) => token_to_code(token.as_str())?,
        None => {
            return Err(AppError::HotkeyNotRepresentable {
                combination: combination.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    Ok(HotKey::new(Some(modifiers), code))
}

/// Map a canonical regular token to an OS key code.
#[track_caller]
fn token_to_code(token: &str) -> AppResult<Code> {
    let code = match token {
        "a" => Code::KeyA,
        "b" => Code::KeyB,
        "c" => Code::KeyC,
        "d" => Code::KeyD,
        "e" => Code::KeyE,
        "f" => Code::KeyF,
        "g" => Code::KeyG,
        "h" => Code::KeyH,
        "i" => Code::KeyI,
        "j" => Code::KeyJ,
        "k" => Code::KeyK,
        "l" => Code::KeyL,
        "m" => Code::KeyM,
        "n" => Code::KeyN,
        "o" => Code::KeyO,
        "p" => Code::KeyP,
        "q" => Code::KeyQ,
        "r" => Code::KeyR,
        "s" => Code::KeyS,
        "t" => Code::KeyT,
        "u" => Code::KeyU,
        "v" => Code::KeyV,
        "w" => Code::KeyW,
        "x" => Code::KeyX,
        "y" => Code::KeyY,
        "z" => Code::KeyZ,
        "0" => Code::Digit0,
        "1" => Code::Digit1,
        "2" => Code::Digit2,
        "3" => Code::Digit3,
        "4" => Code::Digit4,
        "5" => Code::Digit5,
        "6" => Code::Digit6,
        "7" => Code::Digit7,
        "8" => Code::Digit8,
        "9" => Code::Digit9,
        "f1" => Code::F1,
        "f2" => Code::F2,
        "f3" => Code::F3,
        "f4" => Code::F4,
        "f5" => Code::F5,
        "f6" => Code::F6,
        "f7" => Code::F7,
        "f8" => Code::F8,
        "f9" => Code::F9,
        "f10" => Code::F10,
        "f11" => Code::F11,
        "f12" => Code::F12,
        "space" => Code::Space,
        "tab" => Code::Tab,
        "enter" => Code::Enter,
        "esc" => Code::Escape,
        other => {
            return Err(AppError::HotkeyNotRepresentable {
                combination: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };
    Ok(code)
}
