use crate::{AppError, AppResult};

use std::panic::Location;

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use error_location::ErrorLocation;

/// Returns the platform-specific copy modifier key.
///
/// macOS uses Cmd (Meta), Windows and Linux use Ctrl.
fn copy_modifier() -> Key {
    #[cfg(target_os = "macos")]
    {
        Key::Meta
    }
    #[cfg(not(target_os = "macos"))]
    {
        Key::Control
    }
}

/// RAII guard that guarantees the copy modifier key is released when dropped.
///
/// Prevents stuck keyboard if operations between key press and release fail or panic.
///
/// Before pressing, releases any physically-held modifiers: the user's
/// capture hotkey may still be half-held, and a synthetic copy chord must
/// not combine with it. Those releases are best-effort -- the OS resets
/// modifier state on the user's next physical key press either way.
///
/// Owns the `Enigo` instance so all keyboard operations go through it.
pub struct CopyKeyGuard {
    enigo: Enigo,
    modifier: Key,
}

impl CopyKeyGuard {
    /// Release held modifiers, press the copy modifier, and return a guard
    /// that will release it on drop.
    #[track_caller]
    pub(crate) fn new() -> AppResult<Self> {
        let modifier = copy_modifier();

        let mut enigo =
            Enigo::new(&Settings::default()).map_err(|e| AppError::InputSynthesisFailed {
                reason: format!("Failed to create Enigo: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        for held in [Key::Control, Key::Alt, Key::Shift, Key::Meta] {
            let _ = enigo.key(held, Direction::Release);
        }

        enigo
            .key(modifier, Direction::Press)
            .map_err(|e| AppError::InputSynthesisFailed {
                reason: format!("Failed to press copy modifier: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self { enigo, modifier })
    }

    /// Access the underlying Enigo for additional key operations while the
    /// modifier is held.
    pub(crate) fn enigo_mut(&mut self) -> &mut Enigo {
        &mut self.enigo
    }
}

impl Drop for CopyKeyGuard {
    fn drop(&mut self) {
        let _ = self.enigo.key(self.modifier, Direction::Release);
    }
}
