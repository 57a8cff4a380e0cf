use dict_to_anki_core::CoreError;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Application-level errors for the dict-to-anki binary.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error from dict-to-anki-core.
    #[error("Engine error: {source} {location}")]
    Core {
        /// The underlying engine error.
        #[source]
        source: CoreError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to register or unregister the global hotkey.
    #[error("Hotkey registration failed: {reason} {location}")]
    HotkeyRegistrationFailed {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// A recorded combination cannot be expressed as an OS-level hotkey.
    #[error("Hotkey not representable by the OS: {combination} {location}")]
    HotkeyNotRepresentable {
        /// The canonical combination string.
        combination: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to synthesize keyboard input for the copy command.
    #[error("Input synthesis failed: {reason} {location}")]
    InputSynthesisFailed {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The flashcard backend could not be reached.
    #[error("Flashcard backend unreachable: {reason} {location}")]
    BackendUnreachable {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The flashcard backend answered but rejected the request.
    #[error("Flashcard backend error: {reason} {location}")]
    BackendRejected {
        /// The error string returned by the backend.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The note already exists in the target deck.
    #[error("'{word}' already exists in deck '{deck}' {location}")]
    DuplicateNote {
        /// The captured headword.
        word: String,
        /// The target deck name.
        deck: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration or cache loading/saving error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Another instance already holds the single-instance guard.
    #[error("Dict-to-Anki is already running: {reason} {location}")]
    AlreadyRunning {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

// Manual From impls with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<CoreError> for AppError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        AppError::Core {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AppError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
