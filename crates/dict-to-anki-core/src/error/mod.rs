use error_location::ErrorLocation;
use thiserror::Error;

/// Engine errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A persisted or user-supplied combination string is not valid.
    ///
    /// A combination needs at least one modifier and one regular token;
    /// anything else is never persisted or bound.
    #[error("Invalid hotkey combination {combination:?} {location}")]
    InvalidCombination {
        /// The rejected combination string.
        combination: String,
        /// Source location where the error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
