//! Dict-to-Anki Core Library
//!
//! OS-agnostic engine for the Dict-to-Anki tray application: canonical key
//! tokens, the hotkey-combination model, the recording state machine, the
//! cross-thread UI event bus, and the backend availability tracker.
//!
//! # Example
//!
//! ```
//! use dict_to_anki_core::{HotkeyRecorder, KeyToken, RecorderOutput};
//!
//! use std::time::{Duration, Instant};
//!
//! let mut recorder = HotkeyRecorder::new();
//! recorder.start();
//!
//! let start = Instant::now();
//! for name in ["ctrl", "alt", "d"] {
//!     if let Some(token) = KeyToken::new(name) {
//!         let _ = recorder.on_press(token, start);
//!     }
//! }
//! let done = start + Duration::from_millis(600);
//! let mut output = None;
//! for name in ["ctrl", "alt", "d"] {
//!     if let Some(token) = KeyToken::new(name) {
//!         output = recorder.on_release(&token, done);
//!     }
//! }
//! assert_eq!(output, Some(RecorderOutput::Complete));
//!
//! let combination = recorder.finalize();
//! assert_eq!(combination.map(|c| c.to_string()), Some("ctrl+alt+d".to_string()));
//! ```

mod bus;
mod combo;
mod error;
mod keys;
mod recorder;
mod status;

pub use {
    bus::{EventReceiver, EventSender, UiEvent, channel},
    combo::HotkeyCombination,
    error::{CoreError, Result as CoreResult},
    keys::KeyToken,
    recorder::{DEFAULT_DEBOUNCE, HotkeyRecorder, RecorderOutput, RecordingSession},
    status::{ServiceStatus, StatusChange, StatusTracker},
};

#[cfg(test)]
mod tests;
