//! Raw keyboard listener for hotkey recording.
//!
//! `rdev::listen()` is a blocking OS-level call that never returns while the
//! process is alive, so it runs on one dedicated thread spawned lazily on
//! the first recording session. The thread lives for the rest of the
//! process (rdev has no graceful shutdown API) and consumes no meaningful
//! CPU while no handler is subscribed -- events are normalized and discarded.
//!
//! Only the recording state machine consumes raw key events; the bound
//! capture hotkey itself is delivered by `global-hotkey`, not this listener.

use crate::{AppError, AppResult};

use std::{
    panic::Location,
    sync::{Arc, Mutex, PoisonError},
    time::Instant,
};

use dict_to_anki_core::{EventSender, HotkeyRecorder, KeyToken, RecorderOutput, UiEvent};
use error_location::ErrorLocation;
use rdev::{Event, EventType, Key};
use tracing::{debug, error, info};

/// Routes normalized key events into the recorder while a session is active.
struct RecordingHandler {
    recorder: Arc<Mutex<HotkeyRecorder>>,
    events: EventSender,
}

impl RecordingHandler {
    fn on_event(&self, event: &Event) {
        match event.event_type {
            EventType::KeyPress(key) => {
                let Some(token) = normalize(key, event.name.as_deref()) else {
                    return;
                };
                let output = self
                    .recorder
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .on_press(token, Instant::now());
                self.emit(output);
            }
            EventType::KeyRelease(key) => {
                let Some(token) = normalize(key, event.name.as_deref()) else {
                    return;
                };
                let output = self
                    .recorder
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .on_release(&token, Instant::now());
                self.emit(output);
            }
            _ => {}
        }
    }

    fn emit(&self, output: Option<RecorderOutput>) {
        match output {
            Some(RecorderOutput::Display(text)) => {
                self.events.emit(UiEvent::UpdateRecordingDisplay(text));
            }
            Some(RecorderOutput::Complete) => {
                self.events.emit(UiEvent::FinalizeHotkeyRecording);
            }
            None => {}
        }
    }
}

/// OS key-event source behind a subscribe/unsubscribe surface.
///
/// At most one handler is subscribed at a time, matching the singleton
/// recording session.
pub struct KeyListener {
    handler: Arc<Mutex<Option<RecordingHandler>>>,
    spawned: bool,
}

impl KeyListener {
    /// Listener with no OS thread yet; the thread starts on first subscribe.
    pub fn new() -> Self {
        Self {
            handler: Arc::new(Mutex::new(None)),
            spawned: false,
        }
    }

    /// Start routing key events into `recorder`, spawning the OS listener
    /// thread if this is the first subscription.
    pub fn subscribe(
        &mut self,
        recorder: Arc<Mutex<HotkeyRecorder>>,
        events: EventSender,
    ) -> AppResult<()> {
        *self.handler.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(RecordingHandler { recorder, events });

        if !self.spawned {
            self.spawn_listener_thread()?;
            self.spawned = true;
        }

        debug!("Key listener subscribed");
        Ok(())
    }

    /// Stop routing key events. The OS thread stays alive and discards.
    pub fn unsubscribe(&self) {
        *self.handler.lock().unwrap_or_else(PoisonError::into_inner) = None;
        debug!("Key listener unsubscribed");
    }

    #[track_caller]
    fn spawn_listener_thread(&self) -> AppResult<()> {
        let handler = Arc::clone(&self.handler);

        std::thread::Builder::new()
            .name("key-listener".to_string())
            .spawn(move || {
                info!("Key listener thread started");
                let result = rdev::listen(move |event| {
                    let guard = handler.lock().unwrap_or_else(PoisonError::into_inner);
                    if let Some(active) = guard.as_ref() {
                        active.on_event(&event);
                    }
                });
                if let Err(e) = result {
                    // Typically missing input permissions; recording is
                    // unavailable but the rest of the app keeps working.
                    error!(error = ?e, "Key listener thread failed");
                }
            })
            .map_err(|e| AppError::IoError {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }
}

impl Default for KeyListener {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a raw rdev key event to a canonical token.
///
/// Left/right modifier variants collapse to the plain modifier name and the
/// OS/command key collapses to `win`. Printable keys use the character the
/// OS supplies when no modifier is held; otherwise the key identity itself
/// is decoded (letters, digits, function keys and a few named keys). Keys
/// resolvable by none of these rules yield `None` and are ignored.
pub(crate) fn normalize(key: Key, name: Option<&str>) -> Option<KeyToken> {
    match key {
        Key::ControlLeft | Key::ControlRight => KeyToken::new("ctrl"),
        Key::Alt | Key::AltGr => KeyToken::new("alt"),
        Key::ShiftLeft | Key::ShiftRight => KeyToken::new("shift"),
        Key::MetaLeft | Key::MetaRight => KeyToken::new("win"),
        Key::Unknown(code) => KeyToken::from_virtual_key(code),
        _ => {
            // A single printable character means the OS already decoded the
            // key for us (no modifier held).
            if let Some(name) = name {
                let mut chars = name.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    if !c.is_control() && !c.is_whitespace() {
                        return KeyToken::new(&c.to_string());
                    }
                }
            }
            key_name(key).and_then(KeyToken::new)
        }
    }
}

/// Canonical names for keys that arrive without a printable character
/// (pressed under a modifier, or inherently non-printing).
fn key_name(key: Key) -> Option<&'static str> {
    let name = match key {
        Key::KeyA => "a",
        Key::KeyB => "b",
        Key::KeyC => "c",
        Key::KeyD => "d",
        Key::KeyE => "e",
        Key::KeyF => "f",
        Key::KeyG => "g",
        Key::KeyH => "h",
        Key::KeyI => "i",
        Key::KeyJ => "j",
        Key::KeyK => "k",
        Key::KeyL => "l",
        Key::KeyM => "m",
        Key::KeyN => "n",
        Key::KeyO => "o",
        Key::KeyP => "p",
        Key::KeyQ => "q",
        Key::KeyR => "r",
        Key::KeyS => "s",
        Key::KeyT => "t",
        Key::KeyU => "u",
        Key::KeyV => "v",
        Key::KeyW => "w",
        Key::KeyX => "x",
        Key::KeyY => "y",
        Key::KeyZ => "z",
        Key::Num0 => "0",
        Key::Num1 => "1",
        Key::Num2 => "2",
        Key::Num3 => "3",
        Key::Num4 => "4",
        Key::Num5 => "5",
        Key::Num6 => "6",
        Key::Num7 => "7",
        Key::Num8 => "8",
        Key::Num9 => "9",
        Key::F1 => "f1",
        Key::F2 => "f2",
        Key::F3 => "f3",
        Key::F4 => "f4",
        Key::F5 => "f5",
        Key::F6 => "f6",
        Key::F7 => "f7",
        Key::F8 => "f8",
        Key::F9 => "f9",
        Key::F10 => "f10",
        Key::F11 => "f11",
        Key::F12 => "f12",
        Key::Space => "space",
        Key::Tab => "tab",
        Key::Return => "enter",
        Key::Escape => "esc",
        _ => return None,
    };
    Some(name)
}
