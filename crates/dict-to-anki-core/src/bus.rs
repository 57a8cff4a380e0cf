//! Cross-thread UI event bus.
//!
//! Many producer threads (hotkey callback, key-recording listener, worker
//! tasks, availability monitor) enqueue; exactly one consumer -- the UI
//! thread -- drains non-blockingly on its poll tick and dispatches each event
//! serially. Delivery is strict FIFO per the underlying channel; the
//! interleaving between independent producers is unspecified, so handlers
//! must tolerate stale events (a deck-list update arriving after the surface
//! that shows it went away is a no-op, not an error).

use std::sync::mpsc::{self, Receiver, Sender};

use tracing::trace;

/// Events delivered to the UI thread.
///
/// Ownership transfers from the producer thread to the bus to the consumer;
/// no event is ever read concurrently by two threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Show a short-lived user-facing message.
    ShowTransientMessage(String),
    /// Ask the user to choose a deck for a captured word.
    ShowDeckPicker {
        /// The captured headword (card front).
        word: String,
        /// The formatted definition (card back).
        back: String,
    },
    /// A recording session satisfied the completion condition.
    FinalizeHotkeyRecording,
    /// Bring the main surface to the user's attention.
    ShowMainWindow,
    /// Shut the application down.
    QuitApplication,
    /// The recorded-so-far hotkey display changed.
    UpdateRecordingDisplay(String),
    /// The capture history changed.
    RefreshHistoryView,
    /// Outcome of the latest availability probe.
    SetServiceStatus(bool),
    /// The deck list to display changed (live fetch or cache fallback).
    UpdateDeckList(Vec<String>),
}

/// Producer half of the bus; clone freely across threads.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<UiEvent>,
}

impl EventSender {
    /// Enqueue an event for the UI thread.
    ///
    /// Sends after the consumer has shut down are dropped: producers outlive
    /// the UI loop only briefly during shutdown and have nothing useful to
    /// do with the failure.
    pub fn emit(&self, event: UiEvent) {
        if self.tx.send(event).is_err() {
            trace!("UI event dropped after consumer shutdown");
        }
    }
}

/// Consumer half of the bus, owned by the UI thread.
#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<UiEvent>,
}

impl EventReceiver {
    /// Drain every queued event without blocking, in FIFO order.
    pub fn drain(&self) -> impl Iterator<Item = UiEvent> + '_ {
        self.rx.try_iter()
    }
}

/// Create a connected bus.
pub fn channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel();
    (EventSender { tx }, EventReceiver { rx })
}
