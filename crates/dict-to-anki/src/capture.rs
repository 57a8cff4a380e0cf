//! Capture workflow.
//!
//! Runs off the UI thread on every hotkey activation: clipboard-based text
//! capture, dictionary lookup, then note creation -- directly into the
//! default deck, or through a deck-picker round-trip on the UI thread. Only
//! queued events ever cross back to the UI; every failure in this path
//! becomes a transient message, never an uncaught error.

use crate::{
    AnkiClient, AppError, AppResult, CopyKeyGuard, DictionaryClient, anki::format_card_back,
    clipboard, monitor::FETCH_TIMEOUT,
};

use std::{
    panic::Location,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use dict_to_anki_core::{EventSender, UiEvent};
use enigo::{Direction, Key, Keyboard};
use error_location::ErrorLocation;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Delay before touching the keyboard, giving the user time to release the
/// hotkey modifiers. Empirically chosen.
const MODIFIER_SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Delay between releasing held modifiers and sending the copy chord.
const RELEASE_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Delay between the copy chord and reading the clipboard back. Too short
/// and the read races the application servicing the copy.
const COPY_SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Delay between key events in the copy simulation.
const KEY_EVENT_DELAY: Duration = Duration::from_millis(10);

/// Everything one capture task needs; cheap to clone per activation.
#[derive(Debug, Clone)]
pub struct CaptureContext {
    /// Bus producer for UI-bound events.
    pub events: EventSender,
    /// Flashcard backend client.
    pub anki: AnkiClient,
    /// Dictionary lookup client.
    pub dictionary: DictionaryClient,
    /// Deck captures are filed into without asking; `None` asks every time.
    /// Shared with the UI thread, which updates it from the tray menu.
    pub default_deck: Arc<Mutex<Option<String>>>,
}

/// Entry point for one hotkey activation.
///
/// Never propagates an error: anything that goes wrong surfaces as exactly
/// one transient message.
pub async fn run_capture(ctx: CaptureContext, direct_text: Option<String>) {
    let session_id = Uuid::new_v4();
    if let Err(e) = capture_once(&ctx, direct_text, session_id).await {
        warn!(session_id = %session_id, error = %e, "Capture failed");
        ctx.events
            .emit(UiEvent::ShowTransientMessage(format!("Capture failed: {}", e)));
    }
}

/// Complete a capture that went through the deck picker.
pub async fn run_deck_choice(ctx: CaptureContext, deck: String, word: String, back: String) {
    create_note(&ctx, &deck, &word, &back).await;
}

#[instrument(skip(ctx, direct_text))]
async fn capture_once(
    ctx: &CaptureContext,
    direct_text: Option<String>,
    session_id: Uuid,
) -> AppResult<()> {
    let text = match direct_text {
        Some(text) => text,
        None => capture_selection().await?,
    };

    let Some(word) = headword(&text) else {
        // Normal outcome: nothing under the cursor, or the selection held no
        // extractable word.
        info!(session_id = %session_id, "Nothing captured");
        ctx.events.emit(UiEvent::ShowTransientMessage(
            "No text selected. Highlight a word and try again.".to_string(),
        ));
        return Ok(());
    };

    info!(session_id = %session_id, word, "Looking up captured word");

    let definitions = ctx.dictionary.lookup(&word).await;
    let back = if definitions.is_empty() {
        info!(session_id = %session_id, word, "No definitions found");
        "No definition found".to_string()
    } else {
        format_card_back(&definitions)
    };

    let default_deck = ctx
        .default_deck
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();

    match default_deck {
        Some(deck) => create_note(ctx, &deck, &word, &back).await,
        None => {
            // The UI thread collects the deck choice and finishes the
            // capture via run_deck_choice.
            ctx.events.emit(UiEvent::ShowDeckPicker { word, back });
        }
    }

    Ok(())
}

/// Clipboard-based selection capture: clear, synthesize a copy, settle,
/// read back. An empty result is a normal outcome, not an error.
async fn capture_selection() -> AppResult<String> {
    tokio::time::sleep(MODIFIER_SETTLE_DELAY).await;

    clipboard::write_text(String::new()).await;

    send_copy_chord().await?;

    tokio::time::sleep(COPY_SETTLE_DELAY).await;

    Ok(clipboard::read_text().await)
}

/// Synthesize the platform copy chord.
///
/// A new Enigo instance is created inside `spawn_blocking` because Enigo is
/// not `Send` and construction is cheap. The RAII guard releases the copy
/// modifier even if the chord fails mid-way.
async fn send_copy_chord() -> AppResult<()> {
    let chord_result = tokio::task::spawn_blocking(|| {
        std::thread::sleep(RELEASE_SETTLE_DELAY);

        let mut guard = CopyKeyGuard::new()?;

        std::thread::sleep(KEY_EVENT_DELAY);

        guard
            .enigo_mut()
            .key(Key::Unicode('c'), Direction::Click)
            .map_err(|e| AppError::InputSynthesisFailed {
                reason: format!("Failed to press C: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        std::thread::sleep(KEY_EVENT_DELAY);

        // Guard drops here, releasing the copy modifier.
        Ok::<(), AppError>(())
    })
    .await
    .map_err(|e| AppError::InputSynthesisFailed {
        reason: format!("Copy task panicked: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    chord_result
}

/// Create the note and surface the outcome. Shared by the default-deck path
/// and the deck-picker completion; always emits exactly one message.
pub(crate) async fn create_note(ctx: &CaptureContext, deck: &str, word: &str, back: &str) {
    match ctx.anki.add_note(deck, word, back, FETCH_TIMEOUT).await {
        Ok(note_id) => {
            info!(note_id, deck, word, "Note created");
            ctx.events.emit(UiEvent::ShowTransientMessage(format!(
                "Added '{}' to {}",
                word, deck
            )));
            ctx.events.emit(UiEvent::RefreshHistoryView);
        }
        Err(AppError::DuplicateNote { word, deck, .. }) => {
            // Expected outcome, not an error.
            info!(deck = %deck, word = %word, "Duplicate note skipped");
            ctx.events.emit(UiEvent::ShowTransientMessage(format!(
                "'{}' already exists in deck '{}'",
                word, deck
            )));
        }
        Err(e) => {
            warn!(error = %e, deck, word, "Note creation failed");
            ctx.events.emit(UiEvent::ShowTransientMessage(
                "Failed to add card. Is Anki running with AnkiConnect?".to_string(),
            ));
        }
    }
}

/// Extract the headword: the first whitespace-separated word of the
/// selection, trimmed of surrounding punctuation and lower-cased.
pub(crate) fn headword(text: &str) -> Option<String> {
    let first = text.split_whitespace().next()?;
    let trimmed = first.trim_matches(|c: char| {
        c.is_ascii_punctuation() || matches!(c, '«' | '»' | '“' | '”' | '‘' | '’')
    });

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
