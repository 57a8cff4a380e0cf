//! Hotkey recording state machine.
//!
//! Consumes normalized key events while the user is defining a new hotkey
//! and produces a finalized combination or nothing. The debounce-plus-all-
//! keys-released rule makes chord entry order irrelevant and prevents a fast
//! chord release from finalizing before the user has pressed every intended
//! key. The caller supplies the current instant on every event so tests can
//! drive the clock.

use crate::{HotkeyCombination, KeyToken};

use std::{
    collections::BTreeSet,
    time::{Duration, Instant},
};

use tracing::debug;

/// Quiet time required after the first key press before a release can
/// complete a recording. Empirically chosen; override with
/// [`HotkeyRecorder::with_debounce`].
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Transient state held only while the user is actively defining a hotkey.
///
/// At most one session exists at a time; it is created on recording start
/// and destroyed on finalize or cancel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordingSession {
    /// Tokens currently held down.
    pressed_now: BTreeSet<KeyToken>,
    /// Every token seen since recording started. Releases never remove.
    recorded: BTreeSet<KeyToken>,
    /// Instant of the first key event, unset until a token is accepted.
    started_at: Option<Instant>,
}

impl RecordingSession {
    /// Display string for the keys recorded so far: modifiers first, then
    /// regular tokens, upper-cased, joined with `+`.
    pub fn display(&self) -> String {
        let modifiers = self.recorded.iter().filter(|t| t.is_modifier());
        let regulars = self.recorded.iter().filter(|t| !t.is_modifier());
        modifiers
            .chain(regulars)
            .map(|t| t.as_str().to_uppercase())
            .collect::<Vec<_>>()
            .join("+")
    }

    /// The completion condition, evaluated on every release: at least one
    /// key was pressed, all keys are released again, the debounce window has
    /// elapsed since the first press, and the recorded set forms a valid
    /// combination (>= 2 distinct tokens, >= 1 modifier, >= 1 regular).
    fn is_complete(&self, now: Instant, debounce: Duration) -> bool {
        let Some(started_at) = self.started_at else {
            return false;
        };

        self.pressed_now.is_empty()
            && self.recorded.len() >= 2
            && now.duration_since(started_at) > debounce
            && self.recorded.iter().any(KeyToken::is_modifier)
            && self.recorded.iter().any(|t| !t.is_modifier())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RecorderState {
    /// No session; key events are ignored.
    Idle,
    /// A session is accumulating key events.
    Recording(RecordingSession),
    /// The completion condition held; awaiting [`HotkeyRecorder::finalize`].
    Finalizing(RecordingSession),
}

/// State-machine outputs, turned into bus events by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderOutput {
    /// The recorded-so-far display string changed.
    Display(String),
    /// The completion condition holds; the caller should queue finalization.
    Complete,
}

/// The hotkey recording state machine.
///
/// Owns the singleton [`RecordingSession`]. Callers feed it normalized key
/// events; unresolvable keys must be dropped before they reach it.
#[derive(Debug)]
pub struct HotkeyRecorder {
    state: RecorderState,
    debounce: Duration,
}

impl Default for HotkeyRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl HotkeyRecorder {
    /// Recorder with the default debounce window.
    pub fn new() -> Self {
        Self::with_debounce(DEFAULT_DEBOUNCE)
    }

    /// Recorder with an explicit debounce window.
    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            state: RecorderState::Idle,
            debounce,
        }
    }

    /// Whether a session is currently accumulating key events.
    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording(_))
    }

    /// Begin a new session. No-op unless idle; returns whether a session
    /// started. The caller must suspend any active global binding first so
    /// the combination being recorded is not intercepted as the old hotkey.
    pub fn start(&mut self) -> bool {
        if !matches!(self.state, RecorderState::Idle) {
            return false;
        }
        self.state = RecorderState::Recording(RecordingSession::default());
        debug!("Hotkey recording started");
        true
    }

    /// Feed a key press.
    ///
    /// The token joins both the recorded set and the held set; the first
    /// token stamps the session start time.
    pub fn on_press(&mut self, token: KeyToken, now: Instant) -> Option<RecorderOutput> {
        let RecorderState::Recording(session) = &mut self.state else {
            return None;
        };

        if session.started_at.is_none() {
            session.started_at = Some(now);
        }
        session.recorded.insert(token.clone());
        session.pressed_now.insert(token);

        Some(RecorderOutput::Display(session.display()))
    }

    /// Feed a key release and evaluate the completion condition.
    ///
    /// Releases remove from the held set only, never from the recorded set.
    pub fn on_release(&mut self, token: &KeyToken, now: Instant) -> Option<RecorderOutput> {
        let RecorderState::Recording(session) = &mut self.state else {
            return None;
        };

        session.pressed_now.remove(token);

        if session.is_complete(now, self.debounce) {
            let session = std::mem::take(session);
            debug!(combination = %session.display(), "Hotkey recording complete");
            self.state = RecorderState::Finalizing(session);
            return Some(RecorderOutput::Complete);
        }

        None
    }

    /// Finish the session and build the canonical combination.
    ///
    /// Returns `None` when invoked with a deficient session (recording was
    /// aborted externally); the caller keeps the previously persisted
    /// combination in that case. The recorder always returns to idle.
    pub fn finalize(&mut self) -> Option<HotkeyCombination> {
        let state = std::mem::replace(&mut self.state, RecorderState::Idle);
        match state {
            RecorderState::Finalizing(session) | RecorderState::Recording(session) => {
                HotkeyCombination::from_tokens(session.recorded)
            }
            RecorderState::Idle => None,
        }
    }

    /// Abandon any active session without producing a combination.
    pub fn cancel(&mut self) {
        if !matches!(self.state, RecorderState::Idle) {
            debug!("Hotkey recording cancelled");
        }
        self.state = RecorderState::Idle;
    }
}
