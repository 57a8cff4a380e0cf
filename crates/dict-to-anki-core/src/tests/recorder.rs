use crate::{HotkeyRecorder, KeyToken, RecorderOutput};

use std::time::{Duration, Instant};

#[allow(clippy::unwrap_used)]
fn token(name: &str) -> KeyToken {
    KeyToken::new(name).unwrap()
}

/// Press then release a full chord, with the releases at `release_offset`
/// after the first press. Returns the output of the last release.
fn record_chord(
    recorder: &mut HotkeyRecorder,
    names: &[&str],
    release_offset: Duration,
) -> Option<RecorderOutput> {
    let start = Instant::now();
    for name in names {
        recorder.on_press(token(name), start);
    }

    let release = start + release_offset;
    let mut last = None;
    for name in names {
        last = recorder.on_release(&token(name), release);
    }
    last
}

/// WHAT: A valid chord finalizes after the debounce window
/// WHY: Core recording property -- all keys released, quiet time elapsed
#[test]
fn given_valid_chord_when_released_after_debounce_then_complete() {
    // Given: A recording session with ctrl, alt and d pressed
    let mut recorder = HotkeyRecorder::new();
    assert!(recorder.start());

    // When: All keys release 600ms after the first press
    let output = record_chord(&mut recorder, &["ctrl", "alt", "d"], Duration::from_millis(600));

    // Then: The recording completes and finalizes to the canonical form
    assert_eq!(output, Some(RecorderOutput::Complete));
    let combination = recorder.finalize();
    assert_eq!(
        combination.map(|c| c.to_string()),
        Some("ctrl+alt+d".to_string())
    );
    assert!(!recorder.is_recording());
}

/// WHAT: Releasing within the debounce window does not finalize
/// WHY: A fast chord release must not be mistaken for completion
#[test]
fn given_valid_chord_when_released_within_debounce_then_still_recording() {
    let mut recorder = HotkeyRecorder::new();
    recorder.start();

    // When: All keys release only 100ms after the first press
    let output = record_chord(&mut recorder, &["ctrl", "alt", "d"], Duration::from_millis(100));

    // Then: No completion; the session keeps accumulating
    assert_eq!(output, None);
    assert!(recorder.is_recording());
}

/// WHAT: A modifier-less recording never finalizes
/// WHY: A combination needs >= 1 modifier and >= 1 regular token
#[test]
fn given_regular_key_only_when_released_after_debounce_then_still_recording() {
    let mut recorder = HotkeyRecorder::new();
    recorder.start();

    let output = record_chord(&mut recorder, &["d"], Duration::from_millis(600));

    assert_eq!(output, None);
    assert!(recorder.is_recording());
}

/// WHAT: A regular-less recording never finalizes
/// WHY: Modifier-only chords are not valid combinations
#[test]
fn given_modifiers_only_when_released_after_debounce_then_still_recording() {
    let mut recorder = HotkeyRecorder::new();
    recorder.start();

    let output = record_chord(&mut recorder, &["ctrl", "shift"], Duration::from_millis(600));

    assert_eq!(output, None);
    assert!(recorder.is_recording());
}

/// WHAT: Chord entry order does not change the result
/// WHY: Ctrl+Alt+D and Alt+Ctrl+D must record identically
#[test]
fn given_reversed_press_order_when_finalizing_then_same_combination() {
    let mut recorder = HotkeyRecorder::new();
    recorder.start();

    record_chord(&mut recorder, &["d", "alt", "ctrl"], Duration::from_millis(600));

    let combination = recorder.finalize();
    assert_eq!(
        combination.map(|c| c.to_string()),
        Some("alt+ctrl+d".to_string())
    );
}

/// WHAT: A release does not finalize while other keys are still held
/// WHY: Completion requires the held set to be empty
#[test]
fn given_partially_released_chord_when_evaluating_then_still_recording() {
    let mut recorder = HotkeyRecorder::new();
    recorder.start();

    let start = Instant::now();
    recorder.on_press(token("ctrl"), start);
    recorder.on_press(token("d"), start);

    // When: Only one key releases, well past the debounce window
    let output = recorder.on_release(&token("d"), start + Duration::from_millis(700));

    assert_eq!(output, None);
    assert!(recorder.is_recording());
}

/// WHAT: Presses report the accumulated display string
/// WHY: The UI shows the chord as it is being recorded
#[test]
fn given_successive_presses_when_recording_then_display_accumulates() {
    let mut recorder = HotkeyRecorder::new();
    recorder.start();

    let start = Instant::now();
    let first = recorder.on_press(token("ctrl"), start);
    let second = recorder.on_press(token("d"), start);

    assert_eq!(first, Some(RecorderOutput::Display("CTRL".to_string())));
    assert_eq!(second, Some(RecorderOutput::Display("CTRL+D".to_string())));
}

/// WHAT: Key events while idle are ignored
/// WHY: The listener thread may deliver events after a session ends
#[test]
fn given_idle_recorder_when_feeding_events_then_ignored() {
    let mut recorder = HotkeyRecorder::new();

    let now = Instant::now();
    assert_eq!(recorder.on_press(token("ctrl"), now), None);
    assert_eq!(recorder.on_release(&token("ctrl"), now), None);
    assert_eq!(recorder.finalize(), None);
}

/// WHAT: Finalizing a deficient session yields no combination
/// WHY: An externally-aborted recording reverts to the persisted hotkey
#[test]
fn given_deficient_session_when_finalizing_then_none() {
    let mut recorder = HotkeyRecorder::new();
    recorder.start();

    let start = Instant::now();
    recorder.on_press(token("ctrl"), start);
    recorder.on_release(&token("ctrl"), start + Duration::from_millis(600));

    // Then: No combination, and the recorder is idle again
    assert_eq!(recorder.finalize(), None);
    assert!(!recorder.is_recording());
}

/// WHAT: Starting is a no-op while a session is active
/// WHY: The recording session is a singleton
#[test]
fn given_active_session_when_starting_again_then_rejected() {
    let mut recorder = HotkeyRecorder::new();

    assert!(recorder.start());
    assert!(!recorder.start());
}

/// WHAT: Cancel abandons the session without output
/// WHY: Reset must not leave a half-recorded session behind
#[test]
fn given_active_session_when_cancelled_then_idle_and_restartable() {
    let mut recorder = HotkeyRecorder::new();
    recorder.start();
    recorder.on_press(token("ctrl"), Instant::now());

    recorder.cancel();

    assert!(!recorder.is_recording());
    assert_eq!(recorder.finalize(), None);
    assert!(recorder.start());
}
