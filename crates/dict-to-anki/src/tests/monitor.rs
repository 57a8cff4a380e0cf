use crate::{
    AppError, AppResult, DeckCache,
    monitor::{AvailabilityMonitor, DeckSource},
};

use std::{panic::Location, sync::Mutex, time::Duration};

use dict_to_anki_core::UiEvent;
use error_location::ErrorLocation;
use uuid::Uuid;

/// Deck source replaying scripted probe outcomes; counts deck fetches.
struct ScriptedSource {
    outcomes: Mutex<Vec<bool>>,
    decks: Vec<String>,
    /// Number of leading deck fetches that fail before succeeding.
    failing_fetches: Mutex<usize>,
    fetches: Mutex<usize>,
}

impl ScriptedSource {
    fn new(outcomes: &[bool], decks: &[&str]) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.to_vec()),
            decks: decks.iter().map(|d| d.to_string()).collect(),
            failing_fetches: Mutex::new(0),
            fetches: Mutex::new(0),
        }
    }

    #[allow(clippy::unwrap_used)]
    fn with_failing_fetches(outcomes: &[bool], decks: &[&str], failing: usize) -> Self {
        let source = Self::new(outcomes, decks);
        *source.failing_fetches.lock().unwrap() = failing;
        source
    }

    #[allow(clippy::unwrap_used)]
    fn fetch_count(&self) -> usize {
        *self.fetches.lock().unwrap()
    }
}

impl DeckSource for ScriptedSource {
    #[allow(clippy::unwrap_used)]
    async fn probe(&self, _timeout: Duration) -> bool {
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            false
        } else {
            outcomes.remove(0)
        }
    }

    #[allow(clippy::unwrap_used)]
    async fn deck_names(&self, _timeout: Duration) -> AppResult<Vec<String>> {
        *self.fetches.lock().unwrap() += 1;

        let mut failing = self.failing_fetches.lock().unwrap();
        if *failing > 0 {
            *failing -= 1;
            return Err(AppError::BackendUnreachable {
                reason: "scripted failure".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(self.decks.clone())
    }
}

fn temp_cache() -> DeckCache {
    DeckCache::load_from(std::env::temp_dir().join(format!("deck-cache-{}.toml", Uuid::new_v4())))
}

fn statuses(events: &[UiEvent]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|event| match event {
            UiEvent::SetServiceStatus(connected) => Some(*connected),
            _ => None,
        })
        .collect()
}

fn deck_updates(events: &[UiEvent]) -> Vec<Vec<String>> {
    events
        .iter()
        .filter_map(|event| match event {
            UiEvent::UpdateDeckList(decks) => Some(decks.clone()),
            _ => None,
        })
        .collect()
}

/// WHAT: fail,fail,ok,ok,fail yields five status events and two deck updates
/// WHY: Status is emitted every tick; deck refreshes only on transitions
#[tokio::test]
async fn given_mixed_probe_outcomes_when_ticking_then_refresh_only_on_transitions() {
    // Given: A monitor over a scripted backend and an empty cache
    let source = ScriptedSource::new(&[false, false, true, true, false], &["Default", "Vocab"]);
    let (tx, rx) = dict_to_anki_core::channel();
    let mut monitor = AvailabilityMonitor::new(source, temp_cache(), tx);

    // When: Five probe ticks run
    for _ in 0..5 {
        monitor.tick().await;
    }

    // Then: One status event per tick, mirroring the probe outcomes
    let events: Vec<UiEvent> = rx.drain().collect();
    assert_eq!(statuses(&events), vec![false, false, true, true, false]);

    // And: Exactly two deck updates -- the fail->ok live fetch and the
    // ok->fail cache fallback, both carrying the same list
    let updates = deck_updates(&events);
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0], vec!["Default".to_string(), "Vocab".to_string()]);
    assert_eq!(updates[1], updates[0]);
}

/// WHAT: Consecutive Connected observations fetch only once
/// WHY: The expensive call keys off transitions, not every poll
#[tokio::test]
async fn given_stable_connection_when_ticking_then_single_fetch() {
    let source = ScriptedSource::new(&[true, true, true], &["Default"]);
    let (tx, rx) = dict_to_anki_core::channel();
    let mut monitor = AvailabilityMonitor::new(source, temp_cache(), tx);

    for _ in 0..3 {
        monitor.tick().await;
    }

    assert_eq!(monitor.source().fetch_count(), 1);
    assert_eq!(deck_updates(&rx.drain().collect::<Vec<_>>()).len(), 1);
}

/// WHAT: A failed post-transition fetch retries on the next successful probe
/// WHY: Demotion re-arms the transition instead of a tight retry loop
#[tokio::test]
async fn given_failing_first_fetch_when_probe_stays_ok_then_fetch_retries() {
    let source = ScriptedSource::with_failing_fetches(&[true, true], &["Default"], 1);
    let (tx, rx) = dict_to_anki_core::channel();
    let mut monitor = AvailabilityMonitor::new(source, temp_cache(), tx);

    monitor.tick().await;
    monitor.tick().await;

    let events: Vec<UiEvent> = rx.drain().collect();

    // First tick demoted after the failed fetch, second tick recovered.
    assert_eq!(statuses(&events), vec![false, true]);
    assert_eq!(deck_updates(&events), vec![vec!["Default".to_string()]]);
    assert_eq!(monitor.source().fetch_count(), 2);
}

/// WHAT: Going unreachable before any success emits no deck update
/// WHY: The cache is already the display source before the first success
#[tokio::test]
async fn given_backend_never_up_when_ticking_then_no_deck_updates() {
    let source = ScriptedSource::new(&[false, false], &["Default"]);
    let (tx, rx) = dict_to_anki_core::channel();
    let mut monitor = AvailabilityMonitor::new(source, temp_cache(), tx);

    monitor.tick().await;
    monitor.tick().await;

    let events: Vec<UiEvent> = rx.drain().collect();
    assert_eq!(statuses(&events), vec![false, false]);
    assert!(deck_updates(&events).is_empty());
}
