//! Backend availability monitor.
//!
//! One long-lived task probes the backend liveness endpoint on a fixed
//! interval with a short timeout and reconciles the cached vs. live deck
//! list. The expensive deck fetch runs only on a reachability transition;
//! every tick still refreshes the UI status indicator. Probe failures of
//! any kind read as "unreachable" -- the loop never crashes and never
//! retries in a tight loop.

use crate::{AnkiClient, AppResult, DeckCache};

use std::time::Duration;

use dict_to_anki_core::{EventSender, ServiceStatus, StatusChange, StatusTracker, UiEvent};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

/// Interval between liveness probes.
pub(crate) const PROBE_INTERVAL: Duration = Duration::from_secs(2);

/// Timeout for one liveness probe, deliberately shorter than
/// [`FETCH_TIMEOUT`] so a hung backend cannot stall the tick cadence.
pub(crate) const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// Timeout for full data calls (deck list, note creation).
pub(crate) const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of probe outcomes and deck lists. The production implementation
/// is [`AnkiClient`]; tests script outcomes.
pub(crate) trait DeckSource: Send + Sync {
    /// Probe the backend's liveness endpoint; false on any failure.
    fn probe(&self, timeout: Duration) -> impl Future<Output = bool> + Send;

    /// Fetch the full deck-name list.
    fn deck_names(&self, timeout: Duration) -> impl Future<Output = AppResult<Vec<String>>> + Send;
}

impl DeckSource for AnkiClient {
    async fn probe(&self, timeout: Duration) -> bool {
        AnkiClient::probe(self, timeout).await
    }

    async fn deck_names(&self, timeout: Duration) -> AppResult<Vec<String>> {
        AnkiClient::deck_names(self, timeout).await
    }
}

/// Availability monitor loop state.
pub struct AvailabilityMonitor<S> {
    source: S,
    cache: DeckCache,
    tracker: StatusTracker,
    events: EventSender,
}

impl<S: DeckSource> AvailabilityMonitor<S> {
    /// Monitor in the Unknown state over a previously loaded cache.
    pub(crate) fn new(source: S, cache: DeckCache, events: EventSender) -> Self {
        Self {
            source,
            cache,
            tracker: StatusTracker::new(),
            events,
        }
    }

    /// Run until the shutdown flag flips. Started once, at startup.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(PROBE_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!("Availability monitor started");

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Availability monitor shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// The underlying deck source (tests inspect scripted call counts).
    #[cfg(test)]
    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    /// One probe cycle. Split from [`run`](Self::run) so tests drive the
    /// tick cadence directly.
    pub(crate) async fn tick(&mut self) {
        let reachable = self.source.probe(PROBE_TIMEOUT).await;

        match self.tracker.observe(reachable) {
            StatusChange::CameUp => match self.source.deck_names(FETCH_TIMEOUT).await {
                Ok(decks) => {
                    info!(count = decks.len(), "Deck list refreshed from backend");
                    self.cache.replace(decks.clone());
                    self.events.emit(UiEvent::UpdateDeckList(decks));
                }
                Err(e) => {
                    // Demotion re-arms the transition: the fetch retries on
                    // the next successful probe, not every tick.
                    warn!(error = %e, "Deck fetch after reconnect failed");
                    self.tracker.demote();
                }
            },
            StatusChange::WentDown => {
                self.events
                    .emit(UiEvent::UpdateDeckList(self.cache.decks().to_vec()));
            }
            StatusChange::None => {}
        }

        self.events.emit(UiEvent::SetServiceStatus(
            self.tracker.status() == ServiceStatus::Connected,
        ));
    }
}
