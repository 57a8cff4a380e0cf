//! Backend availability tracking.
//!
//! The expensive deck-list fetch keys off reachability *transitions* only;
//! every probe observation still yields a status for the UI indicator.

use tracing::{debug, info};

/// Reachability of the flashcard backend.
///
/// Transitions happen only on confirmed probe outcomes, never inferred from
/// absence of activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceStatus {
    /// No probe has completed yet.
    #[default]
    Unknown,
    /// The most recent probe succeeded.
    Connected,
    /// The most recent probe failed.
    Disconnected,
}

/// Transition produced by one probe observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// Status unchanged; no refresh is warranted.
    None,
    /// The backend became reachable; a live fetch should overwrite the cache.
    CameUp,
    /// The backend became unreachable after being connected; the display
    /// falls back to the cache.
    WentDown,
}

/// Tracks connect/disconnect transitions across probe outcomes.
#[derive(Debug, Default)]
pub struct StatusTracker {
    status: ServiceStatus,
}

impl StatusTracker {
    /// Tracker in the [`ServiceStatus::Unknown`] state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status.
    pub fn status(&self) -> ServiceStatus {
        self.status
    }

    /// Record one probe outcome and return the resulting transition.
    ///
    /// `Unknown -> Disconnected` is not a [`StatusChange::WentDown`]
    /// transition: the cache is already the display source before the first
    /// successful probe.
    pub fn observe(&mut self, reachable: bool) -> StatusChange {
        let previous = self.status;
        self.status = if reachable {
            ServiceStatus::Connected
        } else {
            ServiceStatus::Disconnected
        };

        match (previous, self.status) {
            (ServiceStatus::Connected, ServiceStatus::Connected) => StatusChange::None,
            (_, ServiceStatus::Connected) => {
                info!("Flashcard backend reachable");
                StatusChange::CameUp
            }
            (ServiceStatus::Connected, ServiceStatus::Disconnected) => {
                info!("Flashcard backend unreachable");
                StatusChange::WentDown
            }
            _ => StatusChange::None,
        }
    }

    /// Force the status back to [`ServiceStatus::Disconnected`], e.g. when
    /// the post-transition deck fetch failed, so the next successful probe
    /// retries it instead of a tight retry loop.
    pub fn demote(&mut self) {
        debug!("Demoting backend status to Disconnected");
        self.status = ServiceStatus::Disconnected;
    }
}
