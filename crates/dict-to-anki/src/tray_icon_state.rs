use dict_to_anki_core::ServiceStatus;

/// Tray icon states reflecting flashcard-backend reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// No probe outcome yet.
    Unknown,
    /// Backend reachable; live deck list in use.
    Connected,
    /// Backend unreachable; cached deck list in use.
    Disconnected,
}

impl From<ServiceStatus> for TrayIconState {
    fn from(status: ServiceStatus) -> Self {
        match status {
            ServiceStatus::Unknown => TrayIconState::Unknown,
            ServiceStatus::Connected => TrayIconState::Connected,
            ServiceStatus::Disconnected => TrayIconState::Disconnected,
        }
    }
}
