//! Clipboard access with fail-silent semantics.
//!
//! The capture workflow treats the clipboard as best-effort: a read failure
//! is indistinguishable from an empty selection, and a write failure only
//! delays the empty-clipboard detection by one capture. Neither ever raises.
//!
//! A fresh `arboard::Clipboard` is created inside `spawn_blocking` for every
//! operation because the handle is not `Send` and construction is cheap.

use arboard::Clipboard;
use tracing::debug;

/// Read the clipboard, returning an empty string when unavailable.
pub(crate) async fn read_text() -> String {
    let result = tokio::task::spawn_blocking(|| {
        match Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
            Ok(text) => text,
            Err(e) => {
                debug!(error = %e, "Clipboard read failed");
                String::new()
            }
        }
    })
    .await;

    result.unwrap_or_default()
}

/// Overwrite the clipboard; failures are swallowed.
pub(crate) async fn write_text(text: String) {
    let result = tokio::task::spawn_blocking(move || {
        if let Err(e) = Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            debug!(error = %e, "Clipboard write failed");
        }
    })
    .await;

    if let Err(e) = result {
        debug!(error = %e, "Clipboard task panicked");
    }
}
