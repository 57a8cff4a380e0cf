//! AnkiConnect client.
//!
//! Speaks the AnkiConnect JSON protocol: an `action`/`version`/`params`
//! request envelope and a `result`/`error` response envelope, version 6.
//! The liveness probe uses a short timeout distinct from the longer timeout
//! for full data calls so a hung backend cannot stall the monitor tick.

use crate::{AppError, AppResult, dictionary::Definition};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};

/// Client for one AnkiConnect endpoint. Cheap to clone; the underlying HTTP
/// client is shared.
#[derive(Debug, Clone)]
pub struct AnkiClient {
    url: String,
    client: reqwest::Client,
}

#[derive(Debug, serde::Deserialize)]
struct AnkiResponse<T> {
    result: Option<T>,
    error: Option<String>,
}

impl AnkiClient {
    /// Client for the given AnkiConnect URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Probe the backend's liveness endpoint.
    ///
    /// Any failure -- connection refused, timeout, protocol error -- reads as
    /// unreachable; the probe never raises.
    #[instrument(skip(self))]
    pub async fn probe(&self, timeout: Duration) -> bool {
        self.invoke::<u32>("version", json!({}), timeout).await.is_ok()
    }

    /// Fetch the full deck-name list.
    pub async fn deck_names(&self, timeout: Duration) -> AppResult<Vec<String>> {
        self.invoke("deckNames", json!({}), timeout).await
    }

    /// Create a Basic note with the word on the front and the formatted
    /// definitions on the back. The backend rejects duplicates.
    #[instrument(skip(self, back))]
    pub async fn add_note(
        &self,
        deck: &str,
        front: &str,
        back: &str,
        timeout: Duration,
    ) -> AppResult<i64> {
        let note = json!({
            "deckName": deck,
            "modelName": "Basic",
            "fields": { "Front": front, "Back": back },
            "tags": ["dict-to-anki", "vocabulary"],
            "options": { "allowDuplicate": false },
        });

        match self
            .invoke::<i64>("addNote", json!({ "note": note }), timeout)
            .await
        {
            Err(AppError::BackendRejected { reason, location })
                if reason.to_lowercase().contains("duplicate") =>
            {
                Err(AppError::DuplicateNote {
                    word: front.to_string(),
                    deck: deck.to_string(),
                    location,
                })
            }
            other => other,
        }
    }

    async fn invoke<T: DeserializeOwned>(
        &self,
        action: &str,
        params: serde_json::Value,
        timeout: Duration,
    ) -> AppResult<T> {
        debug!(action, "Invoking AnkiConnect");

        let payload = json!({ "action": action, "version": 6, "params": params });

        let response = self
            .client
            .post(&self.url)
            .timeout(timeout)
            .json(&payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::BackendUnreachable {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let body: AnkiResponse<T> =
            response
                .json()
                .await
                .map_err(|e| AppError::BackendUnreachable {
                    reason: format!("Malformed response: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

        if let Some(error) = body.error {
            return Err(AppError::BackendRejected {
                reason: error,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        body.result.ok_or_else(|| AppError::BackendRejected {
            reason: "Response carried neither result nor error".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// HTML for the card back: numbered definitions with the part of speech in
/// bold and examples in italics, separated by blank lines.
pub(crate) fn format_card_back(definitions: &[Definition]) -> String {
    let mut parts = Vec::new();

    for (i, definition) in definitions.iter().enumerate() {
        parts.push(format!(
            "<b>{}. ({})</b> {}",
            i + 1,
            definition.part_of_speech,
            definition.definition
        ));

        if let Some(example) = definition.example.as_deref() {
            if !example.is_empty() {
                parts.push(format!("<i>Example: {}</i>", example));
            }
        }
    }

    parts.join("<br><br>")
}
