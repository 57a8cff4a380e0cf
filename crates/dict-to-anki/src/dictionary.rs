//! Dictionary lookup client.
//!
//! Fetches word definitions from the free dictionary APIs the capture
//! workflow enriches cards with: `dictionaryapi.dev` first, falling back to
//! `freedictionaryapi.com`. A missing definition is an expected outcome, not
//! an error, so lookup returns an empty list on any failure and never
//! raises.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, instrument};

pub(crate) const PRIMARY_API: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";
pub(crate) const BACKUP_API: &str = "https://api.freedictionaryapi.com/v1/entries/en";

/// One sense of a looked-up word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Part of speech (noun, verb, ...); `unknown` when the API omits it.
    pub part_of_speech: String,
    /// The definition text.
    pub definition: String,
    /// Example sentence, when the API has one.
    pub example: Option<String>,
}

// Response shape shared by both APIs: a list of entries, each with meanings
// grouped by part of speech. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct DictEntry {
    #[serde(default)]
    meanings: Vec<DictMeaning>,
}

#[derive(Debug, Deserialize)]
struct DictMeaning {
    #[serde(rename = "partOfSpeech")]
    part_of_speech: Option<String>,
    #[serde(default)]
    definitions: Vec<DictDefinition>,
}

#[derive(Debug, Deserialize)]
struct DictDefinition {
    #[serde(default)]
    definition: String,
    example: Option<String>,
}

/// Client for the dictionary APIs. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DictionaryClient {
    client: reqwest::Client,
    primary: String,
    backup: String,
    timeout: Duration,
    max_definitions: usize,
}

impl DictionaryClient {
    /// Client against the public API endpoints.
    pub fn new(timeout: Duration, max_definitions: usize) -> Self {
        Self::with_endpoints(PRIMARY_API, BACKUP_API, timeout, max_definitions)
    }

    /// Client against explicit endpoints (tests).
    pub(crate) fn with_endpoints(
        primary: impl Into<String>,
        backup: impl Into<String>,
        timeout: Duration,
        max_definitions: usize,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            primary: primary.into(),
            backup: backup.into(),
            timeout,
            max_definitions,
        }
    }

    /// Look up a word, trying the primary API first.
    ///
    /// Empty when neither endpoint yields a definition -- misspelled word,
    /// unknown word, or no connectivity all look the same to the caller.
    #[instrument(skip(self))]
    pub async fn lookup(&self, word: &str) -> Vec<Definition> {
        let definitions = self.fetch(&self.primary, word).await;
        if !definitions.is_empty() {
            return definitions;
        }
        self.fetch(&self.backup, word).await
    }

    async fn fetch(&self, base: &str, word: &str) -> Vec<Definition> {
        let url = format!("{}/{}", base, word);

        let result: Result<Vec<DictEntry>, reqwest::Error> = async {
            self.client
                .get(&url)
                .timeout(self.timeout)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
        }
        .await;

        match result {
            Ok(entries) => self.flatten(entries),
            Err(e) => {
                debug!(error = %e, word, url, "Dictionary fetch failed");
                Vec::new()
            }
        }
    }

    fn flatten(&self, entries: Vec<DictEntry>) -> Vec<Definition> {
        let mut definitions = Vec::new();

        for entry in entries {
            for meaning in entry.meanings {
                let part_of_speech = meaning
                    .part_of_speech
                    .unwrap_or_else(|| "unknown".to_string());

                for definition in meaning.definitions {
                    definitions.push(Definition {
                        part_of_speech: part_of_speech.clone(),
                        definition: definition.definition,
                        example: definition.example,
                    });

                    if definitions.len() >= self.max_definitions {
                        return definitions;
                    }
                }
            }
        }

        definitions
    }
}
