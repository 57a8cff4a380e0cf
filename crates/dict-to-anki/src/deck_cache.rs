//! Persisted deck-name cache.
//!
//! Last-known-good deck list, used as the display source whenever the
//! backend is unreachable. Overwritten only by a successful live fetch;
//! survives restarts in the project data directory.

use crate::{AppError, AppResult};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    decks: Vec<String>,
}

/// Ordered deck-name list with best-effort persistence.
#[derive(Debug)]
pub struct DeckCache {
    decks: Vec<String>,
    /// `None` when no writable data directory exists; the cache then lives
    /// in memory only and persistence is skipped.
    path: Option<PathBuf>,
}

impl DeckCache {
    /// Load the cache from the project data directory.
    ///
    /// A missing file starts empty; a corrupt file is discarded with a
    /// warning. When no data directory can be resolved the cache degrades to
    /// memory-only.
    pub fn load() -> Self {
        match Self::cache_path() {
            Ok(path) => Self::load_from(path),
            Err(e) => {
                warn!(error = %e, "No writable deck cache location, cache is memory-only");
                Self {
                    decks: Vec::new(),
                    path: None,
                }
            }
        }
    }

    /// Load from an explicit path.
    pub(crate) fn load_from(path: PathBuf) -> Self {
        let decks = match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<CacheFile>(&contents) {
                Ok(file) => {
                    info!(count = file.decks.len(), "Deck cache loaded");
                    file.decks
                }
                Err(e) => {
                    warn!(error = %e, "Corrupt deck cache, starting empty");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        Self {
            decks,
            path: Some(path),
        }
    }

    /// The cached deck names, in backend order.
    pub fn decks(&self) -> &[String] {
        &self.decks
    }

    /// Overwrite the cache with a live fetch result and persist it.
    ///
    /// Persistence failures are logged and otherwise ignored -- the in-memory
    /// list is still current for this process lifetime.
    pub fn replace(&mut self, decks: Vec<String>) {
        self.decks = decks;
        if let Err(e) = self.persist() {
            warn!(error = %e, "Failed to persist deck cache");
        }
    }

    fn persist(&self) -> AppResult<()> {
        let Some(path) = self.path.as_deref() else {
            debug!("Deck cache is memory-only, skipping persist");
            return Ok(());
        };

        let contents = toml::to_string_pretty(&CacheFile {
            decks: self.decks.clone(),
        })
        .map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize deck cache: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Self::write_atomic(path, &contents)
    }

    // Same atomic write pattern as the config file.
    #[track_caller]
    fn write_atomic(path: &Path, contents: &str) -> AppResult<()> {
        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path)?;
        temp_file.write_all(contents.as_bytes())?;
        temp_file.sync_all()?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    #[track_caller]
    fn cache_path() -> AppResult<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("com", "dict-to-anki", "Dict-to-Anki").ok_or_else(|| {
                AppError::ConfigError {
                    reason: "Failed to get data directory".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        let data_dir = proj_dirs.data_dir();

        if !data_dir.exists() {
            fs::create_dir_all(data_dir)?;
            debug!(data_dir = ?data_dir, "Created data directory");
        }

        Ok(data_dir.join("deck_cache.toml"))
    }
}
