//! Durable key/value storage for client state that must survive restarts:
//! the bearer token, the dashboard chart window and onboarding progress.
//!
//! Everything lives in one JSON object file. A missing or empty file reads
//! as an empty store; writes land in a sibling temp file that is then
//! renamed over the original so a crash never leaves half a file behind.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub const STATE_FILE_NAME: &str = "state.json";

pub const TOKEN_KEY: &str = "merchantToken";
pub const CHART_WINDOW_KEY: &str = "chartTimeFilter";
pub const ONBOARDING_STEP_KEY: &str = "merchantOnboardingStep";
pub const ONBOARDING_LAST_SAVED_KEY: &str = "onboarding:lastSaved";
pub const ONBOARDING_STATE_KEY: &str = "onboarding:state";
/// Id of the user whose onboarding progress was reconciled in the current
/// session. Cleared whenever the token is stored or cleared.
pub const ONBOARDING_RESTORED_KEY: &str = "onboarding:restoredFor";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("state file {path} is not a JSON object: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode or decode value for key {key}: {source}")]
    Value {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct KeyValueStore {
    path: PathBuf,
}

impl KeyValueStore {
    /// Store backed by `state.json` inside `dir`. Nothing touches the disk
    /// until the first read or write.
    #[must_use]
    pub fn open(dir: &Path) -> Self {
        Self {
            path: dir.join(STATE_FILE_NAME),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or parsed, or the
    /// stored value does not decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let mut entries = self.load()?;
        let Some(value) = entries.remove(key) else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Value {
                key: key.to_string(),
                source,
            })
    }

    /// Encodes `value` and writes it under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the value cannot be encoded or the file
    /// cannot be rewritten.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_value(value).map_err(|source| StoreError::Value {
            key: key.to_string(),
            source,
        })?;
        let mut entries = self.load()?;
        entries.insert(key.to_string(), encoded);
        self.persist(&entries)?;
        tracing::debug!(key, path = %self.path.display(), "stored value");
        Ok(())
    }

    /// Removes `key`. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or rewritten.
    pub fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_none() {
            return Ok(false);
        }
        self.persist(&entries)?;
        tracing::debug!(key, path = %self.path.display(), "removed value");
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or parsed.
    pub fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.load()?.contains_key(key))
    }

    fn load(&self) -> Result<Map<String, Value>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn persist(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Parse {
            path: self.path.display().to_string(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| self.io_error(source))?;
        std::fs::rename(&tmp, &self.path).map_err(|source| self.io_error(source))?;
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = KeyValueStore::open(&dir.path().join("nested"));
        assert_eq!(store.get::<String>(TOKEN_KEY).unwrap(), None);
        assert!(!store.contains(TOKEN_KEY).unwrap());
    }

    #[test]
    fn empty_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(STATE_FILE_NAME), "  \n").unwrap();
        let store = KeyValueStore::open(dir.path());
        assert_eq!(store.get::<String>(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn set_get_remove_round_trip_and_create_directory() {
        let dir = TempDir::new().unwrap();
        let store = KeyValueStore::open(&dir.path().join("state"));

        store.set(TOKEN_KEY, "tok-123").unwrap();
        store.set(ONBOARDING_STEP_KEY, &3u8).unwrap();
        assert_eq!(store.get::<String>(TOKEN_KEY).unwrap().as_deref(), Some("tok-123"));
        assert_eq!(store.get::<u8>(ONBOARDING_STEP_KEY).unwrap(), Some(3));

        assert!(store.remove(TOKEN_KEY).unwrap());
        assert!(!store.remove(TOKEN_KEY).unwrap());
        assert_eq!(store.get::<u8>(ONBOARDING_STEP_KEY).unwrap(), Some(3));
        assert!(!dir.path().join("state").join("state.json.tmp").exists());
    }

    #[test]
    fn values_survive_reopening() {
        let dir = TempDir::new().unwrap();
        KeyValueStore::open(dir.path())
            .set(CHART_WINDOW_KEY, "3M")
            .unwrap();
        let reopened = KeyValueStore::open(dir.path());
        assert_eq!(reopened.get::<String>(CHART_WINDOW_KEY).unwrap().as_deref(), Some("3M"));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(STATE_FILE_NAME), "[1, 2]").unwrap();
        let store = KeyValueStore::open(dir.path());
        assert!(matches!(store.get::<String>(TOKEN_KEY), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn wrongly_typed_value_is_reported_with_key() {
        let dir = TempDir::new().unwrap();
        let store = KeyValueStore::open(dir.path());
        store.set(ONBOARDING_STEP_KEY, "three").unwrap();
        let err = store.get::<u8>(ONBOARDING_STEP_KEY).unwrap_err();
        assert!(matches!(err, StoreError::Value { ref key, .. } if key == ONBOARDING_STEP_KEY));
    }
}
