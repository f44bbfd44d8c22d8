//! File-backed persistence: experience and build records.
//!
//! A single JSON document with two logical keys. Reads of a missing or
//! corrupt file fall back to the default state; expired records are pruned
//! on every read and before every write.

use crate::record::{BuildRecord, RECORD_LIST_LIMIT, prune};
use chrono::{DateTime, Utc};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// The persisted document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredState {
    experience: u32,
    records: Vec<BuildRecord>,
}

/// Store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for StoreError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {}", err))
    }
}

/// Repository over the store file.
#[derive(Debug, Clone)]
pub struct GameStore {
    path: PathBuf,
}

impl GameStore {
    /// Opens a store at the given path. The file is created on first write.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Self {
        debug!("Opening game store");
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Reads the document, pruning expired records.
    ///
    /// Missing or corrupt files are treated as absence, never as fatal.
    fn load(&self, now: DateTime<Utc>) -> StoredState {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Store file not found, starting fresh");
                return StoredState::default();
            }
            Err(e) => {
                warn!(error = %e, "Failed to read store file, starting fresh");
                return StoredState::default();
            }
        };

        match serde_json::from_str::<StoredState>(&content) {
            Ok(mut state) => {
                prune(&mut state.records, now);
                state
            }
            Err(e) => {
                warn!(error = %e, "Corrupt store file, starting fresh");
                StoredState::default()
            }
        }
    }

    /// Writes the document, pruning expired records first.
    fn save(&self, mut state: StoredState, now: DateTime<Utc>) -> Result<(), StoreError> {
        prune(&mut state.records, now);
        let content = serde_json::to_string_pretty(&state)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Returns the persisted experience counter.
    #[instrument(skip(self))]
    pub fn experience(&self) -> u32 {
        self.load(Utc::now()).experience
    }

    /// Persists the experience counter.
    #[instrument(skip(self))]
    pub fn set_experience(&self, experience: u32) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut state = self.load(now);
        state.experience = experience;
        self.save(state, now)?;
        debug!(experience, "Experience persisted");
        Ok(())
    }

    /// Returns all surviving records, oldest first.
    #[instrument(skip(self))]
    pub fn records(&self) -> Vec<BuildRecord> {
        self.load(Utc::now()).records
    }

    /// Returns surviving records newest-first, capped at
    /// [`RECORD_LIST_LIMIT`].
    #[instrument(skip(self))]
    pub fn recent_records(&self) -> Vec<BuildRecord> {
        let mut records = self.records();
        records.sort_by(|a, b| b.timestamp().cmp(a.timestamp()));
        records.truncate(RECORD_LIST_LIMIT);
        records
    }

    /// Appends a completed-build record.
    #[instrument(skip(self, record), fields(attempt = record.attempt(), stones = record.stone_count()))]
    pub fn push_record(&self, record: BuildRecord) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut state = self.load(now);
        state.records.push(record);
        self.save(state, now)?;
        info!("Record saved");
        Ok(())
    }

    /// Player reset: experience back to zero. Records keep their own
    /// expiries and are left alone.
    #[instrument(skip(self))]
    pub fn reset_experience(&self) -> Result<(), StoreError> {
        self.set_experience(0)?;
        info!("Experience reset");
        Ok(())
    }
}
