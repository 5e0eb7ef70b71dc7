//! Session records - summaries of finished sessions and where they are kept
//!
//! A record is created once when a session ends by losing its last life and
//! handed to a [`RecordStore`]. Stores return records most recent first.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::types::Mode;

/// Unique record identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Summary of one finished session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub id: RecordId,
    pub score: u32,
    pub mode: Mode,
    pub duration_seconds: u64,
    pub completed_at: DateTime<Utc>,
}

impl RoundRecord {
    pub fn new(score: u32, mode: Mode, duration_seconds: u64, completed_at: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::new(),
            score,
            mode,
            duration_seconds,
            completed_at,
        }
    }

    /// Duration as `m:ss`.
    pub fn duration_label(&self) -> String {
        format!("{}:{:02}", self.duration_seconds / 60, self.duration_seconds % 60)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("record file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistence collaborator for finished sessions.
pub trait RecordStore {
    fn save(&mut self, record: &RoundRecord) -> Result<(), StoreError>;

    /// All records, most recent `completed_at` first.
    fn fetch_all(&self) -> Result<Vec<RoundRecord>, StoreError>;

    /// Returns whether a record with `id` existed.
    fn delete(&mut self, id: RecordId) -> Result<bool, StoreError>;

    fn clear_all(&mut self) -> Result<(), StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &mut S {
    fn save(&mut self, record: &RoundRecord) -> Result<(), StoreError> {
        (**self).save(record)
    }

    fn fetch_all(&self) -> Result<Vec<RoundRecord>, StoreError> {
        (**self).fetch_all()
    }

    fn delete(&mut self, id: RecordId) -> Result<bool, StoreError> {
        (**self).delete(id)
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        (**self).clear_all()
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn save(&mut self, record: &RoundRecord) -> Result<(), StoreError> {
        (**self).save(record)
    }

    fn fetch_all(&self) -> Result<Vec<RoundRecord>, StoreError> {
        (**self).fetch_all()
    }

    fn delete(&mut self, id: RecordId) -> Result<bool, StoreError> {
        (**self).delete(id)
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        (**self).clear_all()
    }
}

fn sort_recent_first(records: &mut [RoundRecord]) {
    records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: Vec<RoundRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryRecordStore {
    fn save(&mut self, record: &RoundRecord) -> Result<(), StoreError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn fetch_all(&self) -> Result<Vec<RoundRecord>, StoreError> {
        let mut records = self.records.clone();
        sort_recent_first(&mut records);
        Ok(records)
    }

    fn delete(&mut self, id: RecordId) -> Result<bool, StoreError> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        Ok(self.records.len() != before)
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        Ok(())
    }
}

/// Records kept as one pretty-printed JSON array on disk
///
/// A missing file reads as an empty store. Every write rewrites the file.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<RoundRecord>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, records: &[RoundRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let data = serde_json::to_string_pretty(records).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, data).map_err(|source| self.io_error(source))?;
        debug!(path = %self.path.display(), count = records.len(), "record file written");
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl RecordStore for JsonRecordStore {
    fn save(&mut self, record: &RoundRecord) -> Result<(), StoreError> {
        let mut records = self.load()?;
        records.push(record.clone());
        self.write(&records)
    }

    fn fetch_all(&self) -> Result<Vec<RoundRecord>, StoreError> {
        let mut records = self.load()?;
        sort_recent_first(&mut records);
        Ok(records)
    }

    fn delete(&mut self, id: RecordId) -> Result<bool, StoreError> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write(&records)?;
        Ok(true)
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        self.write(&[])
    }
}
