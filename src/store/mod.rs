mod courses;
mod grades;
mod students;

pub use courses::{CourseRecord, CourseStore};
pub use grades::{GradeRecord, GradeStore};
pub use students::{StudentRecord, StudentStore};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

/// Failure while reading or rewriting a store's backing file. Never
/// surfaced to callers: load failures yield an empty collection, save
/// failures are logged and the in-memory mutation stands.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// An entity that can live in a [`FileStore`], converted to and from its
/// on-disk record shape.
pub trait Entity: Clone {
    type Record: Serialize + DeserializeOwned;

    fn id(&self) -> &str;
    fn to_record(&self) -> Self::Record;
    fn from_record(record: Self::Record) -> Self;
}

/// In-memory keyed collection of one entity type, synchronized with a
/// line-delimited JSON file: loaded once at construction, rewritten in full
/// after every mutation.
#[derive(Debug)]
pub struct FileStore<T> {
    path: PathBuf,
    entries: IndexMap<String, T>,
}

impl<T: Entity> FileStore<T> {
    /// Opens the store at `path`. A missing file starts the store empty;
    /// an unreadable or malformed file is logged and also starts it empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load_records::<T>(&path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("failed to load {}: {}", path.display(), err);
                IndexMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn all(&self) -> Vec<T> {
        self.entries.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<&T> {
        self.entries.values().find(|entry| pred(entry))
    }

    /// Keyed upsert; collision policy lives in the typed stores.
    pub fn insert(&mut self, entity: T) -> T {
        let stored = entity.clone();
        self.entries.insert(entity.id().to_string(), entity);
        self.persist();
        stored
    }

    pub fn remove(&mut self, id: &str) -> bool {
        // shift_remove keeps load order for the remaining entries
        let removed = self.entries.shift_remove(id).is_some();
        if removed {
            self.persist();
        }
        removed
    }

    /// Rewrites the whole backing file. A failure here is logged and
    /// swallowed; the in-memory collection keeps the mutation and may be
    /// ahead of the file until the next successful write.
    fn persist(&self) {
        if let Err(err) = self.write_all() {
            warn!("failed to persist {}: {}", self.path.display(), err);
        }
    }

    fn write_all(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let mut out = String::new();
        for entity in self.entries.values() {
            out.push_str(&serde_json::to_string(&entity.to_record())?);
            out.push('\n');
        }
        fs::write(&self.path, out)?;
        Ok(())
    }
}

fn load_records<T: Entity>(path: &Path) -> Result<IndexMap<String, T>, StoreError> {
    if !path.exists() {
        return Ok(IndexMap::new());
    }
    let text = fs::read_to_string(path)?;
    let mut entries = IndexMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: T::Record = serde_json::from_str(line)?;
        let entity = T::from_record(record);
        entries.insert(entity.id().to_string(), entity);
    }
    Ok(entries)
}

/// Parses an RFC 3339 timestamp, falling back to the current time when the
/// value is missing or unparsable.
pub(crate) fn parse_timestamp(value: Option<&str>) -> DateTime<Utc> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}
