//! JSON slot persistence.
//!
//! Two independent slots exist: `tasks` and `stats`. Every write replaces
//! the whole slot; an absent slot falls back to the type's default. A slot
//! that is present but unparseable is an error for the caller to surface.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::stats::Stats;
use crate::tasks::Task;

pub const TASKS_KEY: &str = "tasks";
pub const STATS_KEY: &str = "stats";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Could not determine data directory")]
    NoDataDir,
}

/// Injected storage abstraction: a flat string-keyed slot store.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One file per slot (`<key>.json`) under a directory.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Opens the platform data directory, creating it if needed.
    pub fn open() -> Result<Self, StoreError> {
        let proj_dirs =
            ProjectDirs::from("com", "studyflow", "studyflow").ok_or(StoreError::NoDataDir)?;
        Self::at(proj_dirs.data_dir().to_path_buf())
    }

    pub fn at(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::write(self.slot_path(key), value)?;
        Ok(())
    }
}

/// In-memory fake, used by tests in place of the file backend.
#[derive(Default)]
pub struct MemoryBackend {
    slots: HashMap<String, String>,
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed view over a backend: one slot per persisted record kind.
pub struct PersistenceStore<B> {
    backend: B,
}

impl<B: StorageBackend> PersistenceStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn load_tasks(&self) -> Result<Vec<Task>, StoreError> {
        self.load_slot(TASKS_KEY)
    }

    pub fn save_tasks(&mut self, tasks: &[Task]) -> Result<(), StoreError> {
        self.save_slot(TASKS_KEY, &tasks)
    }

    pub fn load_stats(&self) -> Result<Stats, StoreError> {
        self.load_slot(STATS_KEY)
    }

    pub fn save_stats(&mut self, stats: &Stats) -> Result<(), StoreError> {
        self.save_slot(STATS_KEY, stats)
    }

    fn load_slot<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        match self.backend.get(key)? {
            None => Ok(T::default()),
            Some(raw) => Ok(serde_json::from_str(&raw)?),
        }
    }

    fn save_slot<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw)?;
        debug!(key, bytes = raw.len(), "slot saved");
        Ok(())
    }
}
