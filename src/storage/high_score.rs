use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access high score file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("high score file {path:?} is not valid")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A single integer slot that survives restarts
pub trait HighScoreStore {
    /// Stored value; 0 when nothing has been stored yet
    fn load(&self) -> Result<u32, StoreError>;

    fn save(&self, score: u32) -> Result<(), StoreError>;
}

/// On-disk layout: `{"highScore": 42}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct HighScoreRecord {
    #[serde(rename = "highScore")]
    high_score: u32,
}

/// Keeps the high score in a small JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<u32, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(self.io_error(e)),
        };

        let record: HighScoreRecord =
            serde_json::from_str(&json).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        Ok(record.high_score)
    }

    fn save(&self, score: u32) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string(&HighScoreRecord { high_score: score })
            .map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

/// Process-local store, for `--no-persist` and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: Cell<u32>,
}

impl MemoryStore {
    pub fn new(initial: u32) -> Self {
        Self {
            value: Cell::new(initial),
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32, StoreError> {
        Ok(self.value.get())
    }

    fn save(&self, score: u32) -> Result<(), StoreError> {
        self.value.set(score);
        Ok(())
    }
}
