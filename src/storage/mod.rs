//! Persistence for the single value that outlives a process: the high score

pub mod high_score;

pub use high_score::{HighScoreStore, JsonFileStore, MemoryStore, StoreError};
