use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Largest grid the terminal can lay out, one row per cell
pub const MAX_GRID_SIZE: usize = u16::MAX as usize - 2;

/// Reasons a configuration cannot drive a game
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid size must be at least 1")]
    EmptyGrid,
    #[error("grid size {grid_size} exceeds the maximum of {MAX_GRID_SIZE}")]
    GridTooLarge { grid_size: usize },
    #[error("initial snake length must be at least 1")]
    EmptySnake,
    #[error("initial snake length {length} does not fit on a {grid_size}x{grid_size} grid")]
    SnakeTooLong { length: usize, grid_size: usize },
    #[error("minimum tick interval must be positive")]
    ZeroMinInterval,
    #[error("tick interval {tick_interval_ms}ms is below the minimum of {min_interval_ms}ms")]
    IntervalBelowMinimum {
        tick_interval_ms: u64,
        min_interval_ms: u64,
    },
    #[error("level threshold must be at least 1")]
    ZeroLevelThreshold,
    #[error("failed to read config file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration for the game
///
/// The grid is square and fixed for the lifetime of a session; window or
/// terminal size only changes how it is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width and height of the game grid in cells
    pub grid_size: usize,
    /// Logical pixels per cell, used only by presentation
    pub cell_size: usize,
    /// Initial length of the snake
    pub initial_length: usize,

    /// Tick interval at the start of every game
    pub tick_interval_ms: u64,
    /// How much the interval shrinks per level
    pub speed_step_ms: u64,
    /// The interval never drops below this
    pub min_interval_ms: u64,
    /// Points per level
    pub level_every: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 25,
            cell_size: 4,
            initial_length: 3,
            tick_interval_ms: 150,
            speed_step_ms: 15,
            min_interval_ms: 50,
            level_every: 10,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Read a JSON config file, filling absent fields with defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                grid_size: self.grid_size,
            });
        }
        if self.initial_length == 0 {
            return Err(ConfigError::EmptySnake);
        }
        // The body is laid out leftwards from the centre cell.
        if self.initial_length > self.grid_size / 2 + 1 || self.initial_length >= self.cell_count() {
            return Err(ConfigError::SnakeTooLong {
                length: self.initial_length,
                grid_size: self.grid_size,
            });
        }
        if self.min_interval_ms == 0 {
            return Err(ConfigError::ZeroMinInterval);
        }
        if self.tick_interval_ms < self.min_interval_ms {
            return Err(ConfigError::IntervalBelowMinimum {
                tick_interval_ms: self.tick_interval_ms,
                min_interval_ms: self.min_interval_ms,
            });
        }
        if self.level_every == 0 {
            return Err(ConfigError::ZeroLevelThreshold);
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn speed_step(&self) -> Duration {
        Duration::from_millis(self.speed_step_ms)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// Number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Logical canvas edge in pixels
    pub fn canvas_size(&self) -> usize {
        self.grid_size * self.cell_size
    }
}
