//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal front end drives it through [`Session`].

pub mod action;
pub mod config;
pub mod engine;
pub mod event;
pub mod record;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, Intent};
pub use config::{ConfigError, GameConfig};
pub use engine::GameEngine;
pub use event::GameEvent;
pub use record::HighScore;
pub use session::{FrameReport, Session, Snapshot};
pub use state::{GameState, Position, Snake};
