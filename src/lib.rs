//! TUI Snake - Snake in the terminal
//!
//! This library provides:
//! - Core game logic: grid, tick engine, input filtering, frame pacing (game module)
//! - High score persistence (storage module)
//! - Sound cues for game events (audio module)
//! - Key mapping (input module) and TUI rendering (render module)
//! - The interactive terminal front end (modes module)

pub mod audio;
pub mod game;
pub mod input;
pub mod logging;
pub mod modes;
pub mod render;
pub mod storage;
