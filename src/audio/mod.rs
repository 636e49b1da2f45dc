//! Sound cues fired by game events
//!
//! Playback is fire-and-forget. A sink that fails only costs the sound; the
//! game keeps running.

pub mod cue;
pub mod sink;

pub use cue::{Cue, Tone, Waveform, SAMPLE_RATE};
#[cfg(feature = "sound")]
pub use sink::Speaker;
pub use sink::{open_sink, play_events, AudioSink, Muted, TerminalBell};
