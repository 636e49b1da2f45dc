use anyhow::{Context, Result};
use std::io::Write;

#[cfg(feature = "sound")]
use super::cue::SAMPLE_RATE;
use super::cue::Cue;
use crate::game::GameEvent;

/// Something that can make a cue audible
pub trait AudioSink {
    fn play(&mut self, cue: Cue) -> Result<()>;
}

/// Rings the terminal bell, a different number of times per cue
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, cue: Cue) -> Result<()> {
        let bells = vec![0x07u8; cue.bell_count()];
        self.out.write_all(&bells).context("Failed to ring bell")?;
        self.out.flush().context("Failed to flush bell")?;
        Ok(())
    }
}

/// Drops every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct Muted;

impl AudioSink for Muted {
    fn play(&mut self, _cue: Cue) -> Result<()> {
        Ok(())
    }
}

/// Plays the synthesized tone patterns on the default output device
#[cfg(feature = "sound")]
pub struct Speaker {
    _stream: rodio::OutputStream,
    handle: rodio::OutputStreamHandle,
}

#[cfg(feature = "sound")]
impl Speaker {
    pub fn try_default() -> Result<Self> {
        let (stream, handle) =
            rodio::OutputStream::try_default().context("Failed to open audio output")?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

#[cfg(feature = "sound")]
impl AudioSink for Speaker {
    fn play(&mut self, cue: Cue) -> Result<()> {
        let sink = rodio::Sink::try_new(&self.handle).context("Failed to create audio sink")?;
        let samples = cue.render(SAMPLE_RATE);
        sink.append(rodio::buffer::SamplesBuffer::new(1, SAMPLE_RATE, samples));
        sink.detach();
        Ok(())
    }
}

/// Best sink available: the speaker when built with `sound` and a device
/// opens, otherwise the terminal bell on `out`
pub fn open_sink<W: Write + 'static>(mute: bool, out: W) -> Box<dyn AudioSink> {
    if mute {
        return Box::new(Muted);
    }

    #[cfg(feature = "sound")]
    match Speaker::try_default() {
        Ok(speaker) => return Box::new(speaker),
        Err(e) => tracing::warn!(error = %e, "no audio device, falling back to terminal bell"),
    }

    Box::new(TerminalBell::new(out))
}

/// Play the cue for each event; failures are logged and otherwise ignored
pub fn play_events(sink: &mut dyn AudioSink, events: &[GameEvent]) {
    for event in events {
        let cue = Cue::for_event(event);
        if let Err(e) = sink.play(cue) {
            tracing::warn!(?cue, error = %e, "audio not available");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder(Vec<Cue>);

    impl AudioSink for Recorder {
        fn play(&mut self, cue: Cue) -> Result<()> {
            self.0.push(cue);
            Ok(())
        }
    }

    struct Broken;

    impl AudioSink for Broken {
        fn play(&mut self, _cue: Cue) -> Result<()> {
            anyhow::bail!("no audio device")
        }
    }

    #[test]
    fn test_events_become_cues_in_order() {
        let mut sink = Recorder(Vec::new());
        play_events(
            &mut sink,
            &[
                GameEvent::FoodEaten { score: 1 },
                GameEvent::NewHighScore { score: 1 },
            ],
        );
        assert_eq!(sink.0, vec![Cue::Eat, Cue::HighScore]);
    }

    #[test]
    fn test_failing_sink_is_ignored() {
        let mut sink = Broken;
        play_events(&mut sink, &[GameEvent::GameOver { score: 0 }]);
    }

    #[test]
    fn test_terminal_bell() {
        let mut bell = TerminalBell::new(Vec::new());
        play_events(
            &mut bell,
            &[
                GameEvent::LeveledUp { score: 10, level: 2 },
                GameEvent::GameOver { score: 10 },
            ],
        );
        assert_eq!(bell.into_inner(), vec![0x07u8; 3 + 4]);

        let mut muted = Muted;
        assert!(muted.play(Cue::Eat).is_ok());
    }

    #[test]
    fn test_bell_tells_cues_apart() {
        let mut rung = Vec::new();
        for cue in [Cue::Eat, Cue::LevelUp, Cue::GameOver, Cue::HighScore] {
            let mut bell = TerminalBell::new(Vec::new());
            bell.play(cue).unwrap();
            rung.push(bell.into_inner().len());
        }
        rung.sort_unstable();
        rung.dedup();
        assert_eq!(rung.len(), 4);
    }

    #[test]
    fn test_open_sink_muted() {
        let mut sink = open_sink(true, Vec::new());
        assert!(sink.play(Cue::GameOver).is_ok());
    }
}
