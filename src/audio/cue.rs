use std::f32::consts::TAU;
use std::time::Duration;

use crate::game::GameEvent;

pub const SAMPLE_RATE: u32 = 44_100;

/// Level every envelope decays to by the end of its tone
const RAMP_FLOOR: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

impl Waveform {
    /// Value at `phase`, measured in cycles
    fn sample(self, phase: f32) -> f32 {
        let t = phase.fract();
        match self {
            Waveform::Sine => (TAU * t).sin(),
            Waveform::Square => {
                if t < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * t - 1.0,
        }
    }
}

/// One note of a cue, scheduled relative to the start of the cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub waveform: Waveform,
    pub start: Duration,
    pub length: Duration,
    /// Starting gain, ramps down to 0.01 over `length`
    pub gain: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Eat,
    LevelUp,
    GameOver,
    HighScore,
}

const C5: f32 = 523.0;
const E5: f32 = 659.0;
const G5: f32 = 784.0;
const C6: f32 = 1047.0;
const E6: f32 = 1319.0;

fn arpeggio(freqs: &[f32], waveform: Waveform, gap_ms: u64, length_ms: u64) -> Vec<Tone> {
    freqs
        .iter()
        .enumerate()
        .map(|(i, &frequency_hz)| Tone {
            frequency_hz,
            waveform,
            start: Duration::from_millis(gap_ms * i as u64),
            length: Duration::from_millis(length_ms),
            gain: 0.2,
        })
        .collect()
}

impl Cue {
    pub fn for_event(event: &GameEvent) -> Cue {
        match event {
            GameEvent::FoodEaten { .. } => Cue::Eat,
            GameEvent::LeveledUp { .. } => Cue::LevelUp,
            GameEvent::GameOver { .. } => Cue::GameOver,
            GameEvent::NewHighScore { .. } => Cue::HighScore,
        }
    }

    /// Notes for hosts that can synthesize sound
    pub fn tones(self) -> Vec<Tone> {
        match self {
            Cue::Eat => vec![Tone {
                frequency_hz: 800.0,
                waveform: Waveform::Sine,
                start: Duration::ZERO,
                length: Duration::from_millis(200),
                gain: 0.3,
            }],
            Cue::LevelUp => arpeggio(&[C5, E5, G5, C6], Waveform::Square, 100, 150),
            Cue::GameOver => arpeggio(&[400.0, 350.0, 300.0, 250.0], Waveform::Sawtooth, 150, 200),
            Cue::HighScore => arpeggio(&[E5, G5, C6, E6, C6, E6], Waveform::Sine, 80, 120),
        }
    }

    /// Bells rung by hosts without a synthesizer, so cues stay distinguishable
    pub fn bell_count(self) -> usize {
        match self {
            Cue::Eat => 1,
            Cue::HighScore => 2,
            Cue::LevelUp => 3,
            Cue::GameOver => 4,
        }
    }

    /// Mono samples in [-1, 1] with every tone mixed in at its start offset
    pub fn render(self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;
        let total = (self.duration().as_secs_f32() * rate).ceil() as usize;
        let mut samples = vec![0.0f32; total];

        for tone in self.tones() {
            let start = (tone.start.as_secs_f32() * rate) as usize;
            let len = (tone.length.as_secs_f32() * rate) as usize;
            let decay = (RAMP_FLOOR / tone.gain).powf(1.0 / len.max(1) as f32);
            let mut gain = tone.gain;

            for (i, out) in samples.iter_mut().skip(start).take(len).enumerate() {
                let phase = tone.frequency_hz * i as f32 / rate;
                *out += tone.waveform.sample(phase) * gain;
                gain *= decay;
            }
        }

        for sample in &mut samples {
            *sample = sample.clamp(-1.0, 1.0);
        }
        samples
    }

    /// Total time from the first note starting to the last note ending
    pub fn duration(self) -> Duration {
        self.tones()
            .iter()
            .map(|tone| tone.start + tone.length)
            .max()
            .unwrap_or(Duration::ZERO)
    }
}
