//! Sound cues for game events
//!
//! The core never synthesizes audio. It maps events to [`SoundEffect`]s and
//! hands them, with a volume, to whatever [`AudioSink`] the host provides.
//! Each effect also carries a small oscillator recipe so a synth sink needs
//! no sample files.

use crate::settings::Settings;
use crate::sim::{GameEvent, PowerUpKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player leaves the ground
    Jump,
    /// Fatal hit
    Collision,
    /// Score crossed a multiple of ten
    ScoreBeep,
    /// Combo reached 5, 10 or 20
    ComboMilestone(u32),
    PowerUpCollect,
    PowerUpActivate(PowerUpKind),
}

impl SoundEffect {
    /// Cue for an event, if it has one
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jump => Some(SoundEffect::Jump),
            GameEvent::Collision => Some(SoundEffect::Collision),
            GameEvent::ScoreBeep => Some(SoundEffect::ScoreBeep),
            GameEvent::ComboMilestone(level) => Some(SoundEffect::ComboMilestone(*level)),
            GameEvent::PowerUpCollect(_) => Some(SoundEffect::PowerUpCollect),
            GameEvent::PowerUpActivate(kind) => Some(SoundEffect::PowerUpActivate(*kind)),
            _ => None,
        }
    }

    /// Oscillator recipe for a synth sink
    pub fn tones(&self) -> Vec<Tone> {
        match self {
            SoundEffect::Jump => vec![Tone::sweep(Waveform::Square, 300.0, 600.0, 0.0, 0.12, 0.25)],
            SoundEffect::Collision => vec![
                Tone::sweep(Waveform::Sawtooth, 200.0, 40.0, 0.0, 0.4, 0.5),
                Tone::sweep(Waveform::Sine, 80.0, 30.0, 0.0, 0.3, 0.4),
            ],
            SoundEffect::ScoreBeep => vec![Tone::note(Waveform::Sine, 880.0, 0.0, 0.08, 0.2)],
            SoundEffect::ComboMilestone(level) => {
                // One rising note per step: 5 → 2 notes, 10 → 3, 20 → 4
                let notes = match *level {
                    20.. => 4,
                    10.. => 3,
                    _ => 2,
                };
                (0..notes)
                    .map(|i| {
                        let freq = 523.25 * 2f32.powf(i as f32 * 4.0 / 12.0);
                        Tone::note(Waveform::Triangle, freq, i as f32 * 0.08, 0.1, 0.3)
                    })
                    .collect()
            }
            SoundEffect::PowerUpCollect => vec![
                Tone::note(Waveform::Sine, 660.0, 0.0, 0.06, 0.3),
                Tone::note(Waveform::Sine, 990.0, 0.06, 0.08, 0.3),
            ],
            SoundEffect::PowerUpActivate(kind) => {
                let (start, end) = match kind {
                    PowerUpKind::Shield => (220.0, 440.0),
                    PowerUpKind::SlowMotion => (600.0, 200.0),
                    PowerUpKind::ScoreMultiplier => (440.0, 1320.0),
                };
                vec![Tone::sweep(Waveform::Triangle, start, end, 0.0, 0.3, 0.3)]
            }
        }
    }
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One oscillator voice with an exponential decay envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Waveform,
    pub freq_start: f32,
    pub freq_end: f32,
    /// Seconds after the cue starts
    pub offset: f32,
    pub duration: f32,
    /// Peak gain before volume scaling
    pub gain: f32,
}

impl Tone {
    fn note(wave: Waveform, freq: f32, offset: f32, duration: f32, gain: f32) -> Self {
        Self::sweep(wave, freq, freq, offset, duration, gain)
    }

    fn sweep(
        wave: Waveform,
        freq_start: f32,
        freq_end: f32,
        offset: f32,
        duration: f32,
        gain: f32,
    ) -> Self {
        Self {
            wave,
            freq_start,
            freq_end,
            offset,
            duration,
            gain,
        }
    }
}

/// Host audio output
pub trait AudioSink {
    /// Play a cue at `volume` (0.0 - 1.0, already mixed)
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("♪ {:?} at {:.2}", effect, volume);
    }
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Take volumes and mute from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Send the cue for `event` (if any) to the sink
    pub fn handle(&self, event: &GameEvent, sink: &mut dyn AudioSink) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if let Some(effect) = SoundEffect::from_event(event) {
            sink.play(effect, vol);
        }
    }
}
