//! Score-gated ambience: night, rain and lightning
//!
//! Purely cosmetic. Reads only the score and draws from the cosmetic RNG,
//! so it can never change how a run plays out.

use serde::{Deserialize, Serialize};

use super::rng::SimRng;
use crate::tuning::Tuning;

/// Ambience change worth telling the outside world about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbienceChange {
    /// Fresh draw on entering the band
    Rolled { night: bool, rain: bool },
    /// Left the band, effects cleared
    Cleared,
    Lightning,
}

/// Day/night and weather state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Environment {
    /// Whether the band draw has been made
    pub decided: bool,
    pub night: bool,
    pub raining: bool,
    /// Rain layer opacity (0-1), fades in and out
    pub rain_opacity: f32,
    /// Lightning flash intensity (0-1)
    pub flash: f32,
}

impl Environment {
    pub fn in_band(score: u64, tuning: &Tuning) -> bool {
        (tuning.ambience_band_min..=tuning.ambience_band_max).contains(&score)
    }

    /// Advance one playing tick
    ///
    /// Returns every change in the order it happened; a band entry and a
    /// lightning strike can land on the same tick.
    pub fn update(
        &mut self,
        score: u64,
        tuning: &Tuning,
        rng: &mut SimRng,
    ) -> Vec<AmbienceChange> {
        let mut changes = Vec::new();

        if Self::in_band(score, tuning) {
            if !self.decided {
                self.decided = true;
                self.night = rng.coin();
                self.raining = rng.coin();
                log::debug!("Ambience rolled: night={} rain={}", self.night, self.raining);
                changes.push(AmbienceChange::Rolled {
                    night: self.night,
                    rain: self.raining,
                });
            }
        } else if self.decided {
            self.decided = false;
            self.night = false;
            self.raining = false;
            changes.push(AmbienceChange::Cleared);
        }

        if self.raining {
            self.rain_opacity = (self.rain_opacity + tuning.rain_fade_per_tick).min(1.0);
            if rng.chance(tuning.lightning_chance) {
                self.flash = 1.0;
                changes.push(AmbienceChange::Lightning);
            }
        } else {
            self.rain_opacity = (self.rain_opacity - tuning.rain_fade_per_tick).max(0.0);
        }

        changes
    }

    /// Flash decay runs every tick regardless of phase
    pub fn decay_flash(&mut self, tuning: &Tuning) {
        self.flash = (self.flash - tuning.flash_decay_per_tick).max(0.0);
    }

    /// Rain is visible (raining or still fading out)
    pub fn rain_visible(&self) -> bool {
        self.raining || self.rain_opacity > 0.0
    }
}
