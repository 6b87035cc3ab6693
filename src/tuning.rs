//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads goes through [`Tuning`], so
//! balance passes can be done from a JSON file without recompiling. Missing
//! fields fall back to the defaults in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// How the speed is put back when slow-motion runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlowMotionRestore {
    /// Pre-activation speed plus the natural growth accrued while slowed
    #[default]
    Compensated,
    /// Double whatever the current speed is (arcade cabinet behaviour)
    Doubling,
}

/// Gameplay balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub gravity: f32,
    pub jump_velocity: f32,

    // === Speed ===
    pub start_speed: f32,
    pub speed_growth: f32,

    // === Obstacle spawning (ticks) ===
    pub obstacle_first_spawn: f32,
    pub obstacle_interval_min: f32,
    pub obstacle_interval_max: f32,
    /// Ticks shaved off the interval per unit of speed
    pub obstacle_speed_factor: f32,
    pub obstacle_interval_floor: f32,

    // === Power-ups ===
    pub powerup_first_spawn: f32,
    pub powerup_interval_min: f32,
    pub powerup_interval_max: f32,
    /// Fraction of game speed collectibles float at
    pub powerup_float_factor: f32,
    pub shield_ticks: u32,
    pub slow_motion_ticks: u32,
    pub multiplier_ticks: u32,
    pub score_multiplier: f32,
    pub slow_motion_restore: SlowMotionRestore,

    // === Ambience ===
    pub ambience_band_min: u64,
    pub ambience_band_max: u64,
    pub rain_fade_per_tick: f32,
    pub lightning_chance: f32,
    pub flash_decay_per_tick: f32,

    // === Session timing (real time) ===
    pub crash_delay_ms: u32,
    pub leaderboard_delay_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,

            start_speed: START_SPEED,
            speed_growth: SPEED_GROWTH,

            obstacle_first_spawn: 100.0,
            obstacle_interval_min: 60.0,
            obstacle_interval_max: 150.0,
            obstacle_speed_factor: 4.0,
            obstacle_interval_floor: 50.0,

            powerup_first_spawn: 400.0,
            powerup_interval_min: 600.0,
            powerup_interval_max: 1200.0,
            powerup_float_factor: 0.6,
            shield_ticks: 300,
            slow_motion_ticks: 240,
            multiplier_ticks: 600,
            score_multiplier: 2.0,
            slow_motion_restore: SlowMotionRestore::Compensated,

            ambience_band_min: 25,
            ambience_band_max: 75,
            rain_fade_per_tick: 0.02,
            lightning_chance: 0.004,
            flash_decay_per_tick: 0.2,

            crash_delay_ms: CRASH_DELAY_MS,
            leaderboard_delay_ms: LEADERBOARD_DELAY_MS,
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) tuning file
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject balance values the simulation can't run with
    pub fn validate(&self) -> Result<()> {
        if self.gravity <= 0.0 {
            return Err(Error::InvalidTuning("gravity must be positive".into()));
        }
        if self.jump_velocity >= 0.0 {
            return Err(Error::InvalidTuning("jump_velocity must be negative (upward)".into()));
        }
        if self.start_speed <= 0.0 {
            return Err(Error::InvalidTuning("start_speed must be positive".into()));
        }
        if self.speed_growth < 0.0 {
            return Err(Error::InvalidTuning("speed_growth must not be negative".into()));
        }
        if self.obstacle_interval_floor <= 0.0 {
            return Err(Error::InvalidTuning("obstacle_interval_floor must be positive".into()));
        }
        if self.obstacle_interval_min > self.obstacle_interval_max {
            return Err(Error::InvalidTuning("obstacle interval range is inverted".into()));
        }
        if self.powerup_interval_min > self.powerup_interval_max {
            return Err(Error::InvalidTuning("power-up interval range is inverted".into()));
        }
        if self.ambience_band_min > self.ambience_band_max {
            return Err(Error::InvalidTuning("ambience band is inverted".into()));
        }
        if !(0.0..=1.0).contains(&self.lightning_chance) {
            return Err(Error::InvalidTuning("lightning_chance must be a probability".into()));
        }
        Ok(())
    }

    /// Next obstacle spawn threshold for a uniform draw `u` in [0, 1)
    ///
    /// Shrinks linearly with speed and never drops below the floor.
    pub fn obstacle_interval(&self, u: f32, speed: f32) -> f32 {
        let base = self.obstacle_interval_min
            + u * (self.obstacle_interval_max - self.obstacle_interval_min);
        (base - speed * self.obstacle_speed_factor).max(self.obstacle_interval_floor)
    }

    /// Next power-up spawn threshold for a uniform draw `u` in [0, 1)
    pub fn powerup_interval(&self, u: f32) -> f32 {
        self.powerup_interval_min + u * (self.powerup_interval_max - self.powerup_interval_min)
    }
}
