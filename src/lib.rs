//! Cape Dash - A side-scrolling jump-and-duck arcade runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, scoring, game state)
//! - `driver`: Frame loop, one-shot timers, event routing
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `audio`: Event to sound cue mapping
//! - `leaderboard`: Ranked per-player best scores
//! - `platform`: Host abstraction (identity, key/value storage)
//! - `persistence`: Snapshot save/continue and score keeping

pub mod audio;
pub mod driver;
pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use driver::{GameLoop, GameOverSink};
pub use error::{Error, Result};
pub use leaderboard::Leaderboard;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Ground line (feet rest here, y grows downward)
    pub const GROUND_Y: f32 = WORLD_HEIGHT * 0.85;

    /// Player defaults
    pub const PLAYER_X: f32 = 50.0;
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.8;
    /// Upward impulse on jump (negative = up)
    pub const JUMP_VELOCITY: f32 = -20.0;

    /// Scroll speed at session start (pixels per tick)
    pub const START_SPEED: f32 = 5.0;
    /// Speed gained every playing tick
    pub const SPEED_GROWTH: f32 = 0.001;

    /// Obstacles are dropped once their right edge passes this x
    pub const DESPAWN_MARGIN: f32 = -50.0;

    /// Crash to game-over delay (real time)
    pub const CRASH_DELAY_MS: u32 = 1000;
    /// Game-over to leaderboard reveal delay (real time)
    pub const LEADERBOARD_DELAY_MS: u32 = 2000;

    /// Explosion particles
    pub const EXPLOSION_PARTICLES: usize = 30;
    pub const PARTICLE_LIFE: u32 = 60;
    pub const PARTICLE_GRAVITY: f32 = 0.4;
}

/// Axis-aligned rectangle in world space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Build from top-left corner and size
    #[inline]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Strict overlap test (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}
