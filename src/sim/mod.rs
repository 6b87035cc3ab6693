//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick
//! - Seeded RNG only (gameplay and cosmetic streams kept apart)
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combo;
pub mod environment;
pub mod obstacle;
pub mod player;
pub mod powerup;
pub mod rng;
pub mod scenery;
pub mod state;
pub mod tick;

pub use collision::{CollisionShape, within_reach};
pub use combo::{Combo, MILESTONES, multiplier_for, points_for};
pub use environment::{AmbienceChange, Environment};
pub use obstacle::{OBSTACLE_TABLE, Obstacle, ObstacleField, ObstacleKind, weighted_kind};
pub use player::{Cape, CapePose, Player};
pub use powerup::{ActiveEffect, PowerUp, PowerUpField, PowerUpKind};
pub use rng::{RngState, SimRng};
pub use scenery::Scenery;
pub use state::{
    GameEvent, GamePhase, GameState, Particle, RenderHint, ScheduledTransition, Scrolling,
    SpawnTimer,
};
pub use tick::{TickInput, tick};
