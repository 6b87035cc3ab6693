//! Power-up spawning, pickup and timed effects
//!
//! Collectibles drift toward the player slower than obstacles so they stay
//! catchable. Picking one up starts (or extends) a timed effect; when the
//! timer runs out the effect is reversed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionShape, within_reach};
use super::player::Player;
use super::rng::SimRng;
use super::state::{GameEvent, GameState, RenderHint, Scrolling, SpawnTimer};
use crate::Rect;
use crate::consts::*;
use crate::tuning::{SlowMotionRestore, Tuning};

/// Collectible size (square)
pub const POWERUP_SIZE: f32 = 30.0;
/// Lowest spawn centre, above the ground
const SPAWN_LIFT: f32 = 60.0;
/// Random extra height on top of `SPAWN_LIFT`
const SPAWN_SPREAD: f32 = 120.0;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    SlowMotion,
    ScoreMultiplier,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Shield,
        PowerUpKind::SlowMotion,
        PowerUpKind::ScoreMultiplier,
    ];

    /// Full effect duration in ticks
    pub fn duration(&self, tuning: &Tuning) -> u32 {
        match self {
            PowerUpKind::Shield => tuning.shield_ticks,
            PowerUpKind::SlowMotion => tuning.slow_motion_ticks,
            PowerUpKind::ScoreMultiplier => tuning.multiplier_ticks,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "#4cc9f0",
            PowerUpKind::SlowMotion => "#b5179e",
            PowerUpKind::ScoreMultiplier => "#ffd60a",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "🛡",
            PowerUpKind::SlowMotion => "⏳",
            PowerUpKind::ScoreMultiplier => "×2",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield",
            PowerUpKind::SlowMotion => "slow_motion",
            PowerUpKind::ScoreMultiplier => "score_multiplier",
        }
    }
}

/// A floating collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
    /// Ticks alive, drives the bob animation
    pub float_ticks: u32,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, center_y: f32) -> Self {
        Self {
            id,
            kind,
            pos: Vec2::new(WORLD_WIDTH, center_y - POWERUP_SIZE / 2.0),
            size: Vec2::splat(POWERUP_SIZE),
            collected: false,
            float_ticks: 0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Circular proximity test against the player's chest
    pub fn touches(&self, player: &Player) -> bool {
        within_reach(
            self.center(),
            player.upper_body(),
            player.width / 2.0 + self.size.x / 2.0,
        )
    }
}

impl Scrolling for PowerUp {
    fn update(&mut self, speed: f32) {
        self.pos.x -= speed;
        self.float_ticks = self.float_ticks.wrapping_add(1);
    }

    fn collision_shape(&self) -> CollisionShape {
        CollisionShape::Rect(Rect::from_pos_size(self.pos, self.size))
    }

    fn render_hint(&self) -> RenderHint {
        RenderHint {
            sprite: self.kind.as_str(),
            frame: self.float_ticks,
            alpha: if self.collected { 0.0 } else { 1.0 },
        }
    }
}

/// A power-up currently in force
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub remaining: u32,
    pub duration: u32,
}

impl ActiveEffect {
    /// Remaining fraction for HUD badges (1.0 = fresh)
    pub fn fraction_left(&self) -> f32 {
        if self.duration == 0 {
            0.0
        } else {
            self.remaining as f32 / self.duration as f32
        }
    }
}

/// Bookkeeping needed to undo slow-motion
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlowMotionLedger {
    /// Speed just before the first activation
    pub baseline: f32,
    /// Natural speed growth accrued while slowed
    pub growth: f32,
}

/// Collectibles on screen plus the effects they granted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpField {
    pub items: Vec<PowerUp>,
    pub active: Vec<ActiveEffect>,
    pub spawn: SpawnTimer,
    /// Global score factor (1× or 2×)
    pub score_factor: f32,
    pub slow: Option<SlowMotionLedger>,
    next_id: u32,
}

impl PowerUpField {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            items: Vec::new(),
            active: Vec::new(),
            spawn: SpawnTimer::new(tuning.powerup_first_spawn),
            score_factor: 1.0,
            slow: None,
            next_id: 1,
        }
    }

    /// Spawn countdown and float motion
    pub fn update(&mut self, speed: f32, tuning: &Tuning, rng: &mut SimRng) -> Option<PowerUpKind> {
        let mut spawned = None;
        if self.spawn.advance() {
            let kind = rng
                .pick(&PowerUpKind::ALL)
                .copied()
                .unwrap_or(PowerUpKind::Shield);
            let center_y = GROUND_Y - SPAWN_LIFT - rng.unit() * SPAWN_SPREAD;
            let id = self.next_id;
            self.next_id += 1;
            self.items.push(PowerUp::new(id, kind, center_y));
            self.spawn.rearm(tuning.powerup_interval(rng.unit()));
            log::debug!("Spawned power-up {} #{}", kind.as_str(), id);
            spawned = Some(kind);
        }

        let drift = speed * tuning.powerup_float_factor;
        for item in &mut self.items {
            item.update(drift);
        }
        spawned
    }

    /// Mark every touching collectible as collected, returning their kinds
    pub fn collect(&mut self, player: &Player) -> Vec<PowerUpKind> {
        let mut kinds = Vec::new();
        for item in self.items.iter_mut().filter(|i| !i.collected) {
            if item.touches(player) {
                item.collected = true;
                kinds.push(item.kind);
            }
        }
        kinds
    }

    /// Extend an existing effect or add a new one. Returns true when new.
    ///
    /// Extension never shortens: remaining becomes max(remaining, duration).
    pub fn extend_or_insert(&mut self, kind: PowerUpKind, duration: u32) -> bool {
        if let Some(effect) = self.active.iter_mut().find(|e| e.kind == kind) {
            effect.remaining = effect.remaining.max(duration);
            effect.duration = duration;
            false
        } else {
            self.active.push(ActiveEffect {
                kind,
                remaining: duration,
                duration,
            });
            true
        }
    }

    /// Tick every effect down once; expired ones are removed and returned
    pub fn countdown(&mut self) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        self.active.retain_mut(|effect| {
            effect.remaining = effect.remaining.saturating_sub(1);
            if effect.remaining == 0 {
                expired.push(effect.kind);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Drop collected or off-screen collectibles
    pub fn recycle(&mut self) {
        self.items
            .retain(|i| !i.collected && i.pos.x + i.size.x >= 0.0);
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.iter().any(|e| e.kind == kind)
    }

    pub fn remaining(&self, kind: PowerUpKind) -> Option<u32> {
        self.active.iter().find(|e| e.kind == kind).map(|e| e.remaining)
    }
}

impl GameState {
    /// Start or extend a power-up effect
    pub fn activate_powerup(&mut self, kind: PowerUpKind) {
        let duration = kind.duration(&self.tuning);
        if !self.powerups.extend_or_insert(kind, duration) {
            log::debug!(
                "Extended {} to {} ticks",
                kind.as_str(),
                self.powerups.remaining(kind).unwrap_or(0)
            );
            self.emit(GameEvent::PowerUpExtended(kind));
            return;
        }

        match kind {
            PowerUpKind::Shield => self.player.invincible = true,
            PowerUpKind::SlowMotion => {
                self.powerups.slow = Some(SlowMotionLedger {
                    baseline: self.speed,
                    growth: 0.0,
                });
                self.speed /= 2.0;
            }
            PowerUpKind::ScoreMultiplier => {
                self.powerups.score_factor = self.tuning.score_multiplier
            }
        }
        log::debug!("Activated {} for {} ticks", kind.as_str(), duration);
        self.emit(GameEvent::PowerUpActivate(kind));
    }

    /// Reverse an effect whose timer ran out
    pub fn expire_powerup(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Shield => self.player.invincible = false,
            PowerUpKind::SlowMotion => {
                let ledger = self.powerups.slow.take();
                self.speed = match (self.tuning.slow_motion_restore, ledger) {
                    (SlowMotionRestore::Compensated, Some(ledger)) => {
                        ledger.baseline + ledger.growth
                    }
                    _ => self.speed * 2.0,
                };
            }
            PowerUpKind::ScoreMultiplier => self.powerups.score_factor = 1.0,
        }
        log::debug!("{} expired", kind.as_str());
        self.emit(GameEvent::PowerUpExpire(kind));
    }

    /// Pickups, then effect countdown
    pub(crate) fn update_powerup_effects(&mut self) {
        for kind in self.powerups.collect(&self.player) {
            self.emit(GameEvent::PowerUpCollect(kind));
            self.activate_powerup(kind);
        }
        for kind in self.powerups.countdown() {
            self.expire_powerup(kind);
        }
    }
}
