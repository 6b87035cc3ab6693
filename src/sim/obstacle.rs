//! Obstacle spawning, motion and recycling
//!
//! Kinds are drawn from a weighted table. Each kind declares its size, how
//! high above the ground its bottom edge may sit, and which collision shape
//! it uses.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::CollisionShape;
use super::rng::SimRng;
use super::state::{RenderHint, Scrolling, SpawnTimer};
use crate::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Low-flying missile at a random height
    #[default]
    Missile,
    /// Ground box, jump it
    Crate,
    /// Ceiling-mounted lamp at head height, duck it
    Lamp,
    /// Low hurdle under a tall beam; only the two bands are solid
    Gate,
}

/// Static description of one obstacle kind
#[derive(Debug, Clone, Copy)]
pub struct ObstacleSpec {
    pub kind: ObstacleKind,
    pub size: Vec2,
    /// Relative spawn frequency (positive)
    pub weight: u32,
    /// Height of the bottom edge above the ground, drawn from [min, max]
    pub lift_min: f32,
    pub lift_max: f32,
    /// Solid caps for gap-shaped kinds (top, bottom)
    pub bands: Option<(f32, f32)>,
}

/// Spawn table
pub const OBSTACLE_TABLE: [ObstacleSpec; 4] = [
    ObstacleSpec {
        kind: ObstacleKind::Missile,
        size: Vec2::new(80.0, 30.0),
        weight: 5,
        lift_min: 0.0,
        lift_max: 80.0,
        bands: None,
    },
    ObstacleSpec {
        kind: ObstacleKind::Crate,
        size: Vec2::new(40.0, 50.0),
        weight: 3,
        lift_min: 0.0,
        lift_max: 0.0,
        bands: None,
    },
    ObstacleSpec {
        kind: ObstacleKind::Lamp,
        size: Vec2::new(60.0, 40.0),
        weight: 2,
        lift_min: 45.0,
        lift_max: 45.0,
        bands: None,
    },
    ObstacleSpec {
        kind: ObstacleKind::Gate,
        size: Vec2::new(40.0, 450.0),
        weight: 1,
        lift_min: 0.0,
        lift_max: 0.0,
        bands: Some((120.0, 30.0)),
    },
];

impl ObstacleKind {
    pub fn spec(&self) -> &'static ObstacleSpec {
        match self {
            ObstacleKind::Missile => &OBSTACLE_TABLE[0],
            ObstacleKind::Crate => &OBSTACLE_TABLE[1],
            ObstacleKind::Lamp => &OBSTACLE_TABLE[2],
            ObstacleKind::Gate => &OBSTACLE_TABLE[3],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Missile => "missile",
            ObstacleKind::Crate => "crate",
            ObstacleKind::Lamp => "lamp",
            ObstacleKind::Gate => "gate",
        }
    }
}

/// Weighted pick for a uniform draw `u` in [0, 1)
///
/// Walks the table subtracting weights from `u * total`. Falls back to the
/// default kind if rounding leaves the roll past the last bucket.
pub fn weighted_kind(u: f32, table: &[ObstacleSpec]) -> ObstacleKind {
    let total: u32 = table.iter().map(|s| s.weight).sum();
    let mut roll = u * total as f32;
    for spec in table {
        let w = spec.weight as f32;
        if roll < w {
            return spec.kind;
        }
        roll -= w;
    }
    ObstacleKind::default()
}

/// An obstacle entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Scored (or shield-cleared) already
    pub passed: bool,
    /// Cosmetic frame counter, never reset
    pub anim_frame: u32,
}

impl Obstacle {
    /// Create an obstacle of `kind` just off the right edge
    pub fn new(id: u32, kind: ObstacleKind, lift: f32) -> Self {
        let spec = kind.spec();
        Self {
            id,
            kind,
            pos: Vec2::new(WORLD_WIDTH, GROUND_Y - lift - spec.size.y),
            size: spec.size,
            passed: false,
            anim_frame: 0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Fully off the left edge past the recycle margin
    pub fn is_gone(&self) -> bool {
        self.right() < DESPAWN_MARGIN
    }
}

impl Scrolling for Obstacle {
    fn update(&mut self, speed: f32) {
        self.pos.x -= speed;
    }

    fn collision_shape(&self) -> CollisionShape {
        let bounds = self.bounds();
        match self.kind.spec().bands {
            None => CollisionShape::Rect(bounds),
            Some((top_cap, bottom_cap)) => CollisionShape::DualBand {
                top: Rect::from_pos_size(bounds.min, Vec2::new(self.size.x, top_cap)),
                bottom: Rect::from_pos_size(
                    Vec2::new(bounds.min.x, bounds.max.y - bottom_cap),
                    Vec2::new(self.size.x, bottom_cap),
                ),
            },
        }
    }

    fn render_hint(&self) -> RenderHint {
        RenderHint {
            sprite: self.kind.as_str(),
            frame: self.anim_frame,
            alpha: 1.0,
        }
    }
}

/// Owns the live obstacle set and its spawn countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleField {
    pub obstacles: Vec<Obstacle>,
    pub spawn: SpawnTimer,
    next_id: u32,
}

impl ObstacleField {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            obstacles: Vec::new(),
            spawn: SpawnTimer::new(tuning.obstacle_first_spawn),
            next_id: 1,
        }
    }

    /// Draw a kind and height and push a new obstacle
    pub fn spawn(&mut self, rng: &mut SimRng) -> ObstacleKind {
        let kind = weighted_kind(rng.unit(), &OBSTACLE_TABLE);
        let spec = kind.spec();
        let lift = rng.range(spec.lift_min, spec.lift_max);
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(Obstacle::new(id, kind, lift));
        log::debug!("Spawned {} #{} (lift {:.0})", kind.as_str(), id, lift);
        kind
    }

    /// Advance the countdown (maybe spawning) and scroll everything left
    ///
    /// Returns the kind spawned this tick, if any.
    pub fn update(
        &mut self,
        speed: f32,
        tuning: &Tuning,
        rng: &mut SimRng,
    ) -> Option<ObstacleKind> {
        let mut spawned = None;
        if self.spawn.advance() {
            spawned = Some(self.spawn(rng));
            self.spawn.rearm(tuning.obstacle_interval(rng.unit(), speed));
        }

        for obstacle in &mut self.obstacles {
            obstacle.update(speed);
        }
        spawned
    }

    /// Cosmetic animation, runs in every phase
    pub fn animate(&mut self) {
        for obstacle in &mut self.obstacles {
            obstacle.anim_frame = obstacle.anim_frame.wrapping_add(1);
        }
    }

    /// Drop obstacles that have left the screen
    pub fn recycle(&mut self) {
        self.obstacles.retain(|o| !o.is_gone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_kind_buckets() {
        // Total weight 11: missile [0,5), crate [5,8), lamp [8,10), gate [10,11)
        assert_eq!(weighted_kind(0.0, &OBSTACLE_TABLE), ObstacleKind::Missile);
        assert_eq!(weighted_kind(4.9 / 11.0, &OBSTACLE_TABLE), ObstacleKind::Missile);
        assert_eq!(weighted_kind(5.5 / 11.0, &OBSTACLE_TABLE), ObstacleKind::Crate);
        assert_eq!(weighted_kind(9.0 / 11.0, &OBSTACLE_TABLE), ObstacleKind::Lamp);
        assert_eq!(weighted_kind(10.5 / 11.0, &OBSTACLE_TABLE), ObstacleKind::Gate);
    }

    #[test]
    fn test_weighted_kind_fallback() {
        // A roll at or past the total must still produce a kind
        assert_eq!(weighted_kind(1.0, &OBSTACLE_TABLE), ObstacleKind::Missile);
        assert_eq!(weighted_kind(0.5, &[]), ObstacleKind::Missile);
    }

    #[test]
    fn test_weighted_distribution_roughly_proportional() {
        let mut rng = SimRng::new(2024);
        let mut counts = [0u32; 4];
        for _ in 0..11_000 {
            let idx = match weighted_kind(rng.unit(), &OBSTACLE_TABLE) {
                ObstacleKind::Missile => 0,
                ObstacleKind::Crate => 1,
                ObstacleKind::Lamp => 2,
                ObstacleKind::Gate => 3,
            };
            counts[idx] += 1;
        }
        assert!((4_500..5_500).contains(&counts[0]));
        assert!((2_600..3_400).contains(&counts[1]));
        assert!((1_600..2_400).contains(&counts[2]));
        assert!((700..1_300).contains(&counts[3]));
    }

    #[test]
    fn test_spawn_heights() {
        let mut rng = SimRng::new(5);
        let mut field = ObstacleField::new(&Tuning::default());
        for _ in 0..200 {
            field.spawn(&mut rng);
        }
        for o in &field.obstacles {
            let spec = o.kind.spec();
            let lift = GROUND_Y - o.bounds().max.y;
            assert!(lift >= spec.lift_min - 1e-3 && lift <= spec.lift_max + 1e-3);
            assert_eq!(o.pos.x, WORLD_WIDTH);
            assert!(!o.passed);
        }
        // Fixed-height kinds are pinned
        for o in field.obstacles.iter().filter(|o| o.kind == ObstacleKind::Lamp) {
            assert_eq!(o.bounds().max.y, GROUND_Y - 45.0);
        }
    }

    #[test]
    fn test_first_spawn_after_threshold() {
        let tuning = Tuning::default();
        let mut rng = SimRng::new(1);
        let mut field = ObstacleField::new(&tuning);
        // Threshold 100: spawns when the timer exceeds it, on tick 101
        for _ in 0..100 {
            assert!(field.update(5.0, &tuning, &mut rng).is_none());
        }
        assert!(field.update(5.0, &tuning, &mut rng).is_some());
        assert_eq!(field.obstacles.len(), 1);
        assert!(field.spawn.threshold >= tuning.obstacle_interval_floor);
    }

    #[test]
    fn test_scroll_and_recycle() {
        let mut field = ObstacleField::new(&Tuning::default());
        field.obstacles.push(Obstacle::new(1, ObstacleKind::Crate, 0.0));
        let obstacle = &mut field.obstacles[0];
        obstacle.update(5.0);
        assert_eq!(obstacle.pos.x, WORLD_WIDTH - 5.0);

        // Right edge at -49: still kept; at -51: dropped
        field.obstacles[0].pos.x = -49.0 - 40.0;
        field.recycle();
        assert_eq!(field.obstacles.len(), 1);
        field.obstacles[0].pos.x = -51.0 - 40.0;
        field.recycle();
        assert!(field.obstacles.is_empty());
    }

    #[test]
    fn test_gate_shape_has_open_gap() {
        let gate = Obstacle::new(1, ObstacleKind::Gate, 0.0);
        let CollisionShape::DualBand { top, bottom } = gate.collision_shape() else {
            panic!("gate must be dual band");
        };
        assert_eq!(bottom.max.y, GROUND_Y);
        assert_eq!(bottom.height(), 30.0);
        assert_eq!(top.height(), 120.0);
        assert!(top.max.y < bottom.min.y);
    }

    #[test]
    fn test_animate_is_monotonic() {
        let mut field = ObstacleField::new(&Tuning::default());
        field.obstacles.push(Obstacle::new(1, ObstacleKind::Lamp, 45.0));
        for _ in 0..3 {
            field.animate();
        }
        assert_eq!(field.obstacles[0].anim_frame, 3);
        assert_eq!(field.obstacles[0].render_hint().frame, 3);
    }
}
