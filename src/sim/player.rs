//! The caped runner: jump/duck physics and the cape spring
//!
//! `y` is the player's feet. Screen y grows downward, so the ground line is
//! the largest `y` the player can ever have.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::consts::*;

/// Cape spring stiffness (fraction of the error applied per tick)
pub const CAPE_SPRING: f32 = 0.15;
/// Cape spring damping (fraction of angular velocity removed per tick)
pub const CAPE_DAMPING: f32 = 0.5;
/// Cape angle limits (radians, negative = streaming back)
pub const CAPE_MIN_ANGLE: f32 = -1.2;
pub const CAPE_MAX_ANGLE: f32 = 1.0;
/// Ticks the cape snaps back after a duck starts
const DUCK_SNAP_TICKS: u32 = 8;
/// Ticks the cape flops after landing
const LANDING_TICKS: u32 = 10;
/// Vertical speed separating "falling slowly" from ascending/descending
const SLOW_FALL_SPEED: f32 = 2.0;

/// Which cape pose the spring is currently chasing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapePose {
    DuckSnap,
    DuckFlutter,
    Landed,
    Ascending,
    Descending,
    FallingSlowly,
    Idle,
}

/// Spring-driven cape state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cape {
    pub angle: f32,
    pub angular_vel: f32,
    /// Target chosen last tick (for rendering/debug)
    pub target: f32,
}

impl Cape {
    /// Target angle for a pose; idle poses flutter with the tick counter
    pub fn target_for(pose: CapePose, tick: u64) -> f32 {
        let t = tick as f32;
        match pose {
            CapePose::DuckSnap => -0.6,
            CapePose::DuckFlutter => -0.35 + (t * 0.3).sin() * 0.08,
            CapePose::Landed => 0.5,
            CapePose::Ascending => -0.9,
            CapePose::Descending => 0.7,
            CapePose::FallingSlowly => 0.2,
            CapePose::Idle => -0.3 + (t * 0.2).sin() * 0.15,
        }
    }

    /// Drive the angle toward `target` with a damped spring
    pub fn step(&mut self, target: f32) {
        self.target = target;
        self.angular_vel += (target - self.angle) * CAPE_SPRING;
        self.angular_vel *= 1.0 - CAPE_DAMPING;
        self.angle = (self.angle + self.angular_vel).clamp(CAPE_MIN_ANGLE, CAPE_MAX_ANGLE);
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// x = left edge (fixed), y = feet
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub original_height: f32,
    pub vel_y: f32,
    pub jumping: bool,
    pub ducking: bool,
    pub crashed: bool,
    pub invincible: bool,
    pub cape: Cape,
    /// Ticks since the current duck started
    pub duck_ticks: u32,
    /// Ticks left in the post-landing pose
    pub landing_ticks: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, GROUND_Y),
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            original_height: PLAYER_HEIGHT,
            vel_y: 0.0,
            jumping: false,
            ducking: false,
            crashed: false,
            invincible: false,
            cape: Cape::default(),
            duck_ticks: 0,
            landing_ticks: 0,
        }
    }
}

impl Player {
    pub fn is_airborne(&self) -> bool {
        self.jumping
    }

    /// Start a jump. Returns true if the jump happened.
    pub fn jump(&mut self, impulse: f32) -> bool {
        if self.crashed || self.jumping || self.ducking {
            return false;
        }
        self.jumping = true;
        self.vel_y = impulse;
        true
    }

    /// Crouch to half height, feet stay on the ground. Returns true if applied.
    pub fn duck(&mut self) -> bool {
        if self.crashed || self.jumping {
            return false;
        }
        if !self.ducking {
            self.duck_ticks = 0;
        }
        self.ducking = true;
        self.height = self.original_height / 2.0;
        self.pos.y = GROUND_Y;
        true
    }

    /// Stand back up. Returns true if the player was ducking.
    pub fn unduck(&mut self) -> bool {
        if !self.ducking {
            return false;
        }
        self.ducking = false;
        self.height = self.original_height;
        self.pos.y = GROUND_Y;
        true
    }

    /// Integrate one tick of vertical motion and the cape
    pub fn tick(&mut self, gravity: f32, tick: u64) {
        if self.crashed {
            return;
        }

        if self.jumping {
            self.vel_y += gravity;
            self.pos.y += self.vel_y;
        }

        if self.pos.y >= GROUND_Y {
            if self.jumping {
                self.landing_ticks = LANDING_TICKS;
            }
            self.pos.y = GROUND_Y;
            self.jumping = false;
            self.vel_y = 0.0;
        }

        let pose = self.cape_pose();
        self.cape.step(Cape::target_for(pose, tick));

        if self.ducking {
            self.duck_ticks = self.duck_ticks.saturating_add(1);
        }
        self.landing_ticks = self.landing_ticks.saturating_sub(1);
    }

    /// Rule table for the cape target
    pub fn cape_pose(&self) -> CapePose {
        if self.ducking {
            if self.duck_ticks < DUCK_SNAP_TICKS {
                CapePose::DuckSnap
            } else {
                CapePose::DuckFlutter
            }
        } else if self.landing_ticks > 0 {
            CapePose::Landed
        } else if self.jumping {
            if self.vel_y < -SLOW_FALL_SPEED {
                CapePose::Ascending
            } else if self.vel_y > SLOW_FALL_SPEED {
                CapePose::Descending
            } else {
                CapePose::FallingSlowly
            }
        } else {
            CapePose::Idle
        }
    }

    /// Collision box (top-left origin)
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(
            Vec2::new(self.pos.x, self.pos.y - self.height),
            Vec2::new(self.width, self.height),
        )
    }

    /// Point collectibles are measured against (chest height)
    pub fn upper_body(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.width / 2.0, self.pos.y - self.height * 0.75)
    }

    /// Centre of the body, where the explosion goes off
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.width / 2.0, self.pos.y - self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_arc_lands_on_ground() {
        let mut player = Player::default();
        assert!(player.jump(JUMP_VELOCITY));
        assert!(player.is_airborne());

        let mut apex = GROUND_Y;
        for t in 0..200 {
            player.tick(GRAVITY, t);
            assert!(player.pos.y <= GROUND_Y);
            apex = apex.min(player.pos.y);
        }
        assert!(!player.is_airborne());
        assert_eq!(player.pos.y, GROUND_Y);
        assert_eq!(player.vel_y, 0.0);
        assert!(apex < GROUND_Y - 200.0);
    }

    #[test]
    fn test_no_double_jump() {
        let mut player = Player::default();
        assert!(player.jump(JUMP_VELOCITY));
        player.tick(GRAVITY, 0);
        let vel = player.vel_y;
        assert!(!player.jump(JUMP_VELOCITY));
        assert_eq!(player.vel_y, vel);
    }

    #[test]
    fn test_duck_halves_height_and_keeps_feet() {
        let mut player = Player::default();
        assert!(player.duck());
        assert_eq!(player.height, PLAYER_HEIGHT / 2.0);
        assert_eq!(player.pos.y, GROUND_Y);
        assert_eq!(player.bounds().min.y, GROUND_Y - PLAYER_HEIGHT / 2.0);

        assert!(player.unduck());
        assert_eq!(player.height, PLAYER_HEIGHT);
        assert_eq!(player.bounds().min.y, GROUND_Y - PLAYER_HEIGHT);
    }

    #[test]
    fn test_jump_and_duck_exclusive() {
        let mut player = Player::default();
        player.duck();
        assert!(!player.jump(JUMP_VELOCITY));
        player.unduck();

        player.jump(JUMP_VELOCITY);
        assert!(!player.duck());
        assert_eq!(player.height, PLAYER_HEIGHT);
    }

    #[test]
    fn test_unduck_when_standing_is_noop() {
        let mut player = Player::default();
        assert!(!player.unduck());
    }

    #[test]
    fn test_crashed_player_frozen() {
        let mut player = Player::default();
        player.jump(JUMP_VELOCITY);
        player.tick(GRAVITY, 0);
        player.crashed = true;
        let y = player.pos.y;
        player.tick(GRAVITY, 1);
        assert_eq!(player.pos.y, y);
    }

    #[test]
    fn test_cape_pose_rules() {
        let mut player = Player::default();
        player.landing_ticks = 0;
        assert_eq!(player.cape_pose(), CapePose::Idle);

        player.jump(JUMP_VELOCITY);
        assert_eq!(player.cape_pose(), CapePose::Ascending);
        player.vel_y = 0.5;
        assert_eq!(player.cape_pose(), CapePose::FallingSlowly);
        player.vel_y = 8.0;
        assert_eq!(player.cape_pose(), CapePose::Descending);

        // Land
        for t in 0..100 {
            player.tick(GRAVITY, t);
            if !player.jumping {
                break;
            }
        }
        assert_eq!(player.cape_pose(), CapePose::Landed);

        let mut player = Player::default();
        player.duck();
        assert_eq!(player.cape_pose(), CapePose::DuckSnap);
        for t in 0..DUCK_SNAP_TICKS as u64 {
            player.tick(GRAVITY, t);
        }
        assert_eq!(player.cape_pose(), CapePose::DuckFlutter);
    }

    #[test]
    fn test_cape_settles_without_overshoot() {
        let mut cape = Cape::default();
        let mut prev = cape.angle;
        for _ in 0..200 {
            cape.step(0.5);
            assert!(cape.angle <= 0.5 + 1e-4);
            assert!(cape.angle >= prev - 1e-6);
            prev = cape.angle;
        }
        assert!((cape.angle - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_cape_clamped() {
        let mut cape = Cape::default();
        for _ in 0..100 {
            cape.step(5.0);
            assert!(cape.angle <= CAPE_MAX_ANGLE);
        }
        for _ in 0..100 {
            cape.step(-5.0);
            assert!(cape.angle >= CAPE_MIN_ANGLE);
        }
    }
}
