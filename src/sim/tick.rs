//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one frame. Cosmetic timers run in
//! every phase; movement, spawning and scoring only while playing.

use super::collision::CollisionShape;
use super::combo::points_for;
use super::state::{GameEvent, GamePhase, GameState, Scrolling};
use crate::consts::*;
use crate::tuning::Tuning;

/// Obstacles whose bottom edge is at least this far above ground get ducked
const DUCK_CLEARANCE: f32 = 40.0;
/// Autopilot starts ducking when an overhead obstacle is this close
const DUCK_LEAD: f32 = 60.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a session (title screen or game over)
    pub start: bool,
    pub jump: bool,
    /// `Some(true)` duck pressed, `Some(false)` released
    pub duck: Option<bool>,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.idle_mode {
        autopilot(state);
    }
    if input.start {
        state.start();
    }
    if input.jump {
        state.jump();
    }
    match input.duck {
        Some(true) => {
            state.duck();
        }
        Some(false) => {
            state.unduck();
        }
        None => {}
    }

    state.time_ticks += 1;

    // Cosmetic timers keep running behind the crash and game-over screens
    state.obstacles.animate();
    state.update_particles();
    state.environment.decay_flash(&state.tuning);

    if state.phase != GamePhase::Playing {
        return;
    }

    let growth = state.tuning.speed_growth;
    state.speed += growth;
    if let Some(ledger) = state.powerups.slow.as_mut() {
        ledger.growth += growth;
    }

    let changes = state
        .environment
        .update(state.score, &state.tuning, &mut state.fx_rng);
    for change in changes {
        state.emit(GameEvent::Ambience(change));
    }
    state.scenery.update(state.speed, &mut state.fx_rng);

    state
        .obstacles
        .update(state.speed, &state.tuning, &mut state.rng);
    state.player.tick(state.tuning.gravity, state.time_ticks);

    state
        .powerups
        .update(state.speed, &state.tuning, &mut state.rng);
    state.update_powerup_effects();

    resolve_obstacles(state);

    state.obstacles.recycle();
    state.powerups.recycle();
}

/// Pass detection then collision, in spawn order. Stops at the first crash.
fn resolve_obstacles(state: &mut GameState) {
    for idx in 0..state.obstacles.obstacles.len() {
        let obstacle = &state.obstacles.obstacles[idx];
        if obstacle.passed {
            continue;
        }

        if obstacle.right() < state.player.pos.x {
            score_pass(state, idx);
            continue;
        }

        if !obstacle
            .collision_shape()
            .overlaps(&state.player.bounds())
        {
            continue;
        }

        if state.player.invincible {
            log::debug!("Shield absorbed {} #{}", obstacle.kind.as_str(), obstacle.id);
            state.emit(GameEvent::ShieldBlock);
            score_pass(state, idx);
        } else {
            state.crash();
            break;
        }
    }
}

/// Score an obstacle exactly once
fn score_pass(state: &mut GameState, idx: usize) {
    let Some(obstacle) = state.obstacles.obstacles.get_mut(idx) else {
        return;
    };
    if obstacle.passed {
        return;
    }
    obstacle.passed = true;
    let id = obstacle.id;

    let outcome = state.combo.register_pass();
    let points = points_for(outcome.multiplier, state.powerups.score_factor);
    let before = state.score / 10;
    state.score += points;

    state.emit(GameEvent::ObstaclePassed { id, points });
    if state.score / 10 > before {
        state.emit(GameEvent::ScoreBeep);
    }
    if let Some(level) = outcome.milestone {
        log::debug!("Combo milestone {} at score {}", level, state.score);
        state.emit(GameEvent::ComboMilestone(level));
    }
}

/// Ticks after a jump until the feet rise more than `need` above ground,
/// or `None` if the apex is too low
fn ticks_to_clear(need: f32, tuning: &Tuning) -> Option<u32> {
    let mut vel = tuning.jump_velocity;
    let mut rise = 0.0;
    let mut ticks = 0;
    loop {
        ticks += 1;
        vel += tuning.gravity;
        rise -= vel;
        if rise > need {
            return Some(ticks);
        }
        if vel >= 0.0 {
            return None;
        }
    }
}

/// Demo player: starts sessions and dodges the nearest obstacle ahead
fn autopilot(state: &mut GameState) {
    match state.phase {
        GamePhase::NotStarted | GamePhase::GameOver => {
            state.start();
            return;
        }
        GamePhase::Playing => {}
        GamePhase::Crashed => return,
    }

    let player_left = state.player.pos.x;
    let player_right = player_left + state.player.width;
    let next = state
        .obstacles
        .obstacles
        .iter()
        .filter(|o| !o.passed && o.right() > player_left)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

    let Some(obstacle) = next else {
        state.unduck();
        return;
    };

    let gap = obstacle.pos.x - player_right;
    // Top of the part the feet must get over
    let hurdle_top = match obstacle.collision_shape() {
        CollisionShape::Rect(rect) => {
            if rect.max.y <= GROUND_Y - DUCK_CLEARANCE {
                if gap < DUCK_LEAD {
                    state.duck();
                } else {
                    state.unduck();
                }
                return;
            }
            rect.min.y
        }
        CollisionShape::DualBand { bottom, .. } => bottom.min.y,
    };

    // Jump as late as possible so the feet are just clear at first contact
    let clear_at = ticks_to_clear(GROUND_Y - hurdle_top, &state.tuning).unwrap_or(1);
    let contact_in = (gap / state.speed).floor() + 1.0;
    if contact_in <= (clear_at + 1) as f32 {
        state.unduck();
        state.jump();
    }
}
