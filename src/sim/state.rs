//! Game state and core simulation types
//!
//! All state that must be persisted for Continue/determinism lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::CollisionShape;
use super::combo::Combo;
use super::environment::{AmbienceChange, Environment};
use super::obstacle::ObstacleField;
use super::player::Player;
use super::powerup::{PowerUpField, PowerUpKind};
use super::rng::SimRng;
use super::scenery::{DEFAULT_STAR_COUNT, Scenery};
use crate::consts::*;
use crate::tuning::Tuning;

/// Salt mixed into the seed for the cosmetic generator
const FX_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a start request
    #[default]
    NotStarted,
    /// Active gameplay
    Playing,
    /// Hit something; waiting for the game-over timer
    Crashed,
    /// Run ended
    GameOver,
}

/// Something that happened during a tick, for audio/UI/leaderboard
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    SessionStarted { session: u64 },
    Jump,
    ObstaclePassed { id: u32, points: u64 },
    /// Score crossed a multiple of ten
    ScoreBeep,
    ComboMilestone(u32),
    /// Shield absorbed an overlap
    ShieldBlock,
    Collision,
    Explosion { at: Vec2 },
    /// Crash recorded; the driver should arm a one-shot timer
    Crashed { token: u64, delay_ms: u32 },
    GameOver { final_score: u64, best_combo: u32 },
    /// Emitted by the driver once the leaderboard may be shown
    LeaderboardReveal { final_score: u64 },
    PowerUpCollect(PowerUpKind),
    PowerUpActivate(PowerUpKind),
    PowerUpExtended(PowerUpKind),
    PowerUpExpire(PowerUpKind),
    Ambience(AmbienceChange),
}

/// Countdown shared by the obstacle and power-up spawners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimer {
    /// Ticks since the last spawn
    pub timer: u32,
    /// Spawn once `timer` exceeds this
    pub threshold: f32,
}

impl SpawnTimer {
    pub fn new(threshold: f32) -> Self {
        Self {
            timer: 0,
            threshold,
        }
    }

    /// Count one tick. Returns true when a spawn is due.
    pub fn advance(&mut self) -> bool {
        self.timer = self.timer.saturating_add(1);
        self.timer as f32 > self.threshold
    }

    pub fn rearm(&mut self, threshold: f32) {
        self.timer = 0;
        self.threshold = threshold;
    }
}

/// What a renderer needs to draw an entity it does not otherwise know about
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderHint {
    pub sprite: &'static str,
    pub frame: u32,
    pub alpha: f32,
}

/// Entities that scroll across the playfield
pub trait Scrolling {
    /// Move left by `speed` for one tick
    fn update(&mut self, speed: f32);
    fn collision_shape(&self) -> CollisionShape;
    fn render_hint(&self) -> RenderHint;
}

/// Explosion palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Ember,
    Flame,
    Spark,
}

impl ParticleColor {
    pub const ALL: [ParticleColor; 3] = [
        ParticleColor::Ember,
        ParticleColor::Flame,
        ParticleColor::Spark,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            ParticleColor::Ember => "#e63946",
            ParticleColor::Flame => "#f1c27d",
            ParticleColor::Spark => "#ffffff",
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: ParticleColor,
    /// Ticks left
    pub life: u32,
}

impl Particle {
    /// Fade (1.0 fresh, 0.0 dead)
    pub fn alpha(&self) -> f32 {
        self.life as f32 / PARTICLE_LIFE as f32
    }
}

/// Crash-to-game-over transition waiting on real time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTransition {
    /// Session the transition belongs to
    pub token: u64,
    pub delay_ms: u32,
}

fn default_particle_cap() -> usize {
    MAX_PARTICLES
}

fn default_star_count() -> usize {
    DEFAULT_STAR_COUNT
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Gameplay RNG (spawns, kinds, heights)
    pub rng: SimRng,
    /// Cosmetic RNG (ambience, scenery, particles)
    pub fx_rng: SimRng,
    /// Bumped on every start; doubles as the timer cancellation token
    pub session_id: u64,
    pub phase: GamePhase,
    pub score: u64,
    /// Scroll speed in pixels per tick
    pub speed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub obstacles: ObstacleField,
    pub powerups: PowerUpField,
    pub combo: Combo,
    pub environment: Environment,
    pub scenery: Scenery,
    /// Set while Crashed, cleared on game over or restart
    pub pending_game_over: Option<ScheduledTransition>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    #[serde(skip, default = "default_particle_cap")]
    pub particle_cap: usize,
    /// Background stars created per session
    #[serde(skip, default = "default_star_count")]
    pub star_count: usize,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: SimRng::new(seed),
            fx_rng: SimRng::new(seed ^ FX_SEED_SALT),
            session_id: 0,
            phase: GamePhase::NotStarted,
            score: 0,
            speed: tuning.start_speed,
            time_ticks: 0,
            player: Player::default(),
            obstacles: ObstacleField::new(&tuning),
            powerups: PowerUpField::new(&tuning),
            combo: Combo::default(),
            environment: Environment::default(),
            scenery: Scenery::default(),
            pending_game_over: None,
            particles: Vec::new(),
            particle_cap: MAX_PARTICLES,
            star_count: DEFAULT_STAR_COUNT,
            events: Vec::new(),
            tuning,
        }
    }

    /// Begin a new session. Only valid from NotStarted or GameOver.
    ///
    /// Every collection is rebuilt before the phase flips, so nothing from
    /// the previous session survives into the first playing tick.
    pub fn start(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::NotStarted | GamePhase::GameOver) {
            log::trace!("Start ignored in {:?}", self.phase);
            return false;
        }

        self.session_id += 1;
        self.score = 0;
        self.speed = self.tuning.start_speed;
        self.player = Player::default();
        self.obstacles = ObstacleField::new(&self.tuning);
        self.powerups = PowerUpField::new(&self.tuning);
        self.combo = Combo::default();
        self.environment = Environment::default();
        self.scenery = Scenery::new(&mut self.fx_rng, self.star_count);
        self.particles.clear();
        self.pending_game_over = None;
        self.phase = GamePhase::Playing;

        log::info!("Session {} started (seed {})", self.session_id, self.seed);
        self.emit(GameEvent::SessionStarted {
            session: self.session_id,
        });
        true
    }

    pub fn jump(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            log::trace!("Jump ignored in {:?}", self.phase);
            return false;
        }
        let jumped = self.player.jump(self.tuning.jump_velocity);
        if jumped {
            self.emit(GameEvent::Jump);
        }
        jumped
    }

    pub fn duck(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.player.duck()
    }

    pub fn unduck(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.player.unduck()
    }

    /// Record a fatal collision and schedule game over
    pub fn crash(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }

        self.phase = GamePhase::Crashed;
        self.player.crashed = true;
        self.combo.break_streak();

        let at = self.player.center();
        self.spawn_explosion(at);

        let transition = ScheduledTransition {
            token: self.session_id,
            delay_ms: self.tuning.crash_delay_ms,
        };
        self.pending_game_over = Some(transition);

        log::info!(
            "Crashed at score {} (session {}, tick {})",
            self.score,
            self.session_id,
            self.time_ticks
        );
        self.emit(GameEvent::Collision);
        self.emit(GameEvent::Explosion { at });
        self.emit(GameEvent::Crashed {
            token: transition.token,
            delay_ms: transition.delay_ms,
        });
    }

    /// Finish a crash. Stale tokens and wrong phases are ignored.
    pub fn complete_game_over(&mut self, token: u64) -> bool {
        if self.phase != GamePhase::Crashed || token != self.session_id {
            log::debug!(
                "Dropped stale game-over (token {}, session {}, {:?})",
                token,
                self.session_id,
                self.phase
            );
            return false;
        }

        self.phase = GamePhase::GameOver;
        self.pending_game_over = None;
        log::info!(
            "Game over: score {} best combo {}",
            self.score,
            self.combo.best
        );
        self.emit(GameEvent::GameOver {
            final_score: self.score,
            best_combo: self.combo.best,
        });
        true
    }

    /// Burst of particles, limited by the particle cap
    pub fn spawn_explosion(&mut self, at: Vec2) {
        let room = self.particle_cap.saturating_sub(self.particles.len());
        for _ in 0..EXPLOSION_PARTICLES.min(room) {
            let vel = Vec2::new(
                (self.fx_rng.unit() - 0.5) * 10.0,
                (self.fx_rng.unit() - 0.5) * 15.0,
            );
            let size = self.fx_rng.unit() * 8.0 + 3.0;
            let color = self
                .fx_rng
                .pick(&ParticleColor::ALL)
                .copied()
                .unwrap_or(ParticleColor::Spark);
            self.particles.push(Particle {
                pos: at,
                vel,
                size,
                color,
                life: PARTICLE_LIFE,
            });
        }
    }

    /// Particles keep falling in every phase
    pub fn update_particles(&mut self) {
        for p in &mut self.particles {
            p.vel.y += PARTICLE_GRAVITY;
            p.pos += p.vel;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events produced since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::Crashed)
    }
}
