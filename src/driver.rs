//! Frame loop driver
//!
//! Owns the [`GameState`], turns input requests into one-shot tick input,
//! runs exactly one tick per frame and keeps the real-time timers that sit
//! outside the tick cadence (crash → game over, game over → leaderboard).
//! Every timer carries the session token it was armed for; a restart bumps
//! the session and leaves old timers to fire harmlessly.

use crate::audio::{AudioManager, AudioSink};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Receives the final result of each run
pub trait GameOverSink {
    fn on_game_over(&mut self, final_score: u64, best_combo: u32);
}

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    GameOver,
    LeaderboardReveal,
}

/// One-shot real-time timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    pub kind: TimerKind,
    /// Session the timer was armed in
    pub token: u64,
    /// Host clock time (ms) to fire at
    pub fire_at: f64,
}

/// Game instance holding all state
pub struct GameLoop {
    state: GameState,
    input: TickInput,
    idle_mode: bool,
    timers: Vec<Timer>,
    audio: AudioManager,
    now_ms: f64,
    /// Events from the latest frame
    events: Vec<GameEvent>,
}

impl GameLoop {
    pub fn new(seed: u64) -> Self {
        Self::with_state(GameState::new(seed))
    }

    pub fn with_state(state: GameState) -> Self {
        let mut game = Self {
            state,
            input: TickInput::default(),
            idle_mode: false,
            timers: Vec::new(),
            audio: AudioManager::new(),
            now_ms: 0.0,
            events: Vec::new(),
        };
        game.arm_pending();
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    /// Events produced by the latest frame
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.audio.apply_settings(settings);
        self.state.particle_cap = settings.max_particles();
        self.state.star_count = settings.quality.star_count();
        self.state.particles.truncate(self.state.particle_cap);
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
    }

    pub fn request_start(&mut self) {
        self.input.start = true;
    }

    pub fn request_jump(&mut self) {
        self.input.jump = true;
    }

    pub fn request_duck(&mut self, pressed: bool) {
        self.input.duck = Some(pressed);
    }

    /// Replace the running game (continue from a snapshot)
    ///
    /// A crash that was waiting on its timer gets a fresh full delay.
    pub fn load_state(&mut self, state: GameState) {
        log::info!(
            "Loaded state: session {}, {:?}, score {}",
            state.session_id,
            state.phase,
            state.score
        );
        self.state = state;
        self.timers.clear();
        self.input = TickInput::default();
        self.arm_pending();
    }

    fn arm_pending(&mut self) {
        if self.state.phase != GamePhase::Crashed {
            return;
        }
        if let Some(pending) = self.state.pending_game_over {
            self.arm(TimerKind::GameOver, pending.token, pending.delay_ms);
        }
    }

    fn arm(&mut self, kind: TimerKind, token: u64, delay_ms: u32) {
        log::debug!("Armed {:?} for session {} in {} ms", kind, token, delay_ms);
        self.timers.push(Timer {
            kind,
            token,
            fire_at: self.now_ms + delay_ms as f64,
        });
    }

    /// Run one frame at host time `now_ms`
    pub fn frame(
        &mut self,
        now_ms: f64,
        audio: &mut dyn AudioSink,
        results: &mut dyn GameOverSink,
    ) -> &[GameEvent] {
        self.now_ms = now_ms;
        self.events.clear();

        let mut input = self.input.clone();
        input.idle_mode = self.idle_mode;
        tick(&mut self.state, &input);

        // Clear one-shot inputs after processing
        self.input = TickInput::default();

        let events = self.state.drain_events();
        self.dispatch(events, audio, results);
        self.fire_due(audio, results);

        &self.events
    }

    fn dispatch(
        &mut self,
        events: Vec<GameEvent>,
        audio: &mut dyn AudioSink,
        results: &mut dyn GameOverSink,
    ) {
        for event in events {
            self.audio.handle(&event, audio);
            match event {
                GameEvent::Crashed { token, delay_ms } => {
                    self.arm(TimerKind::GameOver, token, delay_ms);
                }
                GameEvent::GameOver {
                    final_score,
                    best_combo,
                } => {
                    results.on_game_over(final_score, best_combo);
                    let delay = self.state.tuning.leaderboard_delay_ms;
                    self.arm(TimerKind::LeaderboardReveal, self.state.session_id, delay);
                }
                _ => {}
            }
            self.events.push(event);
        }
    }

    fn fire_due(&mut self, audio: &mut dyn AudioSink, results: &mut dyn GameOverSink) {
        let now = self.now_ms;
        let (due, pending): (Vec<Timer>, Vec<Timer>) =
            self.timers.iter().partition(|t| t.fire_at <= now);
        self.timers = pending;

        for timer in due {
            match timer.kind {
                TimerKind::GameOver => {
                    if self.state.complete_game_over(timer.token) {
                        let events = self.state.drain_events();
                        self.dispatch(events, audio, results);
                    }
                }
                TimerKind::LeaderboardReveal => {
                    let current = timer.token == self.state.session_id;
                    if current && self.state.phase == GamePhase::GameOver {
                        self.events.push(GameEvent::LeaderboardReveal {
                            final_score: self.state.score,
                        });
                    } else {
                        log::debug!("Leaderboard reveal for session {} cancelled", timer.token);
                    }
                }
            }
        }
    }
}
