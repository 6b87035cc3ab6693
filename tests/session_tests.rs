//! End-to-end session scenarios through the public API

use cape_dash::audio::LogSink;
use cape_dash::consts::*;
use cape_dash::persistence::{self, ScoreKeeper};
use cape_dash::platform::{MemoryStore, PlayerIdentity};
use cape_dash::sim::{
    GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, PowerUpKind, TickInput, tick,
};
use cape_dash::{GameLoop, GameOverSink};

#[derive(Default)]
struct Results(Vec<(u64, u32)>);

impl GameOverSink for Results {
    fn on_game_over(&mut self, final_score: u64, best_combo: u32) {
        self.0.push((final_score, best_combo));
    }
}

fn started(seed: u64) -> GameState {
    let mut state = GameState::new(seed);
    state.start();
    state.drain_events();
    state
}

/// Crate just left of the player, counted on the next tick
fn behind_player(id: u32) -> Obstacle {
    let mut o = Obstacle::new(id, ObstacleKind::Crate, 0.0);
    o.pos.x = PLAYER_X - o.size.x - 10.0;
    o
}

fn on_player(id: u32) -> Obstacle {
    let mut o = Obstacle::new(id, ObstacleKind::Crate, 0.0);
    o.pos.x = PLAYER_X + 10.0;
    o
}

#[test]
fn ten_passes_in_a_row_reach_double_points() {
    let mut state = started(21);
    let mut gains = Vec::new();
    for i in 0..10 {
        let before = state.score;
        state.obstacles.obstacles.push(behind_player(1_000 + i));
        tick(&mut state, &TickInput::default());
        gains.push(state.score - before);
    }

    // 1.5× floors to 1, the tenth pass is worth 2
    assert_eq!(gains, vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 2]);
    assert_eq!(state.combo.streak, 10);
    let events = state.drain_events();
    let milestones: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::ComboMilestone(level) => Some(*level),
            _ => None,
        })
        .collect();
    assert_eq!(milestones, vec![5, 10]);
    assert!(events.contains(&GameEvent::ScoreBeep));
}

#[test]
fn multiplier_power_up_doubles_pass_points() {
    let mut state = started(22);
    state.activate_powerup(PowerUpKind::ScoreMultiplier);
    state.obstacles.obstacles.push(behind_player(1));
    tick(&mut state, &TickInput::default());
    assert_eq!(state.score, 2);
}

#[test]
fn shield_absorbs_and_scores_once() {
    let mut state = started(23);
    state.activate_powerup(PowerUpKind::Shield);
    state.drain_events();
    state.obstacles.obstacles.push(on_player(1));

    tick(&mut state, &TickInput::default());
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 1);
    let events = state.drain_events();
    assert!(events.contains(&GameEvent::ShieldBlock));
    assert!(!events.contains(&GameEvent::Collision));

    // Still overlapping, already counted
    tick(&mut state, &TickInput::default());
    assert_eq!(state.score, 1);
    assert_eq!(state.combo.streak, 1);
}

#[test]
fn leaderboard_reveal_dropped_after_restart() {
    let mut game = GameLoop::new(31);
    let mut results = Results::default();

    game.request_start();
    game.frame(0.0, &mut LogSink, &mut results);
    let mut state = game.state().clone();
    state.obstacles.obstacles.push(on_player(1));
    game.load_state(state);
    game.frame(16.0, &mut LogSink, &mut results);
    assert_eq!(game.state().phase, GamePhase::Crashed);

    // Game over, then restart long before the reveal at 3016 ms
    game.frame(1_016.0, &mut LogSink, &mut results);
    assert_eq!(game.state().phase, GamePhase::GameOver);
    assert_eq!(game.timers().len(), 1);
    game.request_start();
    game.frame(1_100.0, &mut LogSink, &mut results);
    assert_eq!(game.state().session_id, 2);

    let mut now = 1_100.0;
    while now < 3_200.0 {
        now += 1000.0 / 60.0;
        let events = game.frame(now, &mut LogSink, &mut results);
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::LeaderboardReveal { .. }))
        );
    }
    assert!(game.timers().is_empty());
    assert_eq!(game.state().phase, GamePhase::Playing);
    assert_eq!(results.0, vec![(0, 0)]);
}

#[test]
fn snapshot_resume_replays_identically() {
    let mut original = started(41);
    let input = |i: u32| TickInput {
        jump: i % 37 == 0,
        duck: match i % 53 {
            0 => Some(true),
            20 => Some(false),
            _ => None,
        },
        ..Default::default()
    };
    for i in 0..150 {
        tick(&mut original, &input(i));
    }
    original.drain_events();
    assert!(original.particles.is_empty());

    let json = persistence::encode_snapshot(&original).unwrap();
    let mut resumed = persistence::decode_snapshot(&json).unwrap();

    for i in 150..900 {
        tick(&mut original, &input(i));
        tick(&mut resumed, &input(i));
    }
    assert_eq!(resumed.score, original.score);
    assert_eq!(resumed.phase, original.phase);
    assert_eq!(resumed.rng.draws(), original.rng.draws());
    assert_eq!(resumed.fx_rng.draws(), original.fx_rng.draws());
    let positions = |s: &GameState| -> Vec<(u32, f32, f32)> {
        s.obstacles
            .obstacles
            .iter()
            .map(|o| (o.id, o.pos.x, o.pos.y))
            .collect()
    };
    assert_eq!(positions(&resumed), positions(&original));
    assert_eq!(resumed.drain_events(), original.drain_events());
}

#[test]
fn snapshot_keeps_effects_and_combo() {
    let mut original = started(43);
    original.activate_powerup(PowerUpKind::SlowMotion);
    original.activate_powerup(PowerUpKind::ScoreMultiplier);
    original.activate_powerup(PowerUpKind::Shield);
    for i in 0..12 {
        original.obstacles.obstacles.push(behind_player(2_000 + i));
        tick(&mut original, &TickInput::default());
    }
    // One more on its way past the player
    let mut next = Obstacle::new(2_100, ObstacleKind::Crate, 0.0);
    next.pos.x = PLAYER_X + 40.0;
    original.obstacles.obstacles.push(next);
    original.drain_events();
    assert_eq!(original.combo.streak, 12);
    assert_eq!(original.powerups.active.len(), 3);
    assert!(original.powerups.slow.is_some());

    let json = persistence::encode_snapshot(&original).unwrap();
    let mut resumed = persistence::decode_snapshot(&json).unwrap();

    let effects = |s: &GameState| -> Vec<(PowerUpKind, u32, u32)> {
        s.powerups
            .active
            .iter()
            .map(|e| (e.kind, e.remaining, e.duration))
            .collect()
    };
    let ledger = |s: &GameState| {
        s.powerups
            .slow
            .map(|l| (l.baseline.to_bits(), l.growth.to_bits()))
    };
    assert_eq!(effects(&resumed), effects(&original));
    assert_eq!(ledger(&resumed), ledger(&original));
    assert_eq!(resumed.powerups.score_factor, original.powerups.score_factor);
    assert_eq!(resumed.combo.streak, original.combo.streak);
    assert_eq!(resumed.combo.multiplier, original.combo.multiplier);
    assert_eq!(resumed.combo.best, original.combo.best);
    assert_eq!(resumed.combo.last_milestone, original.combo.last_milestone);
    assert_eq!(resumed.player.invincible, original.player.invincible);

    for _ in 0..700 {
        tick(&mut original, &TickInput::default());
        tick(&mut resumed, &TickInput::default());
        assert_eq!(resumed.speed.to_bits(), original.speed.to_bits());
        assert_eq!(resumed.score, original.score);
        assert_eq!(resumed.phase, original.phase);
        assert_eq!(resumed.drain_events(), original.drain_events());
    }
    assert_eq!(effects(&resumed), effects(&original));
    assert_eq!(resumed.combo.best, original.combo.best);
}

#[test]
fn finished_runs_land_on_the_leaderboard() {
    let player = PlayerIdentity::new(5).with_name("Grace", Some("Hopper"));
    let mut keeper = ScoreKeeper::new(MemoryStore::new(), player);

    keeper.on_game_over(12, 4);
    keeper.on_game_over(8, 9);
    let board = keeper.leaderboard().unwrap();
    assert_eq!(board.entries.len(), 1);
    assert_eq!(board.entries[0].score, 12);
    assert_eq!(board.lines(), vec!["🥇 Grace Hopper 12".to_string()]);

    keeper.on_game_over(30, 11);
    let board = keeper.leaderboard().unwrap();
    assert_eq!(board.top_score(), Some(30));
    assert_eq!(keeper.personal_best().unwrap().unwrap().best_combo, 11);
}

#[test]
fn game_loop_reports_final_score_once() {
    let mut game = GameLoop::new(51);
    let mut keeper = ScoreKeeper::new(MemoryStore::new(), PlayerIdentity::new(9));

    game.request_start();
    game.frame(0.0, &mut LogSink, &mut keeper);
    let mut state = game.state().clone();
    state.score = 17;
    state.obstacles.obstacles.push(on_player(1));
    game.load_state(state);

    let mut now = 0.0;
    for _ in 0..400 {
        now += 1000.0 / 60.0;
        game.frame(now, &mut LogSink, &mut keeper);
    }
    assert_eq!(game.state().phase, GamePhase::GameOver);
    assert_eq!(keeper.leaderboard().unwrap().top_score(), Some(17));
    assert_eq!(keeper.personal_best().unwrap().unwrap().score, 17);
}
