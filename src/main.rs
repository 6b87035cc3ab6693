//! Cape Dash entry point
//!
//! Native builds run a headless attract-mode session: the autopilot plays
//! for a while, then lets go, and the run ends on the first crash. The final
//! score goes through the same score keeper a host would use.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use cape_dash::audio::LogSink;
    use cape_dash::persistence::{self, ScoreKeeper};
    use cape_dash::platform::{MemoryStore, PlayerIdentity};
    use cape_dash::sim::{GameEvent, GamePhase};
    use cape_dash::{GameLoop, QualityPreset, Settings};

    /// 60 Hz frame step on the fake clock
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Frames the autopilot keeps control
    const AUTOPILOT_FRAMES: u32 = 60 * 60;
    /// Give up if nothing ends the run
    const MAX_FRAMES: u32 = AUTOPILOT_FRAMES + 60 * 120;

    pub fn run(seed: u64, quality: QualityPreset) {
        let mut store = MemoryStore::new();
        let settings = Settings::from_preset(quality);
        if let Err(e) = settings.save(&mut store) {
            log::warn!("Failed to save settings: {}", e);
        }

        let mut game = GameLoop::new(seed);
        game.apply_settings(&settings);
        game.set_idle_mode(true);

        let player = PlayerIdentity::new(1).with_name("Demo", None);
        let mut keeper = ScoreKeeper::new(store, player);
        let mut sink = LogSink;

        let mut now = 0.0;
        let mut revealed = false;
        for frame in 0..MAX_FRAMES {
            if frame == AUTOPILOT_FRAMES {
                let state = game.state();
                log::info!(
                    "Autopilot hands over at score {} (speed {:.2}, combo {})",
                    state.score,
                    state.speed,
                    state.combo.streak
                );
                if state.phase == GamePhase::Playing {
                    if let Err(e) = persistence::save_snapshot(keeper.store_mut(), state) {
                        log::warn!("Failed to save snapshot: {}", e);
                    }
                }
                game.set_idle_mode(false);
            }

            let events = game.frame(now, &mut sink, &mut keeper);
            for event in events {
                match event {
                    GameEvent::ComboMilestone(level) => log::info!("Combo x{}", level),
                    GameEvent::PowerUpActivate(kind) => log::info!("Power-up: {}", kind.as_str()),
                    GameEvent::LeaderboardReveal { .. } => revealed = true,
                    _ => {}
                }
            }
            now += FRAME_MS;

            // Autopilot restarts after a game over; stop at the first one
            // once control is released
            if revealed {
                break;
            }
        }

        let state = game.state();
        log::info!(
            "Finished after {} ticks: score {}, best combo {}, {:?}",
            state.time_ticks,
            state.score,
            state.combo.best,
            state.phase
        );

        match keeper.leaderboard() {
            Ok(board) => {
                for line in board.lines() {
                    log::info!("{}", line);
                }
            }
            Err(e) => log::warn!("Failed to read leaderboard: {}", e),
        }
        match persistence::load_snapshot(keeper.store()) {
            Ok(Some(saved)) => log::info!("Snapshot available at score {}", saved.score),
            Ok(None) => {}
            Err(e) => log::warn!("Failed to read snapshot: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Cape Dash (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    let quality = args
        .next()
        .and_then(|s| cape_dash::QualityPreset::parse(&s))
        .unwrap_or_default();

    log::info!("Game initialized with seed: {} ({})", seed, quality.as_str());
    headless::run(seed, quality);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive `GameLoop` directly
}
