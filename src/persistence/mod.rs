//! Save/continue snapshots and score keeping
//!
//! Features:
//! - Versioned JSON envelope around the full `GameState`
//! - Per-player best record plus the shared top-10 board
//! - Failures are reported to the caller; the loop logs and carries on

use serde::{Deserialize, Serialize};

use crate::driver::GameOverSink;
use crate::error::{Error, Result};
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::platform::{KeyValueStore, PlayerIdentity};
use crate::sim::GameState;

/// Current snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;
/// Storage key for the save/continue snapshot
pub const SNAPSHOT_KEY: &str = "cape_dash_snapshot";
/// Storage key for the shared board
pub const LEADERBOARD_KEY: &str = "leaderboard";

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    state: &'a GameState,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    state: GameState,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Serialize a state into the versioned envelope
pub fn encode_snapshot(state: &GameState) -> Result<String> {
    Ok(serde_json::to_string(&EnvelopeRef {
        version: SNAPSHOT_VERSION,
        state,
    })?)
}

/// Parse an envelope, rejecting other versions before touching the state
pub fn decode_snapshot(json: &str) -> Result<GameState> {
    let probe: VersionProbe = serde_json::from_str(json)?;
    if probe.version != SNAPSHOT_VERSION {
        return Err(Error::UnsupportedVersion {
            found: probe.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    let envelope: Envelope = serde_json::from_str(json)?;
    Ok(envelope.state)
}

pub fn save_snapshot(store: &mut dyn KeyValueStore, state: &GameState) -> Result<()> {
    let json = encode_snapshot(state)?;
    store.set(SNAPSHOT_KEY, &json)?;
    log::info!(
        "Game saved (session {}, score {})",
        state.session_id,
        state.score
    );
    Ok(())
}

/// Stored snapshot, if any. An empty value counts as cleared.
pub fn load_snapshot(store: &dyn KeyValueStore) -> Result<Option<GameState>> {
    match store.get(SNAPSHOT_KEY)? {
        Some(json) if !json.is_empty() => {
            let state = decode_snapshot(&json)?;
            log::info!("Found saved game at score {}", state.score);
            Ok(Some(state))
        }
        _ => Ok(None),
    }
}

pub fn clear_snapshot(store: &mut dyn KeyValueStore) -> Result<()> {
    store.set(SNAPSHOT_KEY, "")?;
    log::info!("Saved game cleared");
    Ok(())
}

/// Records finished runs for one player
pub struct ScoreKeeper<S: KeyValueStore> {
    store: S,
    player: PlayerIdentity,
}

impl<S: KeyValueStore> ScoreKeeper<S> {
    pub fn new(store: S, player: PlayerIdentity) -> Self {
        Self { store, player }
    }

    pub fn player(&self) -> &PlayerIdentity {
        &self.player
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The player's stored best, if any
    pub fn personal_best(&self) -> Result<Option<LeaderboardEntry>> {
        match self.store.get(&self.player.storage_key())? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn leaderboard(&self) -> Result<Leaderboard> {
        match self.store.get(LEADERBOARD_KEY)? {
            Some(json) => Leaderboard::from_json(&json),
            None => Ok(Leaderboard::new()),
        }
    }

    /// Store a finished run if it beats the player's best
    ///
    /// Returns the board rank when the run was a new personal best.
    pub fn record(&mut self, score: u64, best_combo: u32, timestamp: u64) -> Result<Option<usize>> {
        if let Some(best) = self.personal_best()? {
            if score <= best.score {
                log::debug!("Score {} does not beat best {}", score, best.score);
                return Ok(None);
            }
        }

        let entry = LeaderboardEntry::new(&self.player, score, best_combo, timestamp);
        let json = serde_json::to_string(&entry)?;
        self.store.set(&self.player.storage_key(), &json)?;

        let mut board = self.leaderboard()?;
        let rank = board.upsert(entry);
        self.store.set(LEADERBOARD_KEY, &board.to_json()?)?;
        log::info!("New best {} for player {} (rank {:?})", score, self.player.id, rank);
        Ok(rank)
    }
}

impl<S: KeyValueStore> GameOverSink for ScoreKeeper<S> {
    fn on_game_over(&mut self, final_score: u64, best_combo: u32) {
        if let Err(e) = self.record(final_score, best_combo, unix_millis()) {
            log::warn!("Failed to record score {}: {}", final_score, e);
        }
    }
}

fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
