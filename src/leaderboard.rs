//! Shared leaderboard
//!
//! One entry per player, best score only, top 10 kept in descending order.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::platform::PlayerIdentity;

/// Maximum number of players on the board
pub const MAX_ENTRIES: usize = 10;

/// Name shown when the host gave no first name
const DEFAULT_FIRST_NAME: &str = "Player";

/// A player's best run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id: u64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    pub score: u64,
    #[serde(default)]
    pub best_combo: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

impl LeaderboardEntry {
    pub fn new(player: &PlayerIdentity, score: u64, best_combo: u32, timestamp: u64) -> Self {
        Self {
            player_id: player.id,
            first_name: player
                .first_name
                .clone()
                .unwrap_or_else(|| DEFAULT_FIRST_NAME.to_string()),
            last_name: player.last_name.clone().unwrap_or_default(),
            username: player.username.clone().unwrap_or_default(),
            score,
            best_combo,
            timestamp,
        }
    }

    /// "First Last", or just the first name
    pub fn display_name(&self) -> String {
        let first = if self.first_name.is_empty() {
            DEFAULT_FIRST_NAME
        } else {
            &self.first_name
        };
        if self.last_name.is_empty() {
            first.to_string()
        } else {
            format!("{} {}", first, self.last_name)
        }
    }
}

/// Top-10 board
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse a stored board, re-sorting and trimming whatever was saved
    pub fn from_json(json: &str) -> Result<Self> {
        let mut board: Leaderboard = serde_json::from_str(json)?;
        board.normalize();
        Ok(board)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }

    /// Insert or improve a player's entry
    ///
    /// An existing entry is replaced only by a strictly greater score.
    /// Returns the player's 1-indexed rank if they are on the board afterwards.
    pub fn upsert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let player_id = entry.player_id;
        match self.entries.iter().position(|e| e.player_id == player_id) {
            Some(i) if self.entries[i].score >= entry.score => {}
            Some(i) => {
                self.entries.remove(i);
                self.entries.push(entry);
            }
            None => self.entries.push(entry),
        }
        self.normalize();
        self.rank_of(player_id)
    }

    /// 1-indexed rank of a player
    pub fn rank_of(&self, player_id: u64) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.player_id == player_id)
            .map(|i| i + 1)
    }

    /// Would this score make the board?
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Lines ready for display: "🥇 Ada Lovelace 42"
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{} {} {}", rank_label(i + 1), e.display_name(), e.score))
            .collect()
    }
}

/// Medal for the podium, "N." below it
pub fn rank_label(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("{}.", n),
    }
}

/// Format a timestamp relative to `now` (both Unix ms)
pub fn format_age(timestamp: u64, now: u64) -> String {
    let mins = now.saturating_sub(timestamp) / 60_000;
    let hours = mins / 60;
    let days = hours / 24;

    match (days, hours, mins) {
        (1, _, _) => "Yesterday".to_string(),
        (d, _, _) if d > 1 => format!("{} days ago", d),
        (_, 1, _) => "1 hour ago".to_string(),
        (_, h, _) if h > 1 => format!("{} hours ago", h),
        (_, _, 1) => "1 min ago".to_string(),
        (_, _, m) if m > 1 => format!("{} mins ago", m),
        _ => "Just now".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, score: u64) -> LeaderboardEntry {
        LeaderboardEntry::new(&PlayerIdentity::new(id), score, 0, 1_000)
    }

    #[test]
    fn test_upsert_keeps_best_only() {
        let mut board = Leaderboard::new();
        assert_eq!(board.upsert(entry(1, 30)), Some(1));
        // Lower or equal does nothing
        board.upsert(entry(1, 20));
        board.upsert(entry(1, 30));
        assert_eq!(board.entries.len(), 1);
        assert_eq!(board.top_score(), Some(30));

        board.upsert(entry(1, 31));
        assert_eq!(board.entries.len(), 1);
        assert_eq!(board.top_score(), Some(31));
    }

    #[test]
    fn test_sorted_and_capped() {
        let mut board = Leaderboard::new();
        for id in 0..15 {
            board.upsert(entry(id, id * 10));
        }
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert_eq!(board.top_score(), Some(140));
        assert!(board.entries.windows(2).all(|w| w[0].score >= w[1].score));
        // Lowest five fell off
        assert_eq!(board.rank_of(4), None);
        assert_eq!(board.upsert(entry(99, 1)), None);
        assert!(!board.qualifies(50));
        assert!(board.qualifies(51));
    }

    #[test]
    fn test_display_name_and_labels() {
        let anon = entry(1, 5);
        assert_eq!(anon.display_name(), "Player");

        let named = LeaderboardEntry::new(
            &PlayerIdentity::new(2).with_name("Ada", Some("Lovelace")),
            7,
            3,
            0,
        );
        assert_eq!(named.display_name(), "Ada Lovelace");

        assert_eq!(rank_label(1), "🥇");
        assert_eq!(rank_label(3), "🥉");
        assert_eq!(rank_label(4), "4.");
    }

    #[test]
    fn test_json_roundtrip_normalizes() {
        let json = r#"[
            {"player_id": 1, "first_name": "A", "score": 5, "timestamp": 0},
            {"player_id": 2, "first_name": "B", "score": 9, "timestamp": 0}
        ]"#;
        let board = Leaderboard::from_json(json).unwrap();
        assert_eq!(board.entries[0].player_id, 2);
        assert_eq!(board.lines()[0], "🥇 B 9");

        let back = Leaderboard::from_json(&board.to_json().unwrap()).unwrap();
        assert_eq!(back.entries, board.entries);
    }

    #[test]
    fn test_format_age() {
        let now = 10 * 86_400_000;
        assert_eq!(format_age(now, now), "Just now");
        assert_eq!(format_age(now - 60_000, now), "1 min ago");
        assert_eq!(format_age(now - 5 * 60_000, now), "5 mins ago");
        assert_eq!(format_age(now - 3_600_000, now), "1 hour ago");
        assert_eq!(format_age(now - 86_400_000, now), "Yesterday");
        assert_eq!(format_age(now - 3 * 86_400_000, now), "3 days ago");
    }
}
