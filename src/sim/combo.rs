//! Combo streak and scoring arithmetic

use serde::{Deserialize, Serialize};

/// Streak values that fire a one-time celebration
pub const MILESTONES: [u32; 3] = [5, 10, 20];

/// Multiplier as a pure step function of the streak
pub fn multiplier_for(streak: u32) -> f32 {
    match streak {
        20.. => 3.0,
        10.. => 2.0,
        5.. => 1.5,
        _ => 1.0,
    }
}

/// Points for one pass: floor(1 × combo × power-up factor)
pub fn points_for(combo_multiplier: f32, powerup_factor: f32) -> u64 {
    (1.0 * combo_multiplier * powerup_factor).floor() as u64
}

/// Result of registering a pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassOutcome {
    pub streak: u32,
    pub multiplier: f32,
    /// Set when this pass hit a new milestone
    pub milestone: Option<u32>,
}

/// Combo streak state for the current session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combo {
    pub streak: u32,
    pub multiplier: f32,
    /// Best streak this session (never decreases until a new session)
    pub best: u32,
    /// Highest milestone already celebrated
    pub last_milestone: u32,
}

impl Default for Combo {
    fn default() -> Self {
        Self {
            streak: 0,
            multiplier: 1.0,
            best: 0,
            last_milestone: 0,
        }
    }
}

impl Combo {
    /// Count one obstacle passed
    pub fn register_pass(&mut self) -> PassOutcome {
        self.streak += 1;
        self.best = self.best.max(self.streak);
        self.multiplier = multiplier_for(self.streak);

        let milestone = if MILESTONES.contains(&self.streak) && self.streak > self.last_milestone {
            self.last_milestone = self.streak;
            Some(self.streak)
        } else {
            None
        };

        PassOutcome {
            streak: self.streak,
            multiplier: self.multiplier,
            milestone,
        }
    }

    /// Streak broken by a crash; best survives
    pub fn break_streak(&mut self) {
        self.streak = 0;
        self.multiplier = 1.0;
        self.last_milestone = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_steps() {
        assert_eq!(multiplier_for(0), 1.0);
        assert_eq!(multiplier_for(4), 1.0);
        assert_eq!(multiplier_for(5), 1.5);
        assert_eq!(multiplier_for(9), 1.5);
        assert_eq!(multiplier_for(10), 2.0);
        assert_eq!(multiplier_for(19), 2.0);
        assert_eq!(multiplier_for(20), 3.0);
        assert_eq!(multiplier_for(1_000), 3.0);
    }

    #[test]
    fn test_points() {
        assert_eq!(points_for(1.0, 1.0), 1);
        assert_eq!(points_for(1.5, 1.0), 1);
        assert_eq!(points_for(1.5, 2.0), 3);
        assert_eq!(points_for(2.0, 1.0), 2);
        assert_eq!(points_for(3.0, 2.0), 6);
    }

    #[test]
    fn test_milestones_fire_once() {
        let mut combo = Combo::default();
        let mut fired = Vec::new();
        for _ in 0..25 {
            if let Some(m) = combo.register_pass().milestone {
                fired.push(m);
            }
        }
        assert_eq!(fired, vec![5, 10, 20]);
        assert_eq!(combo.best, 25);
        assert_eq!(combo.multiplier, 3.0);
    }

    #[test]
    fn test_break_resets_but_keeps_best() {
        let mut combo = Combo::default();
        for _ in 0..12 {
            combo.register_pass();
        }
        combo.break_streak();
        assert_eq!(combo.streak, 0);
        assert_eq!(combo.multiplier, 1.0);
        assert_eq!(combo.last_milestone, 0);
        assert_eq!(combo.best, 12);

        // Milestones can fire again after a break
        let mut fired = Vec::new();
        for _ in 0..5 {
            if let Some(m) = combo.register_pass().milestone {
                fired.push(m);
            }
        }
        assert_eq!(fired, vec![5]);
    }
}
