//! Per-side round state and the summaries a round hands back
//!
//! Everything the persistence collaborator needs lives in [`RoundSnapshot`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Running tallies for one side during a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideState {
    pub score: u32,
    /// Signed while the round runs; clamped to zero every frame
    pub lives: i32,
    pub bullets_shot: u32,
    pub ships_destroyed: u32,
}

impl SideState {
    pub fn from_snapshot(snapshot: &RoundSnapshot) -> Self {
        Self {
            score: snapshot.score,
            lives: snapshot.lives as i32,
            bullets_shot: snapshot.bullets_shot,
            ships_destroyed: snapshot.ships_destroyed,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    /// Lose one life
    pub fn hit(&mut self) {
        self.lives -= 1;
    }

    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.ships_destroyed += 1;
    }

    /// End-of-round bonus for the lives beyond the last one
    pub fn apply_life_score(&mut self) {
        let bonus = LIFE_SCORE * (self.lives - 1).max(0) as u32;
        self.score = self.score.saturating_add(bonus);
    }

    pub fn snapshot(&self, level: u32) -> RoundSnapshot {
        RoundSnapshot {
            level,
            score: self.score,
            lives: self.lives.max(0) as u32,
            bullets_shot: self.bullets_shot,
            ships_destroyed: self.ships_destroyed,
        }
    }
}

/// One side's performance summary, carried from round to round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub level: u32,
    pub score: u32,
    pub lives: u32,
    pub bullets_shot: u32,
    pub ships_destroyed: u32,
}

impl RoundSnapshot {
    /// Starting state for a new game
    pub fn fresh() -> Self {
        Self {
            level: 1,
            score: 0,
            lives: MAX_LIVES,
            bullets_shot: 0,
            ships_destroyed: 0,
        }
    }

    /// Share of shots that destroyed something, 0.0 when nothing was fired
    pub fn accuracy(&self) -> f32 {
        if self.bullets_shot == 0 {
            0.0
        } else {
            self.ships_destroyed as f32 / self.bullets_shot as f32
        }
    }
}

impl Default for RoundSnapshot {
    fn default() -> Self {
        Self::fresh()
    }
}

/// Why a round stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEnd {
    /// The formation was wiped out
    Cleared,
    /// Every side ran out of lives
    Defeated,
    /// Force quit from the pause state
    Quit,
}

/// Terminal code plus per-side snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub end: RoundEnd,
    pub snapshots: Vec<RoundSnapshot>,
}
