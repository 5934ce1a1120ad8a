//! Level-to-level progression
//!
//! Carries each side's [`RoundSnapshot`] from one round into the next, grants
//! the periodic bonus life and decides when the game is over.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{Clock, Round, RoundEnd, RoundOutcome, RoundSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignState {
    Playing,
    /// Every side out of lives, or the game was abandoned
    GameOver,
    /// Last level cleared
    Completed,
}

/// A whole game: one round per level until the lives or the levels run out
#[derive(Debug, Clone)]
pub struct Campaign {
    settings: Settings,
    level: u32,
    snapshots: Vec<RoundSnapshot>,
    state: CampaignState,
}

impl Campaign {
    pub fn new(settings: Settings) -> Self {
        let snapshots = vec![RoundSnapshot::fresh(); settings.mode.sides()];
        Self {
            settings,
            level: 1,
            snapshots,
            state: CampaignState::Playing,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn state(&self) -> CampaignState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state != CampaignState::Playing
    }

    /// Each side's tallies as of the last finished round
    pub fn snapshots(&self) -> &[RoundSnapshot] {
        &self.snapshots
    }

    /// Per side: whether it starts the current level with a bonus life.
    /// Every third level grants one to each side still in play and short of
    /// the maximum.
    pub fn bonus_lives(&self) -> Vec<bool> {
        let bonus_level = self.level % EXTRA_LIFE_FREQUENCY == 0;
        self.snapshots
            .iter()
            .map(|s| bonus_level && s.lives > 0 && s.lives < MAX_LIVES)
            .collect()
    }

    /// Build the round for the current level
    pub fn start_round<C: Clock>(&self, clock: C) -> Round<C> {
        Round::seeded(
            &self.settings,
            self.level,
            &self.snapshots,
            &self.bonus_lives(),
            clock,
        )
    }

    /// Record a finished round and move on
    pub fn finish_round(&mut self, outcome: &RoundOutcome) -> CampaignState {
        self.snapshots = outcome.snapshots.clone();
        let all_dead = self.snapshots.iter().all(|s| s.lives == 0);

        self.state = match outcome.end {
            RoundEnd::Quit => CampaignState::GameOver,
            _ if all_dead => CampaignState::GameOver,
            RoundEnd::Cleared if self.level >= NUM_LEVELS => CampaignState::Completed,
            RoundEnd::Cleared => {
                self.level += 1;
                CampaignState::Playing
            }
            RoundEnd::Defeated => CampaignState::GameOver,
        };

        match self.state {
            CampaignState::Playing => log::info!("Advancing to level {}", self.level),
            CampaignState::GameOver => log::info!("Game over at level {}", self.level),
            CampaignState::Completed => log::info!("All {NUM_LEVELS} levels cleared"),
        }
        self.state
    }
}
