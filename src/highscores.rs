//! High score table
//!
//! Pure data: the persistence collaborator stores the JSON from
//! [`HighScores::to_json`] and hands it back through [`HighScores::from_json`].

use serde::{Deserialize, Serialize};

use crate::sim::RoundSnapshot;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 7;

/// Length of a player's name tag
pub const NAME_LENGTH: usize = 3;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Upper-case name tag
    pub name: String,
    pub score: u32,
    /// Last level reached
    pub level: u32,
}

/// High score leaderboard, best first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a nonzero `score` would earn one of the seven name tags
    pub fn qualifies(&self, score: u32) -> bool {
        self.potential_rank(score).is_some()
    }

    /// Place (from 1) that `score` would take below any equal entries, or
    /// `None` when it is zero or the full table already holds seven that are
    /// at least as good
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let place = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        (place < MAX_HIGH_SCORES).then_some(place + 1)
    }

    /// Add a finished run. Ties rank below existing entries.
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_score(&mut self, name: &str, snapshot: &RoundSnapshot) -> Option<usize> {
        let rank = self.potential_rank(snapshot.score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                name: normalize_name(name),
                score: snapshot.score,
                level: snapshot.level,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("New high score {} at rank {rank}", snapshot.score);
        Some(rank)
    }

    /// Add every side's result of a game. Results go in best first, so no
    /// insert pushes down a rank already handed out.
    pub fn add_results(&mut self, results: &[(&str, RoundSnapshot)]) -> Vec<Option<usize>> {
        let mut order: Vec<usize> = (0..results.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(results[i].1.score));

        let mut ranks = vec![None; results.len()];
        for i in order {
            let (name, snapshot) = &results[i];
            ranks[i] = self.add_score(name, snapshot);
        }
        ranks
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        scores.entries.sort_by_key(|e| std::cmp::Reverse(e.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Upper-case, padded or cut to [`NAME_LENGTH`] characters
fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .chain(std::iter::repeat('_'))
        .take(NAME_LENGTH)
        .collect()
}
