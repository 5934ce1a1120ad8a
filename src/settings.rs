//! Game settings and level tuning
//!
//! Loaded by the host from JSON; every field has a default so a partial
//! document only overrides what it names.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Number of competing players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlayerMode {
    #[default]
    Single,
    Two,
}

impl PlayerMode {
    pub fn sides(&self) -> usize {
        match self {
            PlayerMode::Single => 1,
            PlayerMode::Two => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerMode::Single => "1P",
            PlayerMode::Two => "2P",
        }
    }
}

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Extreme,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Extreme => "Extreme",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "extreme" => Some(Difficulty::Extreme),
            _ => None,
        }
    }

    /// Index used to key per-mode high score tables
    pub fn index(&self) -> u32 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 1,
            Difficulty::Hard => 2,
            Difficulty::Extreme => 3,
        }
    }

    /// Formation shooting interval scale, percent
    fn shooting_pct(&self) -> u64 {
        match self {
            Difficulty::Easy => 150,
            Difficulty::Normal => 100,
            Difficulty::Hard => 75,
            Difficulty::Extreme => 50,
        }
    }

    /// Formation movement base speed scale, percent (lower moves sooner)
    fn speed_pct(&self) -> u32 {
        match self {
            Difficulty::Easy => 125,
            Difficulty::Normal => 100,
            Difficulty::Hard => 75,
            Difficulty::Extreme => 50,
        }
    }
}

/// Per-level formation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSettings {
    /// Columns
    pub formation_width: usize,
    /// Rows
    pub formation_height: usize,
    /// Extra movement interval (frames) at full strength
    pub base_speed: u32,
    /// Mean time between formation shots
    pub shooting_interval_ms: u64,
}

impl LevelSettings {
    /// The seven-level table; levels past the end reuse the last entry
    pub fn for_level(level: u32) -> Self {
        let (formation_width, formation_height, base_speed, shooting_interval_ms) = match level {
            0 | 1 => (5, 4, 60, 2000),
            2 => (5, 5, 50, 2500),
            3 => (6, 5, 40, 1500),
            4 => (6, 6, 30, 1500),
            5 => (7, 6, 20, 1000),
            6 => (7, 7, 10, 1000),
            _ => (8, 7, 2, 500),
        };
        Self {
            formation_width,
            formation_height,
            base_speed,
            shooting_interval_ms,
        }
    }

    pub fn scaled(self, difficulty: Difficulty) -> Self {
        Self {
            base_speed: self.base_speed * difficulty.speed_pct() / 100,
            shooting_interval_ms: self.shooting_interval_ms * difficulty.shooting_pct() / 100,
            ..self
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: PlayerMode,
    pub difficulty: Difficulty,
    /// Seed for every random draw in a run
    pub seed: u64,

    // === Playfield ===
    pub field_width: i32,
    pub field_height: i32,

    // === Limits ===
    /// Live bullet cap per owner
    pub max_live_bullets: usize,
    /// Largest clock delta accepted per frame
    pub max_frame_delta_ms: u64,

    // === Round timing ===
    /// Countdown before gameplay input is accepted
    pub input_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: PlayerMode::Single,
            difficulty: Difficulty::Normal,
            seed: 0x1D_EA5E,

            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            max_live_bullets: MAX_LIVE_BULLETS,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,

            input_delay_ms: INPUT_DELAY_MS,
        }
    }
}

impl Settings {
    /// Parse and validate a JSON settings document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Widest formation plus margins must fit
        let widest = LevelSettings::for_level(NUM_LEVELS);
        let formation_span = (widest.formation_width as i32 - 1) * FORMATION_SPACING + ENEMY_WIDTH;
        let min_width = formation_span + 2 * FORMATION_SIDE_MARGIN + FORMATION_X_STEP;
        if self.field_width < min_width {
            return Err(ConfigError::InvalidValue {
                field: "field_width",
                reason: format!("{} is narrower than the minimum {min_width}", self.field_width),
            });
        }
        let min_height = FORMATION_INIT_Y + FORMATION_BOTTOM_MARGIN + SHIP_BOTTOM_OFFSET;
        if self.field_height < min_height {
            return Err(ConfigError::InvalidValue {
                field: "field_height",
                reason: format!("{} is shorter than the minimum {min_height}", self.field_height),
            });
        }
        if self.max_live_bullets == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_live_bullets",
                reason: "must allow at least one bullet".to_string(),
            });
        }
        if self.max_frame_delta_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_frame_delta_ms",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn field(&self) -> IVec2 {
        IVec2::new(self.field_width, self.field_height)
    }

    /// Formation parameters for a level under the current difficulty
    pub fn level(&self, level: u32) -> LevelSettings {
        LevelSettings::for_level(level).scaled(self.difficulty)
    }
}
