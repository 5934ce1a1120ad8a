//! Invaders - a formation shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic frame simulation (cooldowns, bullets, formation, collisions)
//! - `settings`: Player mode, difficulty and level tuning
//! - `campaign`: Level-to-level progression
//! - `highscores`: Round results and the high score table

pub mod campaign;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use campaign::Campaign;
pub use error::ConfigError;
pub use highscores::HighScores;
pub use settings::{Difficulty, LevelSettings, PlayerMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Target frame rate; one simulation update per rendered frame
    pub const FPS: u32 = 60;
    /// Nominal frame length in milliseconds
    pub const FRAME_MS: u64 = 1000 / FPS as u64;
    /// Largest clock delta accepted in one frame (stalls are clamped to this)
    pub const MAX_FRAME_DELTA_MS: u64 = 250;

    /// Playfield dimensions
    pub const FIELD_WIDTH: i32 = 448;
    pub const FIELD_HEIGHT: i32 = 520;
    /// Top HUD band; bullets above it leave the play area
    pub const SEPARATION_LINE_HEIGHT: i32 = 40;

    /// Player ship
    pub const SHIP_WIDTH: i32 = 26;
    pub const SHIP_HEIGHT: i32 = 16;
    pub const SHIP_SPEED: i32 = 2;
    pub const SHIP_SHOOTING_INTERVAL_MS: u64 = 750;
    pub const SHIP_DESTRUCTION_MS: u64 = 1000;
    /// Distance from the bottom edge to the ship's top
    pub const SHIP_BOTTOM_OFFSET: i32 = 30;
    /// Horizontal offset of each ship from center in two-player mode
    pub const SHIP_PAIR_OFFSET: i32 = 15;

    /// Bullets (negative speed travels up)
    pub const BULLET_WIDTH: i32 = 6;
    pub const BULLET_HEIGHT: i32 = 10;
    pub const PLAYER_BULLET_SPEED: i32 = -6;
    pub const ENEMY_BULLET_SPEED: i32 = 4;
    /// Live bullet cap per owner (each player, and the formation)
    pub const MAX_LIVE_BULLETS: usize = 32;

    /// Formation layout
    pub const ENEMY_WIDTH: i32 = 24;
    pub const ENEMY_HEIGHT: i32 = 16;
    pub const FORMATION_INIT_X: i32 = 20;
    pub const FORMATION_INIT_Y: i32 = 100;
    pub const FORMATION_SPACING: i32 = 40;
    /// Percent of rows (from the top) holding class C and class B enemies
    pub const PROPORTION_C_PCT: u32 = 20;
    pub const PROPORTION_B_PCT: u32 = 40;
    /// Formation step sizes
    pub const FORMATION_X_STEP: i32 = 8;
    pub const FORMATION_Y_STEP: i32 = 20;
    pub const FORMATION_SIDE_MARGIN: i32 = 20;
    pub const FORMATION_BOTTOM_MARGIN: i32 = 80;
    /// Floor for the movement interval in frames
    pub const FORMATION_MIN_INTERVAL: u32 = 10;
    /// Shooting interval variance as a fraction of the base interval
    pub const FORMATION_SHOOTING_VARIANCE: f64 = 0.2;

    /// Bonus (special) ship
    pub const SPECIAL_WIDTH: i32 = 32;
    pub const SPECIAL_HEIGHT: i32 = 14;
    pub const SPECIAL_START_X: i32 = -SPECIAL_WIDTH;
    pub const SPECIAL_Y: i32 = 60;
    pub const SPECIAL_SPEED: i32 = 2;
    pub const SPECIAL_POINTS: u32 = 100;
    pub const SPECIAL_INTERVAL_MS: u64 = 20_000;
    pub const SPECIAL_VARIANCE_MS: u64 = 10_000;
    pub const SPECIAL_EXPLOSION_MS: u64 = 500;

    /// Round timing
    pub const INPUT_DELAY_MS: u64 = 6000;
    pub const PAUSE_DEBOUNCE_MS: u64 = 300;
    pub const LEVEL_END_MS: u64 = 1500;
    /// Points per life left beyond the first when a round ends
    pub const LIFE_SCORE: u32 = 100;

    /// Progression
    pub const MAX_LIVES: u32 = 3;
    pub const NUM_LEVELS: u32 = 7;
    pub const EXTRA_LIFE_FREQUENCY: u32 = 3;
}
