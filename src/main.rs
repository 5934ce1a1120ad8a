//! Invaders headless runner
//!
//! Plays a full campaign with a simple autopilot on a manual clock, one
//! frame per step, and prints each side's results. `RUST_LOG=info` shows the
//! round events.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use invaders::consts::*;
use invaders::sim::{
    FrameView, Intent, IntentSet, ManualClock, Renderer, RoundStatus, Side, Sprite,
};
use invaders::{Campaign, HighScores, PlayerMode, Settings};

#[derive(Parser, Debug)]
#[command(name = "invaders", about = "Run a headless invaders campaign")]
struct Cli {
    /// JSON settings file; missing fields keep their defaults
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Override the settings seed
    #[arg(long)]
    seed: Option<u64>,
    /// Play with two autopilot ships
    #[arg(long)]
    two_player: bool,
    /// Give up on a round after this many frames
    #[arg(long, default_value_t = 200_000)]
    max_frames: u64,
    /// High score table to update (created if missing)
    #[arg(long)]
    scores: Option<PathBuf>,
}

/// Steers each live ship under the nearest enemy and fires when lined up
struct Autopilot;

impl Autopilot {
    fn next_input(&self, frame: &FrameView) -> IntentSet {
        let targets: Vec<i32> = frame
            .entities
            .iter()
            .filter(|e| {
                !e.destroyed
                    && matches!(
                        e.sprite,
                        Sprite::EnemyA { .. }
                            | Sprite::EnemyB { .. }
                            | Sprite::EnemyC { .. }
                            | Sprite::Special
                    )
            })
            .map(|e| e.pos.x + e.size.x / 2)
            .collect();

        let mut input = IntentSet::new();
        for ship in &frame.entities {
            let Sprite::Ship(side) = ship.sprite else {
                continue;
            };
            let center = ship.pos.x + ship.size.x / 2;
            let Some(&target) = targets.iter().min_by_key(|&&x| (x - center).abs()) else {
                continue;
            };
            if target > center + SHIP_SPEED {
                input.press(Intent::MoveRight(side));
            } else if target < center - SHIP_SPEED {
                input.press(Intent::MoveLeft(side));
            }
            if (target - center).abs() <= ENEMY_WIDTH / 2 {
                input.press(Intent::Fire(side));
            }
        }
        input
    }
}

/// Logs a HUD line once per second of play
#[derive(Default)]
struct HudLog {
    frames: u64,
}

impl Renderer for HudLog {
    fn draw(&mut self, frame: &FrameView) {
        self.frames += 1;
        if self.frames % FPS as u64 != 0 {
            return;
        }
        let hud: Vec<String> = frame
            .sides
            .iter()
            .map(|s| format!("{} pts/{} lives", s.score, s.lives))
            .collect();
        log::debug!(
            "level {} | {} | {} entities{}{}",
            frame.level,
            hud.join(" | "),
            frame.entities.len(),
            frame
                .countdown
                .map(|s| format!(" | starts in {s}"))
                .unwrap_or_default(),
            if frame.paused { " | paused" } else { "" }
        );
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.settings {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed reading {}", path.display()))?;
            Settings::from_json(&json)
                .with_context(|| format!("invalid settings {}", path.display()))?
        }
        None => Settings::default(),
    };
    if let Some(seed) = cli.seed {
        settings.seed = seed;
    }
    if cli.two_player {
        settings.mode = PlayerMode::Two;
    }
    Ok(settings)
}

fn update_scores(path: &Path, campaign: &Campaign) -> Result<()> {
    let mut scores = if path.exists() {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        HighScores::from_json(&json)
            .with_context(|| format!("invalid high score table {}", path.display()))?
    } else {
        HighScores::new()
    };

    let names = ["P1", "P2"];
    let results: Vec<(&str, _)> = names
        .iter()
        .copied()
        .zip(campaign.snapshots().iter().copied())
        .collect();
    for ((name, _), rank) in results.iter().zip(scores.add_results(&results)) {
        if let Some(rank) = rank {
            println!("{name} placed #{rank} on the high score table");
        }
    }

    let json = scores.to_json().context("failed encoding high scores")?;
    fs::write(path, json).with_context(|| format!("failed writing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    log::info!(
        "Invaders (headless) starting: {} {}, seed {:#x}",
        settings.mode.as_str(),
        settings.difficulty.as_str(),
        settings.seed
    );

    let clock = ManualClock::new(0);
    let mut campaign = Campaign::new(settings);
    let pilot = Autopilot;
    let mut hud = HudLog::default();

    while !campaign.is_over() {
        let mut round = campaign.start_round(clock.clone());
        let mut frames = 0;
        let outcome = loop {
            if frames >= cli.max_frames {
                bail!(
                    "level {} did not finish within {} frames",
                    campaign.level(),
                    cli.max_frames
                );
            }
            clock.advance(FRAME_MS);
            frames += 1;
            let input = pilot.next_input(&round.view());
            if let RoundStatus::Finished(outcome) = round.frame(&input, &mut hud) {
                break outcome;
            }
        };
        println!(
            "Level {} {:?} after {:.1}s",
            campaign.level(),
            outcome.end,
            (frames * FRAME_MS) as f64 / 1000.0
        );
        campaign.finish_round(&outcome);
    }

    println!("Campaign {:?} at level {}", campaign.state(), campaign.level());
    for (side, snap) in Side::ALL.iter().zip(campaign.snapshots()) {
        println!(
            "  {:?}: {} points, {} lives, {}/{} hits ({:.1}% accuracy)",
            side,
            snap.score,
            snap.lives,
            snap.ships_destroyed,
            snap.bullets_shot,
            snap.accuracy() * 100.0
        );
    }

    if let Some(path) = &cli.scores {
        update_scores(path, &campaign)?;
    }
    Ok(())
}
