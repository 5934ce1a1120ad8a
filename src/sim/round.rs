//! Round controller
//!
//! Owns everything that lives for one level: ships, formation, bonus ship,
//! the bullet pool and per-side tallies. One [`Round::update`] call is one
//! frame, in a fixed order:
//!
//! 1. Pause and force-quit input (debounced)
//! 2. Ship movement and fire, once the countdown is over and the level is not finished
//! 3. Bonus ship, ships, formation movement, formation fire
//! 4. Bullets move
//! 5. Collisions are resolved and applied
//! 6. Bullets that left the play area are recycled
//! 7. Lives are clamped and the end condition checked
//!
//! Pausing freezes steps 2 to 7; the pause debounce keeps running.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::bonus::BonusShip;
use super::clock::{Clock, Timeline};
use super::collision::{self, Target};
use super::cooldown::Cooldown;
use super::entity::Side;
use super::formation::Formation;
use super::input::{InputSource, Intent};
use super::pool::{BulletPool, LiveBullets};
use super::ship::Ship;
use super::state::{RoundEnd, RoundOutcome, RoundSnapshot, SideState};
use super::view::{EntityView, FrameView, Renderer, SideView};
use crate::consts::*;
use crate::settings::Settings;

/// Result of one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundStatus {
    Running,
    Finished(RoundOutcome),
}

/// One level being played
pub struct Round<C: Clock, R: Rng = Pcg32> {
    level: u32,
    field: IVec2,
    clock: C,
    rng: R,
    timeline: Timeline,

    pool: BulletPool,
    live: LiveBullets,
    ships: Vec<Ship>,
    formation: Formation,
    bonus: BonusShip,
    sides: Vec<SideState>,

    input_delay: Cooldown,
    pause_debounce: Cooldown,
    level_end: Cooldown,

    paused: bool,
    quit: bool,
    level_finished: bool,
    outcome: Option<RoundOutcome>,
}

impl<C: Clock> Round<C, Pcg32> {
    /// Round with its random source seeded from the settings and level
    pub fn seeded(
        settings: &Settings,
        level: u32,
        snapshots: &[RoundSnapshot],
        bonus_lives: &[bool],
        clock: C,
    ) -> Self {
        let rng = Pcg32::seed_from_u64(settings.seed.wrapping_add(level as u64));
        Self::new(settings, level, snapshots, bonus_lives, clock, rng)
    }
}

impl<C: Clock, R: Rng> Round<C, R> {
    /// Start `level`, carrying each side's tallies from `snapshots` (fresh
    /// state for sides with no snapshot). `bonus_lives[i]` grants side `i` one
    /// extra life; in two-player mode a side with no lives left gets nothing.
    pub fn new(
        settings: &Settings,
        level: u32,
        snapshots: &[RoundSnapshot],
        bonus_lives: &[bool],
        clock: C,
        mut rng: R,
    ) -> Self {
        let field = settings.field();
        let side_count = settings.mode.sides();

        let mut sides: Vec<SideState> = (0..side_count)
            .map(|i| SideState::from_snapshot(&snapshots.get(i).copied().unwrap_or_default()))
            .collect();
        for (side, &bonus) in sides.iter_mut().zip(bonus_lives) {
            if bonus && (side_count == 1 || side.is_alive()) {
                side.lives += 1;
            }
        }

        let mut timeline = Timeline::new(settings.max_frame_delta_ms);
        let now = timeline.advance(clock.now_ms());

        let mut input_delay = Cooldown::fixed(settings.input_delay_ms);
        input_delay.reset(now, &mut rng);
        let mut bonus = BonusShip::new();
        bonus.arm(now, &mut rng);

        log::info!(
            "Starting level {level} ({}, {})",
            settings.mode.as_str(),
            settings.difficulty.as_str()
        );

        Self {
            level,
            field,
            clock,
            rng,
            timeline,
            pool: BulletPool::new(),
            live: LiveBullets::new(settings.max_live_bullets),
            ships: Ship::spawn_line(side_count, field),
            formation: Formation::new(&settings.level(level), field),
            bonus,
            sides,
            input_delay,
            pause_debounce: Cooldown::fixed(PAUSE_DEBOUNCE_MS),
            level_end: Cooldown::fixed(LEVEL_END_MS),
            paused: false,
            quit: false,
            level_finished: false,
            outcome: None,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn sides(&self) -> &[SideState] {
        &self.sides
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn bullets(&self) -> &LiveBullets {
        &self.live
    }

    pub fn pool(&self) -> &BulletPool {
        &self.pool
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the end condition has been met (the round may still be in its level-end delay)
    pub fn is_level_finished(&self) -> bool {
        self.level_finished
    }

    /// Simulation time of the last frame
    pub fn now(&self) -> u64 {
        self.timeline.now()
    }

    /// Run one frame
    pub fn update(&mut self, input: &impl InputSource) -> RoundStatus {
        if let Some(outcome) = &self.outcome {
            return RoundStatus::Finished(outcome.clone());
        }
        let now = self.timeline.advance(self.clock.now_ms());

        self.handle_pause(input, now);
        if self.paused {
            return RoundStatus::Running;
        }

        if self.input_delay.is_finished(now) && !self.level_finished {
            self.handle_ships(input, now);
            self.bonus.update(now, &mut self.rng, self.field.x);
        }

        for ship in &mut self.ships {
            if self.sides[ship.side().index()].is_alive() {
                ship.update(now);
            }
        }

        if self.input_delay.is_finished(now) && !self.level_finished {
            self.formation.update(now, &mut self.rng);
            self.formation
                .shoot(now, &mut self.rng, &mut self.pool, &mut self.live);
        }

        self.live.advance();
        self.apply_collisions(now);

        let gone = self
            .live
            .take_out_of_bounds(SEPARATION_LINE_HEIGHT, self.field.y);
        self.pool.recycle(gone);

        for side in &mut self.sides {
            side.lives = side.lives.max(0);
        }

        self.check_end(now)
    }

    /// Run one frame and hand the result to `renderer`
    pub fn frame(&mut self, input: &impl InputSource, renderer: &mut impl Renderer) -> RoundStatus {
        let status = self.update(input);
        renderer.draw(&self.view());
        status
    }

    fn handle_pause(&mut self, input: &impl InputSource, now: u64) {
        if self.level_finished || !self.pause_debounce.is_finished(now) {
            return;
        }

        if input.is_active(Intent::Pause) {
            self.paused = !self.paused;
            self.pause_debounce.reset(now, &mut self.rng);
            for ship in &mut self.ships {
                ship.reset_shooting(now, &mut self.rng);
            }
            log::info!("Round {}", if self.paused { "paused" } else { "resumed" });
        } else if self.paused && input.is_active(Intent::ForceQuit) {
            self.paused = false;
            self.quit = true;
            self.pause_debounce.reset(now, &mut self.rng);
            for side in &mut self.sides {
                side.lives = 0;
            }
            log::info!("Round abandoned");
        }
    }

    fn handle_ships(&mut self, input: &impl InputSource, now: u64) {
        for ship in &mut self.ships {
            let side = ship.side();
            let state = &mut self.sides[side.index()];
            if !state.is_alive() || ship.is_destroyed() {
                continue;
            }

            let right = input.is_active(Intent::MoveRight(side)) as i32;
            let left = input.is_active(Intent::MoveLeft(side)) as i32;
            if right != left {
                ship.step(right - left, self.field.x);
            }

            if input.is_active(Intent::Fire(side))
                && ship.shoot(now, &mut self.rng, &mut self.pool, &mut self.live)
            {
                state.bullets_shot += 1;
            }
        }
    }

    fn apply_collisions(&mut self, now: u64) {
        let targets: Vec<&Ship> = if self.level_finished {
            Vec::new()
        } else {
            self.ships
                .iter()
                .filter(|s| self.sides[s.side().index()].is_alive())
                .collect()
        };
        let hits = collision::resolve(&self.live, &targets, &self.formation, self.bonus.ship());
        if hits.is_empty() {
            return;
        }

        for side in hits.ship_hits {
            let state = &mut self.sides[side.index()];
            state.hit();
            self.ships[side.index()].destroy(now, &mut self.rng);
            log::info!(
                "Hit on player {:?} ship, {} lives remaining",
                side,
                state.lives.max(0)
            );
        }

        for kill in hits.kills {
            let points = match kill.target {
                Target::Formation(slot) => self.formation.destroy(slot),
                Target::Special => self.bonus.destroy(now, &mut self.rng),
            };
            if let Some(points) = points {
                self.sides[kill.side.index()].award(points);
            }
        }

        let spent = self.live.take(&hits.consumed);
        self.pool.recycle(spent);
    }

    fn check_end(&mut self, now: u64) -> RoundStatus {
        let all_dead = self.sides.iter().all(|s| !s.is_alive());
        if !self.level_finished && (self.formation.is_empty() || all_dead) {
            self.level_finished = true;
            self.level_end.reset(now, &mut self.rng);
        }
        if !self.level_finished || !self.level_end.is_finished(now) {
            return RoundStatus::Running;
        }

        for side in &mut self.sides {
            side.apply_life_score();
        }
        let end = if self.quit {
            RoundEnd::Quit
        } else if self.formation.is_empty() {
            RoundEnd::Cleared
        } else {
            RoundEnd::Defeated
        };
        let snapshots: Vec<RoundSnapshot> =
            self.sides.iter().map(|s| s.snapshot(self.level)).collect();
        for (side, snap) in Side::ALL.iter().zip(&snapshots) {
            log::info!(
                "Level {} {:?}: player {:?} score {}, {} lives, {}/{} hits",
                self.level,
                end,
                side,
                snap.score,
                snap.lives,
                snap.ships_destroyed,
                snap.bullets_shot
            );
        }

        let outcome = RoundOutcome { end, snapshots };
        self.outcome = Some(outcome.clone());
        RoundStatus::Finished(outcome)
    }

    /// Read-only description of the current frame
    pub fn view(&self) -> FrameView {
        let now = self.timeline.now();
        let mut entities: Vec<EntityView> = self.ships.iter().map(|s| (&s.body).into()).collect();
        entities.extend(self.formation.iter().map(|(_, e)| EntityView::from(e)));
        entities.extend(self.bonus.ship().map(EntityView::from));
        entities.extend(self.live.iter().map(|(_, b)| EntityView::from(b)));

        let countdown = (!self.input_delay.is_finished(now))
            .then(|| self.input_delay.remaining(now).div_ceil(1000));

        FrameView {
            level: self.level,
            field: self.field,
            entities,
            sides: self
                .sides
                .iter()
                .map(|s| SideView {
                    score: s.score,
                    lives: s.lives.max(0) as u32,
                })
                .collect(),
            countdown,
            paused: self.paused,
            finished: self.level_finished,
        }
    }
}
