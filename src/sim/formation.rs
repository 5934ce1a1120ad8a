//! Enemy formation
//!
//! A fixed row x column grid that sweeps sideways, drops a row whenever the
//! sweep would leave the field, and speeds up as it thins out. Slots are
//! never renumbered: a destroyed enemy keeps its slot, shows an explosion
//! until the next step, then the slot is cleared for good.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cooldown::Cooldown;
use super::entity::{EnemyClass, Entity, EntityKind};
use super::pool::{BulletPool, LiveBullets, Owner};
use crate::consts::*;
use crate::settings::LevelSettings;

/// Grid coordinate of a formation slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId {
    pub row: usize,
    pub col: usize,
}

/// Externally observed formation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormationState {
    Advancing,
    /// Terminal: every enemy destroyed
    Empty,
}

/// The enemy grid and its movement/shooting state
#[derive(Debug, Clone)]
pub struct Formation {
    rows: usize,
    cols: usize,
    /// Row-major; `None` once a destroyed enemy has been cleared
    slots: Vec<Option<Entity>>,
    /// Enemies not yet destroyed
    live: usize,
    /// +1 sweeping right, -1 sweeping left
    heading: i32,
    base_speed: u32,
    /// Frames since the last step
    frames_since_step: u32,
    shooting: Cooldown,
    field: IVec2,
}

impl Formation {
    pub fn new(level: &LevelSettings, field: IVec2) -> Self {
        let rows = level.formation_height;
        let cols = level.formation_width;
        let mut slots = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            let class = EnemyClass::for_row(row, rows);
            for col in 0..cols {
                let pos = IVec2::new(
                    FORMATION_INIT_X + FORMATION_SPACING * col as i32,
                    FORMATION_INIT_Y + FORMATION_SPACING * row as i32,
                );
                slots.push(Some(Entity::enemy_ship((row * cols + col) as u32, class, pos)));
            }
        }

        let variance = (level.shooting_interval_ms as f64 * FORMATION_SHOOTING_VARIANCE) as u64;
        Self {
            rows,
            cols,
            slots,
            live: rows * cols,
            heading: 1,
            base_speed: level.base_speed,
            frames_since_step: 0,
            shooting: Cooldown::variable(level.shooting_interval_ms, variance),
            field,
        }
    }

    /// Enemies not yet destroyed
    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn state(&self) -> FormationState {
        if self.live == 0 {
            FormationState::Empty
        } else {
            FormationState::Advancing
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state() == FormationState::Empty
    }

    /// +1 when sweeping right, -1 when sweeping left
    pub fn heading(&self) -> i32 {
        self.heading
    }

    #[inline]
    fn index(&self, slot: SlotId) -> Option<usize> {
        (slot.row < self.rows && slot.col < self.cols).then(|| slot.row * self.cols + slot.col)
    }

    pub fn get(&self, slot: SlotId) -> Option<&Entity> {
        self.index(slot).and_then(|i| self.slots[i].as_ref())
    }

    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut Entity> {
        self.index(slot).and_then(|i| self.slots[i].as_mut())
    }

    /// Occupied slots (destroyed-but-visible included), row-major
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Entity)> {
        let cols = self.cols;
        self.slots.iter().enumerate().filter_map(move |(i, slot)| {
            slot.as_ref().map(|e| {
                (
                    SlotId {
                        row: i / cols,
                        col: i % cols,
                    },
                    e,
                )
            })
        })
    }

    /// Frames between steps: shrinks quadratically with the surviving share
    pub fn movement_interval(&self) -> u32 {
        let total = (self.rows * self.cols).max(1) as f64;
        let remaining = self.live as f64 / total;
        (remaining * remaining * self.base_speed as f64) as u32 + FORMATION_MIN_INTERVAL
    }

    /// Per-frame movement. Returns true when the formation stepped this frame.
    pub fn update<R: Rng + ?Sized>(&mut self, now: u64, rng: &mut R) -> bool {
        if !self.shooting.is_armed() {
            self.shooting.reset(now, rng);
        }

        self.frames_since_step += 1;
        if self.frames_since_step < self.movement_interval() {
            return false;
        }
        self.frames_since_step = 0;

        // Explosions last until the next step
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(|e| e.destroyed) {
                *slot = None;
            }
        }

        let Some((left, right, bottom)) = self.live_extent() else {
            return false;
        };

        let dx = self.heading * FORMATION_X_STEP;
        let breach =
            left + dx < FORMATION_SIDE_MARGIN || right + dx > self.field.x - FORMATION_SIDE_MARGIN;

        let (mx, my) = if breach {
            self.heading = -self.heading;
            if bottom + FORMATION_Y_STEP > self.field.y - FORMATION_BOTTOM_MARGIN {
                // Nowhere left to descend: sweep back instead
                (self.heading * FORMATION_X_STEP, 0)
            } else {
                log::debug!("Formation descends to y={}", bottom + FORMATION_Y_STEP);
                (0, FORMATION_Y_STEP)
            }
        } else {
            (dx, 0)
        };

        for enemy in self.slots.iter_mut().flatten() {
            enemy.translate(mx, my);
            if let EntityKind::EnemyShip { alt_frame, .. } = &mut enemy.kind {
                *alt_frame = !*alt_frame;
            }
        }
        true
    }

    /// (left, right, bottom) of the enemies still alive
    fn live_extent(&self) -> Option<(i32, i32, i32)> {
        self.slots
            .iter()
            .flatten()
            .filter(|e| !e.destroyed)
            .fold(None, |acc, e| {
                Some(match acc {
                    None => (e.pos.x, e.right(), e.bottom()),
                    Some((l, r, b)) => (l.min(e.pos.x), r.max(e.right()), b.max(e.bottom())),
                })
            })
    }

    /// The lowest live enemy of every column that still has one
    pub fn shooters(&self) -> Vec<SlotId> {
        (0..self.cols)
            .filter_map(|col| {
                (0..self.rows)
                    .rev()
                    .map(|row| SlotId { row, col })
                    .find(|&slot| self.get(slot).is_some_and(|e| !e.destroyed))
            })
            .collect()
    }

    /// Fire one bullet from a random front-line enemy when the shooting cooldown allows
    pub fn shoot<R: Rng + ?Sized>(
        &mut self,
        now: u64,
        rng: &mut R,
        pool: &mut BulletPool,
        live: &mut LiveBullets,
    ) -> bool {
        if !self.shooting.is_armed() || !self.shooting.is_finished(now) {
            return false;
        }
        let shooters = self.shooters();
        if shooters.is_empty() {
            return false;
        }
        let slot = shooters[rng.random_range(0..shooters.len())];
        self.shooting.reset(now, rng);

        let Some(shooter) = self.get(slot) else {
            return false;
        };
        let origin = IVec2::new(shooter.pos.x + shooter.size.x / 2, shooter.pos.y);
        live.fire(pool, Owner::Formation, origin, ENEMY_BULLET_SPEED)
    }

    /// Destroy the enemy in `slot`. Returns its point value, or `None` if there
    /// was nothing live to destroy.
    pub fn destroy(&mut self, slot: SlotId) -> Option<u32> {
        let enemy = self.get_mut(slot).filter(|e| !e.destroyed)?;
        enemy.destroyed = true;
        let points = enemy.point_value();
        self.live -= 1;
        if self.live == 0 {
            log::info!("Formation destroyed");
        }
        Some(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const FIELD: IVec2 = IVec2::new(FIELD_WIDTH, FIELD_HEIGHT);

    fn level(cols: usize, rows: usize, base_speed: u32) -> LevelSettings {
        LevelSettings {
            formation_width: cols,
            formation_height: rows,
            base_speed,
            shooting_interval_ms: 1000,
        }
    }

    fn run_until_step(formation: &mut Formation, rng: &mut Pcg32) {
        for _ in 0..1000 {
            if formation.update(0, rng) {
                return;
            }
        }
        panic!("formation never stepped");
    }

    #[test]
    fn test_grid_layout_and_classes() {
        let formation = Formation::new(&LevelSettings::for_level(1), FIELD);
        assert_eq!(formation.live_count(), 20);
        let top = formation.get(SlotId { row: 0, col: 0 }).unwrap();
        assert_eq!(top.pos, IVec2::new(20, 100));
        assert_eq!(top.point_value(), 30);
        let bottom = formation.get(SlotId { row: 3, col: 4 }).unwrap();
        assert_eq!(bottom.pos, IVec2::new(180, 220));
        assert_eq!(bottom.point_value(), 10);
        assert_eq!(formation.state(), FormationState::Advancing);
    }

    #[test]
    fn test_interval_shrinks_as_formation_thins() {
        let mut formation = Formation::new(&level(2, 2, 60), FIELD);
        assert_eq!(formation.movement_interval(), 70);
        formation.destroy(SlotId { row: 0, col: 0 });
        formation.destroy(SlotId { row: 0, col: 1 });
        // (1/2)^2 * 60 + 10
        assert_eq!(formation.movement_interval(), 25);
        formation.destroy(SlotId { row: 1, col: 0 });
        formation.destroy(SlotId { row: 1, col: 1 });
        assert_eq!(formation.movement_interval(), FORMATION_MIN_INTERVAL);
    }

    #[test]
    fn test_steps_sideways_on_interval() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut formation = Formation::new(&level(2, 1, 0), FIELD);
        for _ in 0..FORMATION_MIN_INTERVAL - 1 {
            assert!(!formation.update(0, &mut rng));
        }
        assert!(formation.update(0, &mut rng));
        let first = formation.get(SlotId { row: 0, col: 0 }).unwrap();
        assert_eq!(first.pos.x, FORMATION_INIT_X + FORMATION_X_STEP);
        assert!(matches!(first.kind, EntityKind::EnemyShip { alt_frame: true, .. }));
    }

    #[test]
    fn test_breach_descends_once_and_reverses() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut formation = Formation::new(&level(3, 1, 0), FIELD);
        let start_y = FORMATION_INIT_Y;

        // Sweep right until the first descent
        let mut steps = 0;
        while formation.heading() == 1 {
            run_until_step(&mut formation, &mut rng);
            steps += 1;
            assert!(steps < 100);
        }
        for (_, enemy) in formation.iter() {
            assert_eq!(enemy.pos.y, start_y + FORMATION_Y_STEP);
            assert!(enemy.right() <= FIELD_WIDTH - FORMATION_SIDE_MARGIN);
        }

        // Next step moves left without descending again
        run_until_step(&mut formation, &mut rng);
        for (_, enemy) in formation.iter() {
            assert_eq!(enemy.pos.y, start_y + FORMATION_Y_STEP);
        }
        assert_eq!(formation.heading(), -1);
    }

    #[test]
    fn test_extent_ignores_destroyed_enemies() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut formation = Formation::new(&level(3, 1, 0), FIELD);
        // Without the right-most column the sweep goes further before turning
        formation.destroy(SlotId { row: 0, col: 2 });
        while formation.heading() == 1 {
            run_until_step(&mut formation, &mut rng);
        }
        let right = formation
            .iter()
            .filter(|(_, e)| !e.destroyed)
            .map(|(_, e)| e.right())
            .max()
            .unwrap();
        assert!(right > FIELD_WIDTH - FORMATION_SIDE_MARGIN - FORMATION_X_STEP - FORMATION_SPACING);
    }

    #[test]
    fn test_explosion_cleared_on_next_step() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut formation = Formation::new(&level(2, 1, 0), FIELD);
        let slot = SlotId { row: 0, col: 1 };
        // Single row formations are all top-class
        assert_eq!(formation.destroy(slot), Some(30));
        assert!(formation.get(slot).is_some_and(|e| e.destroyed));
        // Already destroyed: no second award
        assert_eq!(formation.destroy(slot), None);

        run_until_step(&mut formation, &mut rng);
        assert!(formation.get(slot).is_none());
        assert_eq!(formation.destroy(slot), None);
    }

    #[test]
    fn test_shooters_are_front_row_per_column() {
        let mut formation = Formation::new(&level(3, 3, 0), FIELD);
        assert_eq!(
            formation.shooters(),
            vec![
                SlotId { row: 2, col: 0 },
                SlotId { row: 2, col: 1 },
                SlotId { row: 2, col: 2 },
            ]
        );
        formation.destroy(SlotId { row: 2, col: 1 });
        formation.destroy(SlotId { row: 0, col: 2 });
        formation.destroy(SlotId { row: 1, col: 2 });
        formation.destroy(SlotId { row: 2, col: 2 });
        assert_eq!(
            formation.shooters(),
            vec![SlotId { row: 2, col: 0 }, SlotId { row: 1, col: 1 }]
        );
    }

    #[test]
    fn test_shoot_waits_for_cooldown() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut pool = BulletPool::new();
        let mut live = LiveBullets::new(MAX_LIVE_BULLETS);
        let mut formation = Formation::new(&level(4, 2, 0), FIELD);

        // Not armed before the first update
        assert!(!formation.shoot(0, &mut rng, &mut pool, &mut live));
        formation.update(0, &mut rng);
        assert!(!formation.shoot(0, &mut rng, &mut pool, &mut live));
        // 1000ms +-20%
        assert!(formation.shoot(1200, &mut rng, &mut pool, &mut live));

        let bullets = live.get(Owner::Formation);
        assert_eq!(bullets.len(), 1);
        assert!(bullets[0].is_downward());
        let shooters = formation.shooters();
        let fired_from_front = shooters.iter().any(|&slot| {
            let e = formation.get(slot).unwrap();
            e.pos.x + e.size.x / 2 - BULLET_WIDTH / 2 == bullets[0].pos.x
        });
        assert!(fired_from_front);
    }

    #[test]
    fn test_empty_formation_does_not_shoot() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut pool = BulletPool::new();
        let mut live = LiveBullets::new(MAX_LIVE_BULLETS);
        let mut formation = Formation::new(&level(1, 1, 0), FIELD);
        formation.update(0, &mut rng);
        formation.destroy(SlotId { row: 0, col: 0 });
        assert!(formation.is_empty());
        assert!(!formation.shoot(10_000, &mut rng, &mut pool, &mut live));
    }

    proptest! {
        #[test]
        fn prop_live_count_never_increases(
            seed in any::<u64>(),
            kills in proptest::collection::vec((0usize..4, 0usize..5, any::<bool>()), 0..200),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut formation = Formation::new(&level(5, 4, 20), FIELD);
            let mut last = formation.live_count();
            for (row, col, kill) in kills {
                if kill {
                    formation.destroy(SlotId { row, col });
                }
                formation.update(0, &mut rng);
                prop_assert!(formation.live_count() <= last);
                last = formation.live_count();
            }
        }
    }
}
