//! Special bonus ship
//!
//! Appears on a randomized interval, crosses the top of the field and leaves
//! either through the right edge or as a short-lived explosion.

use rand::Rng;

use super::cooldown::Cooldown;
use super::entity::Entity;
use crate::consts::*;

/// Id reserved for the bonus ship, clear of the formation's slot ids
const SPECIAL_ID: u32 = u32::MAX;

#[derive(Debug, Clone)]
pub struct BonusShip {
    ship: Option<Entity>,
    spawn: Cooldown,
    explosion: Cooldown,
}

impl Default for BonusShip {
    fn default() -> Self {
        Self::new()
    }
}

impl BonusShip {
    pub fn new() -> Self {
        Self {
            ship: None,
            spawn: Cooldown::variable(SPECIAL_INTERVAL_MS, SPECIAL_VARIANCE_MS),
            explosion: Cooldown::fixed(SPECIAL_EXPLOSION_MS),
        }
    }

    /// Start the spawn timer; called once when gameplay begins
    pub fn arm<R: Rng + ?Sized>(&mut self, now: u64, rng: &mut R) {
        self.spawn.reset(now, rng);
    }

    pub fn ship(&self) -> Option<&Entity> {
        self.ship.as_ref()
    }

    /// Per-frame lifecycle step. The spawn interval runs from one appearance
    /// to the next, so crossing time does not stretch the gap.
    pub fn update<R: Rng + ?Sized>(&mut self, now: u64, rng: &mut R, field_width: i32) {
        match &mut self.ship {
            Some(ship) if ship.destroyed => {
                if self.explosion.is_finished(now) {
                    self.ship = None;
                }
            }
            Some(ship) => {
                ship.translate(ship.speed, 0);
                if ship.pos.x > field_width {
                    log::info!("The special ship has escaped");
                    self.ship = None;
                }
            }
            None => {
                if self.spawn.is_armed() && self.spawn.is_finished(now) {
                    log::info!("A special ship appears");
                    self.ship = Some(Entity::special_ship(SPECIAL_ID));
                    self.spawn.reset(now, rng);
                }
            }
        }
    }

    /// Blow up the bonus ship. Returns its point value if it was live.
    pub fn destroy<R: Rng + ?Sized>(&mut self, now: u64, rng: &mut R) -> Option<u32> {
        let ship = self.ship.as_mut().filter(|s| !s.destroyed)?;
        ship.destroyed = true;
        self.explosion.reset(now, rng);
        log::info!("The special ship has been destroyed");
        Some(ship.point_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawned(rng: &mut Pcg32) -> BonusShip {
        let mut bonus = BonusShip::new();
        bonus.arm(0, rng);
        bonus.update(SPECIAL_INTERVAL_MS + SPECIAL_VARIANCE_MS, rng, FIELD_WIDTH);
        bonus
    }

    #[test]
    fn test_unarmed_never_spawns() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut bonus = BonusShip::new();
        bonus.update(1_000_000, &mut rng, FIELD_WIDTH);
        assert!(bonus.ship().is_none());
    }

    #[test]
    fn test_spawns_within_interval_bounds() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut bonus = BonusShip::new();
        bonus.arm(0, &mut rng);
        bonus.update(SPECIAL_INTERVAL_MS - SPECIAL_VARIANCE_MS - 1, &mut rng, FIELD_WIDTH);
        assert!(bonus.ship().is_none());

        let bonus = spawned(&mut rng);
        let ship = bonus.ship().unwrap();
        assert_eq!(ship.pos.x, SPECIAL_START_X);
        assert_eq!(ship.pos.y, SPECIAL_Y);
    }

    #[test]
    fn test_crosses_and_escapes() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut bonus = spawned(&mut rng);
        let now = SPECIAL_INTERVAL_MS + SPECIAL_VARIANCE_MS;
        let mut frames = 0;
        while bonus.ship().is_some() {
            bonus.update(now, &mut rng, FIELD_WIDTH);
            frames += 1;
            assert!(frames < 1000);
        }
        assert!(frames > (FIELD_WIDTH - SPECIAL_START_X) / SPECIAL_SPEED);
        // Respawn timer restarted on appearance, not immediately finished
        bonus.update(now, &mut rng, FIELD_WIDTH);
        assert!(bonus.ship().is_none());
    }

    #[test]
    fn test_spawn_interval_runs_from_appearance() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut bonus = spawned(&mut rng);
        let appeared = SPECIAL_INTERVAL_MS + SPECIAL_VARIANCE_MS;
        assert_eq!(bonus.spawn.remaining(appeared), bonus.spawn.duration());
        let next = appeared + bonus.spawn.duration();

        // Cross the field at frame pace
        let mut now = appeared;
        while bonus.ship().is_some() {
            now += FRAME_MS;
            bonus.update(now, &mut rng, FIELD_WIDTH);
        }
        assert!(now < next);

        bonus.update(next - 1, &mut rng, FIELD_WIDTH);
        assert!(bonus.ship().is_none());
        bonus.update(next, &mut rng, FIELD_WIDTH);
        assert!(bonus.ship().is_some());
    }

    #[test]
    fn test_explosion_shows_then_clears() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut bonus = spawned(&mut rng);
        let now = 40_000;
        assert_eq!(bonus.destroy(now, &mut rng), Some(SPECIAL_POINTS));
        assert_eq!(bonus.destroy(now, &mut rng), None);

        let x = bonus.ship().unwrap().pos.x;
        bonus.update(now + SPECIAL_EXPLOSION_MS - 1, &mut rng, FIELD_WIDTH);
        let ship = bonus.ship().unwrap();
        assert!(ship.destroyed);
        // Explosions do not drift
        assert_eq!(ship.pos.x, x);

        bonus.update(now + SPECIAL_EXPLOSION_MS, &mut rng, FIELD_WIDTH);
        assert!(bonus.ship().is_none());
    }
}
