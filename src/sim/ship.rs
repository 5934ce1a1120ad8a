//! Player ships

use glam::IVec2;
use rand::Rng;

use super::cooldown::Cooldown;
use super::entity::{Entity, Side};
use super::pool::{BulletPool, LiveBullets, Owner};
use crate::consts::*;

/// A player-controlled ship
#[derive(Debug, Clone)]
pub struct Ship {
    pub body: Entity,
    side: Side,
    shooting: Cooldown,
    destruction: Cooldown,
}

impl Ship {
    pub fn new(side: Side, pos: IVec2) -> Self {
        Self {
            body: Entity::player_ship(side, pos),
            side,
            shooting: Cooldown::fixed(SHIP_SHOOTING_INTERVAL_MS),
            destruction: Cooldown::fixed(SHIP_DESTRUCTION_MS),
        }
    }

    /// Ships for `sides` players, parked along the bottom of the field
    pub fn spawn_line(sides: usize, field: IVec2) -> Vec<Ship> {
        let y = field.y - SHIP_BOTTOM_OFFSET;
        let center = field.x / 2;
        match sides {
            1 => vec![Ship::new(Side::One, IVec2::new(center, y))],
            _ => vec![
                Ship::new(Side::One, IVec2::new(center - SHIP_PAIR_OFFSET, y)),
                Ship::new(Side::Two, IVec2::new(center + SHIP_PAIR_OFFSET, y)),
            ],
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_destroyed(&self) -> bool {
        self.body.destroyed
    }

    /// Step horizontally by `direction * speed`, clamped to `[0, field_width - width]`
    pub fn step(&mut self, direction: i32, field_width: i32) {
        let max_x = (field_width - self.body.size.x).max(0);
        self.body.pos.x = (self.body.pos.x + direction * self.body.speed).clamp(0, max_x);
    }

    /// Fire upward if the shooting cooldown allows. Returns whether a bullet entered play.
    pub fn shoot<R: Rng + ?Sized>(
        &mut self,
        now: u64,
        rng: &mut R,
        pool: &mut BulletPool,
        live: &mut LiveBullets,
    ) -> bool {
        if !self.shooting.is_finished(now) {
            return false;
        }
        self.shooting.reset(now, rng);
        let origin = IVec2::new(self.body.pos.x + self.body.size.x / 2, self.body.pos.y);
        live.fire(pool, Owner::Player(self.side), origin, PLAYER_BULLET_SPEED)
    }

    /// Restart the shooting cooldown (used when pause toggles)
    pub fn reset_shooting<R: Rng + ?Sized>(&mut self, now: u64, rng: &mut R) {
        self.shooting.reset(now, rng);
    }

    /// Mark the ship hit; it recovers when the destruction cooldown elapses
    pub fn destroy<R: Rng + ?Sized>(&mut self, now: u64, rng: &mut R) {
        self.body.destroyed = true;
        self.destruction.reset(now, rng);
    }

    /// Per-frame refresh: a hit ship comes back once its destruction time is over
    pub fn update(&mut self, now: u64) {
        if self.body.destroyed && self.destruction.is_finished(now) {
            self.body.destroyed = false;
        }
    }
}
