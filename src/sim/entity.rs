//! Entities shared by every part of the simulation
//!
//! One geometry/state record for all four kinds; kind-specific data lives in
//! [`EntityKind`] and is reached by matching, never by downcasting.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A competing player side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::One, Side::Two];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }
}

/// Enemy rank within the formation, determines sprite and score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyClass {
    /// Bottom rows
    A,
    /// Middle rows
    B,
    /// Top rows
    C,
}

impl EnemyClass {
    pub fn points(self) -> u32 {
        match self {
            EnemyClass::A => 10,
            EnemyClass::B => 20,
            EnemyClass::C => 30,
        }
    }

    /// Class for a row, by the row's relative height in the formation
    pub fn for_row(row: usize, rows: usize) -> Self {
        let scaled = row as u32 * 100;
        let rows = rows.max(1) as u32;
        if scaled < rows * PROPORTION_C_PCT {
            EnemyClass::C
        } else if scaled < rows * (PROPORTION_C_PCT + PROPORTION_B_PCT) {
            EnemyClass::B
        } else {
            EnemyClass::A
        }
    }
}

/// Kind-specific payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    PlayerShip { side: Side },
    EnemyShip { class: EnemyClass, alt_frame: bool },
    SpecialShip,
    /// Direction comes from the sign of `speed`: negative travels up (player), positive down (enemy)
    Bullet,
}

/// Visual kind handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sprite {
    Ship(Side),
    ShipDestroyed(Side),
    PlayerBullet,
    EnemyBullet,
    EnemyA { alt_frame: bool },
    EnemyB { alt_frame: bool },
    EnemyC { alt_frame: bool },
    Special,
    Explosion,
}

/// Geometry and state common to every entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    /// Top-left corner
    pub pos: IVec2,
    pub size: IVec2,
    /// Pixels per step; signed for bullets
    pub speed: i32,
    /// Terminal for enemies, timed for player ships. Destroyed entities stay addressable.
    pub destroyed: bool,
    pub kind: EntityKind,
}

impl Entity {
    pub fn player_ship(side: Side, pos: IVec2) -> Self {
        Self {
            id: side.index() as u32,
            pos,
            size: IVec2::new(SHIP_WIDTH, SHIP_HEIGHT),
            speed: SHIP_SPEED,
            destroyed: false,
            kind: EntityKind::PlayerShip { side },
        }
    }

    pub fn enemy_ship(id: u32, class: EnemyClass, pos: IVec2) -> Self {
        Self {
            id,
            pos,
            size: IVec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            speed: FORMATION_X_STEP,
            destroyed: false,
            kind: EntityKind::EnemyShip {
                class,
                alt_frame: false,
            },
        }
    }

    pub fn special_ship(id: u32) -> Self {
        Self {
            id,
            pos: IVec2::new(SPECIAL_START_X, SPECIAL_Y),
            size: IVec2::new(SPECIAL_WIDTH, SPECIAL_HEIGHT),
            speed: SPECIAL_SPEED,
            destroyed: false,
            kind: EntityKind::SpecialShip,
        }
    }

    /// Bullet centered horizontally on `origin.x`
    pub fn bullet(id: u32, origin: IVec2, speed: i32) -> Self {
        Self {
            id,
            pos: IVec2::new(origin.x - BULLET_WIDTH / 2, origin.y),
            size: IVec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            speed,
            destroyed: false,
            kind: EntityKind::Bullet,
        }
    }

    #[inline]
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.pos += IVec2::new(dx, dy);
    }

    /// Right edge (exclusive)
    #[inline]
    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    /// Bottom edge (exclusive)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    /// Center scaled by two, which keeps odd sizes exact in integers
    #[inline]
    fn center_x2(&self) -> IVec2 {
        self.pos * 2 + self.size
    }

    /// Axis-aligned overlap: center distance strictly below the summed half-extents on both axes
    pub fn overlaps(&self, other: &Entity) -> bool {
        let dist = (self.center_x2() - other.center_x2()).abs();
        let reach = self.size + other.size;
        dist.x < reach.x && dist.y < reach.y
    }

    /// Score awarded for destroying this entity
    pub fn point_value(&self) -> u32 {
        match self.kind {
            EntityKind::EnemyShip { class, .. } => class.points(),
            EntityKind::SpecialShip => SPECIAL_POINTS,
            EntityKind::PlayerShip { .. } | EntityKind::Bullet => 0,
        }
    }

    /// Bullets travelling down belong to the formation
    #[inline]
    pub fn is_downward(&self) -> bool {
        self.speed > 0
    }

    pub fn sprite(&self) -> Sprite {
        match self.kind {
            EntityKind::PlayerShip { side } if self.destroyed => Sprite::ShipDestroyed(side),
            EntityKind::PlayerShip { side } => Sprite::Ship(side),
            EntityKind::Bullet if self.is_downward() => Sprite::EnemyBullet,
            EntityKind::Bullet => Sprite::PlayerBullet,
            _ if self.destroyed => Sprite::Explosion,
            EntityKind::EnemyShip { class, alt_frame } => match class {
                EnemyClass::A => Sprite::EnemyA { alt_frame },
                EnemyClass::B => Sprite::EnemyB { alt_frame },
                EnemyClass::C => Sprite::EnemyC { alt_frame },
            },
            EntityKind::SpecialShip => Sprite::Special,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x: i32, y: i32, w: i32, h: i32) -> Entity {
        let mut e = Entity::bullet(0, IVec2::ZERO, 0);
        e.pos = IVec2::new(x, y);
        e.size = IVec2::new(w, h);
        e
    }

    #[test]
    fn test_overlap_identical_origin() {
        let enemy = boxed(100, 50, 12, 8);
        let bullet = boxed(100, 50, 3, 5);
        assert!(enemy.overlaps(&bullet));
        assert!(bullet.overlaps(&enemy));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = boxed(0, 0, 10, 10);
        let right = boxed(10, 0, 10, 10);
        let below = boxed(0, 10, 10, 10);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
        assert!(a.overlaps(&boxed(9, 9, 10, 10)));
    }

    #[test]
    fn test_overlap_needs_both_axes() {
        let a = boxed(0, 0, 10, 10);
        assert!(!a.overlaps(&boxed(5, 40, 10, 10)));
        assert!(!a.overlaps(&boxed(40, 5, 10, 10)));
    }

    #[test]
    fn test_enemy_class_rows() {
        let rows = 5;
        assert_eq!(EnemyClass::for_row(0, rows), EnemyClass::C);
        assert_eq!(EnemyClass::for_row(1, rows), EnemyClass::B);
        assert_eq!(EnemyClass::for_row(2, rows), EnemyClass::B);
        assert_eq!(EnemyClass::for_row(3, rows), EnemyClass::A);
        assert_eq!(EnemyClass::for_row(4, rows), EnemyClass::A);
    }

    #[test]
    fn test_point_values() {
        assert_eq!(
            Entity::enemy_ship(1, EnemyClass::C, IVec2::ZERO).point_value(),
            30
        );
        assert_eq!(Entity::special_ship(2).point_value(), SPECIAL_POINTS);
        assert_eq!(Entity::bullet(3, IVec2::ZERO, -6).point_value(), 0);
    }

    #[test]
    fn test_sprites_follow_state() {
        let mut enemy = Entity::enemy_ship(1, EnemyClass::A, IVec2::ZERO);
        assert_eq!(enemy.sprite(), Sprite::EnemyA { alt_frame: false });
        enemy.destroyed = true;
        assert_eq!(enemy.sprite(), Sprite::Explosion);

        let mut ship = Entity::player_ship(Side::Two, IVec2::ZERO);
        ship.destroyed = true;
        assert_eq!(ship.sprite(), Sprite::ShipDestroyed(Side::Two));

        assert_eq!(Entity::bullet(0, IVec2::ZERO, 4).sprite(), Sprite::EnemyBullet);
        assert_eq!(Entity::bullet(0, IVec2::ZERO, -6).sprite(), Sprite::PlayerBullet);
    }
}
