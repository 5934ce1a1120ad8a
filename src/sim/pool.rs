//! Bullet recycling
//!
//! Every bullet is in exactly one place: the pool's free list or one owner's
//! live set. Bullets enter a live set when fired and go back to the free list
//! when they leave the play area or are consumed by a hit.

use std::collections::BTreeSet;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Side};

/// Free list of spent bullets. Reuse before allocate.
#[derive(Debug, Clone, Default)]
pub struct BulletPool {
    free: Vec<Entity>,
    allocated: usize,
    next_id: u32,
}

impl BulletPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a bullet at `origin` travelling at `speed`, recycled when possible.
    /// Every handout gets a fresh id so ids order bullets by firing time.
    pub fn spawn(&mut self, origin: IVec2, speed: i32) -> Entity {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        match self.free.pop() {
            Some(mut bullet) => {
                bullet.id = id;
                bullet.pos = IVec2::new(origin.x - bullet.size.x / 2, origin.y);
                bullet.speed = speed;
                bullet.destroyed = false;
                bullet
            }
            None => {
                self.allocated += 1;
                log::debug!("Bullet pool grew to {} allocations", self.allocated);
                Entity::bullet(id, origin, speed)
            }
        }
    }

    /// Return spent bullets to the free list
    pub fn recycle<I: IntoIterator<Item = Entity>>(&mut self, bullets: I) {
        self.free.extend(bullets);
    }

    /// Bullets ever allocated (live + free)
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    pub fn free_len(&self) -> usize {
        self.free.len()
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player(Side),
    Formation,
}

impl Owner {
    pub const ALL: [Owner; 3] = [
        Owner::Player(Side::One),
        Owner::Player(Side::Two),
        Owner::Formation,
    ];

    #[inline]
    fn index(self) -> usize {
        match self {
            Owner::Player(side) => side.index(),
            Owner::Formation => 2,
        }
    }
}

/// Live bullet sets, one per owner, each capped
#[derive(Debug, Clone)]
pub struct LiveBullets {
    sets: [Vec<Entity>; 3],
    cap: usize,
}

impl LiveBullets {
    pub fn new(cap: usize) -> Self {
        Self {
            sets: Default::default(),
            cap,
        }
    }

    /// Spawn a bullet into `owner`'s live set. Requests beyond the cap are dropped.
    pub fn fire(&mut self, pool: &mut BulletPool, owner: Owner, origin: IVec2, speed: i32) -> bool {
        let set = &mut self.sets[owner.index()];
        if set.len() >= self.cap {
            log::debug!("Dropped shot from {owner:?}: {} bullets live", set.len());
            return false;
        }
        set.push(pool.spawn(origin, speed));
        true
    }

    pub fn get(&self, owner: Owner) -> &[Entity] {
        &self.sets[owner.index()]
    }

    /// Every live bullet with its owner
    pub fn iter(&self) -> impl Iterator<Item = (Owner, &Entity)> {
        Owner::ALL
            .into_iter()
            .flat_map(move |owner| self.get(owner).iter().map(move |b| (owner, b)))
    }

    pub fn len(&self) -> usize {
        self.sets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move every bullet one step along its direction
    pub fn advance(&mut self) {
        for bullet in self.sets.iter_mut().flatten() {
            bullet.translate(0, bullet.speed);
        }
    }

    /// Remove the bullets with the given ids from whichever set holds them
    pub fn take(&mut self, ids: &BTreeSet<u32>) -> Vec<Entity> {
        self.take_where(|b| ids.contains(&b.id))
    }

    /// Remove bullets whose top edge lies outside `[top, bottom]`
    pub fn take_out_of_bounds(&mut self, top: i32, bottom: i32) -> Vec<Entity> {
        self.take_where(|b| b.pos.y < top || b.pos.y > bottom)
    }

    /// Remove every live bullet
    pub fn drain(&mut self) -> Vec<Entity> {
        self.take_where(|_| true)
    }

    fn take_where<F: Fn(&Entity) -> bool>(&mut self, pred: F) -> Vec<Entity> {
        let mut taken = Vec::new();
        for set in &mut self.sets {
            let (gone, kept): (Vec<_>, Vec<_>) = set.drain(..).partition(|b| pred(b));
            *set = kept;
            taken.extend(gone);
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAP: usize = 8;

    #[test]
    fn test_spawn_allocates_then_recycles() {
        let mut pool = BulletPool::new();
        let a = pool.spawn(IVec2::new(50, 100), -6);
        assert_eq!(pool.allocated(), 1);
        assert_eq!(a.pos, IVec2::new(47, 100));

        pool.recycle([a]);
        assert_eq!(pool.free_len(), 1);

        let b = pool.spawn(IVec2::new(200, 300), 4);
        assert_eq!(pool.allocated(), 1);
        assert_eq!(pool.free_len(), 0);
        assert_eq!(b.pos, IVec2::new(197, 300));
        assert_eq!(b.speed, 4);
        assert!(b.is_downward());
    }

    #[test]
    fn test_ids_increase_across_recycling() {
        let mut pool = BulletPool::new();
        let a = pool.spawn(IVec2::ZERO, -6);
        let a_id = a.id;
        pool.recycle([a]);
        let b = pool.spawn(IVec2::ZERO, -6);
        assert!(b.id > a_id);
    }

    #[test]
    fn test_round_trip_reuses_allocations() {
        let mut pool = BulletPool::new();
        let mut live = LiveBullets::new(64);
        let n = 20;

        for i in 0..n {
            assert!(live.fire(&mut pool, Owner::Player(Side::One), IVec2::new(i, 200), -6));
        }
        let spent = live.drain();
        assert_eq!(spent.len(), n as usize);
        pool.recycle(spent);

        for i in 0..n {
            live.fire(&mut pool, Owner::Formation, IVec2::new(i, 200), 4);
        }
        assert_eq!(pool.allocated(), n as usize);
        assert_eq!(live.len(), n as usize);
    }

    #[test]
    fn test_cap_drops_excess_per_owner() {
        let mut pool = BulletPool::new();
        let mut live = LiveBullets::new(CAP);
        let owner = Owner::Player(Side::Two);

        for _ in 0..CAP {
            assert!(live.fire(&mut pool, owner, IVec2::ZERO, -6));
        }
        assert!(!live.fire(&mut pool, owner, IVec2::ZERO, -6));
        assert_eq!(live.get(owner).len(), CAP);
        // Other owners keep their own budget
        assert!(live.fire(&mut pool, Owner::Formation, IVec2::ZERO, 4));
    }

    #[test]
    fn test_take_removes_from_any_set_once() {
        let mut pool = BulletPool::new();
        let mut live = LiveBullets::new(CAP);
        live.fire(&mut pool, Owner::Player(Side::One), IVec2::ZERO, -6);
        live.fire(&mut pool, Owner::Formation, IVec2::ZERO, 4);
        let ids: BTreeSet<u32> = live.iter().map(|(_, b)| b.id).collect();

        let taken = live.take(&ids);
        assert_eq!(taken.len(), 2);
        assert!(live.is_empty());
        assert!(live.take(&ids).is_empty());
    }

    #[test]
    fn test_advance_and_out_of_bounds() {
        let mut pool = BulletPool::new();
        let mut live = LiveBullets::new(CAP);
        live.fire(&mut pool, Owner::Player(Side::One), IVec2::new(10, 42), -6);
        live.fire(&mut pool, Owner::Formation, IVec2::new(10, 300), 4);

        live.advance();
        assert_eq!(live.get(Owner::Player(Side::One))[0].pos.y, 36);
        assert_eq!(live.get(Owner::Formation)[0].pos.y, 304);

        let gone = live.take_out_of_bounds(40, 520);
        assert_eq!(gone.len(), 1);
        assert!(!gone[0].is_downward());
        assert_eq!(live.len(), 1);
    }
}
