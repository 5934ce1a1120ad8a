//! Collision resolution
//!
//! Runs once per frame after everything has moved. Pure: it reads the frame's
//! entities and reports what happened; the round applies the consequences.

use std::collections::BTreeSet;

use super::entity::{Entity, Side};
use super::formation::{Formation, SlotId};
use super::pool::{LiveBullets, Owner};
use super::ship::Ship;

/// What a player bullet destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Formation(SlotId),
    Special,
}

/// A scoring hit by one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kill {
    pub side: Side,
    pub target: Target,
    pub points: u32,
}

/// Everything one frame's collisions decided
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collisions {
    /// Ids of bullets to remove from play; each appears once
    pub consumed: BTreeSet<u32>,
    /// Sides whose active ship was hit this frame, at most once each
    pub ship_hits: Vec<Side>,
    /// Targets destroyed this frame, at most once each, in resolution order
    pub kills: Vec<Kill>,
}

impl Collisions {
    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty()
    }
}

/// Resolve every live bullet against the frame's targets.
///
/// `ships` lists only the ships that can currently be hit; a side with no
/// lives left is simply absent. Enemy bullets are resolved first. Player
/// bullets of both sides then go in firing order, so when two bullets reach
/// the same target in one frame the earlier shot claims it. A bullet hits at
/// most one target: formation slots are tried before the special ship.
pub fn resolve(
    live: &LiveBullets,
    ships: &[&Ship],
    formation: &Formation,
    special: Option<&Entity>,
) -> Collisions {
    let mut out = Collisions::default();

    for bullet in live.get(Owner::Formation) {
        for ship in ships {
            if !bullet.overlaps(&ship.body) {
                continue;
            }
            out.consumed.insert(bullet.id);
            let side = ship.side();
            if !ship.is_destroyed() && !out.ship_hits.contains(&side) {
                out.ship_hits.push(side);
            }
        }
    }

    let mut player_bullets: Vec<(Side, &Entity)> = Side::ALL
        .into_iter()
        .flat_map(|side| live.get(Owner::Player(side)).iter().map(move |b| (side, b)))
        .collect();
    player_bullets.sort_by_key(|(_, b)| b.id);

    let mut claimed: BTreeSet<SlotId> = BTreeSet::new();
    let mut special_claimed = false;

    for (side, bullet) in player_bullets {
        let hit = formation
            .iter()
            .find(|(slot, enemy)| {
                !enemy.destroyed && !claimed.contains(slot) && bullet.overlaps(enemy)
            })
            .map(|(slot, enemy)| (Target::Formation(slot), enemy.point_value()))
            .or_else(|| {
                special
                    .filter(|s| !special_claimed && !s.destroyed && bullet.overlaps(s))
                    .map(|s| (Target::Special, s.point_value()))
            });

        let Some((target, points)) = hit else {
            continue;
        };
        match target {
            Target::Formation(slot) => {
                claimed.insert(slot);
            }
            Target::Special => special_claimed = true,
        }
        out.consumed.insert(bullet.id);
        out.kills.push(Kill {
            side,
            target,
            points,
        });
    }

    out
}
