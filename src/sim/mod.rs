//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One update per frame, time sampled once per frame
//! - Injected RNG only
//! - Stable iteration order (slot order, bullet id order)
//! - No rendering or platform dependencies

pub mod bonus;
pub mod clock;
pub mod collision;
pub mod cooldown;
pub mod entity;
pub mod formation;
pub mod input;
pub mod pool;
pub mod round;
pub mod ship;
pub mod state;
pub mod view;

pub use bonus::BonusShip;
pub use clock::{Clock, ManualClock, SystemClock, Timeline};
pub use collision::{Collisions, Kill, Target, resolve};
pub use cooldown::Cooldown;
pub use entity::{EnemyClass, Entity, EntityKind, Side, Sprite};
pub use formation::{Formation, FormationState, SlotId};
pub use input::{InputSource, Intent, IntentSet};
pub use pool::{BulletPool, LiveBullets, Owner};
pub use round::{Round, RoundStatus};
pub use ship::Ship;
pub use state::{RoundEnd, RoundOutcome, RoundSnapshot, SideState};
pub use view::{EntityView, FrameView, Renderer, SideView};
