//! Read-only frame description for the rendering collaborator

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Sprite};

/// One drawable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    pub sprite: Sprite,
    pub pos: IVec2,
    pub size: IVec2,
    pub destroyed: bool,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        Self {
            sprite: entity.sprite(),
            pos: entity.pos,
            size: entity.size,
            destroyed: entity.destroyed,
        }
    }
}

/// HUD values for one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideView {
    pub score: u32,
    pub lives: u32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameView {
    pub level: u32,
    pub field: IVec2,
    /// Ships, formation, special ship, then bullets
    pub entities: Vec<EntityView>,
    pub sides: Vec<SideView>,
    /// Whole seconds left before input is accepted; `None` once play has started
    pub countdown: Option<u64>,
    pub paused: bool,
    /// Formation wiped out or every side out of lives
    pub finished: bool,
}

impl FrameView {
    pub fn count(&self, sprite: Sprite) -> usize {
        self.entities.iter().filter(|e| e.sprite == sprite).count()
    }
}

/// Rendering collaborator. Receives each frame; the round never waits on it.
pub trait Renderer {
    fn draw(&mut self, frame: &FrameView);
}
