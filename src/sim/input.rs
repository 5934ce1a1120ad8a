//! Player intents
//!
//! Only the current frame's level state matters; nothing is queued.

use serde::{Deserialize, Serialize};

use super::entity::Side;

/// Everything a player can ask for in one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft(Side),
    MoveRight(Side),
    Fire(Side),
    Pause,
    ForceQuit,
}

impl Intent {
    fn bit(self) -> u16 {
        match self {
            Intent::MoveLeft(side) => 1 << side.index(),
            Intent::MoveRight(side) => 1 << (2 + side.index()),
            Intent::Fire(side) => 1 << (4 + side.index()),
            Intent::Pause => 1 << 6,
            Intent::ForceQuit => 1 << 7,
        }
    }
}

/// Input collaborator queried by the round once per frame
pub trait InputSource {
    fn is_active(&self, intent: Intent) -> bool;
}

/// Snapshot of the intents held during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentSet {
    bits: u16,
}

impl IntentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, intent: Intent) -> Self {
        self.press(intent);
        self
    }

    pub fn press(&mut self, intent: Intent) {
        self.bits |= intent.bit();
    }

    pub fn release(&mut self, intent: Intent) {
        self.bits &= !intent.bit();
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl InputSource for IntentSet {
    fn is_active(&self, intent: Intent) -> bool {
        self.bits & intent.bit() != 0
    }
}

impl FromIterator<Intent> for IntentSet {
    fn from_iter<I: IntoIterator<Item = Intent>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), IntentSet::with)
    }
}
