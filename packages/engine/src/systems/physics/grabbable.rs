//! Things a hand can hold on to.

use serde::Serialize;

use crate::domain::filter::{CategoryBits, CAT_LOSE, CAT_VINE, CAT_WALL, CAT_WIN};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SceneryKind {
    Branch,
    Vine,
    Wall,
    Win,
    Lose,
}

impl SceneryKind {
    pub fn category(self) -> CategoryBits {
        match self {
            SceneryKind::Branch | SceneryKind::Vine => CAT_VINE,
            SceneryKind::Wall => CAT_WALL,
            SceneryKind::Win => CAT_WIN,
            SceneryKind::Lose => CAT_LOSE,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(SceneryKind::Branch),
            1 => Some(SceneryKind::Vine),
            2 => Some(SceneryKind::Wall),
            3 => Some(SceneryKind::Win),
            4 => Some(SceneryKind::Lose),
            _ => None,
        }
    }
}

/// World entity that can be grabbed. The flag is read by render tinting and
/// the tutorial's "grab every branch" check.
pub trait Grabbable {
    fn set_grabbed(&mut self, grabbed: bool);
    fn is_grabbed(&self) -> bool;
    fn kind(&self) -> SceneryKind;
}

/// Plain level geometry.
#[derive(Clone, Copy, Debug)]
pub struct Scenery {
    kind: SceneryKind,
    grabbed: bool,
}

impl Scenery {
    pub fn new(kind: SceneryKind) -> Self {
        Self { kind, grabbed: false }
    }
}

impl Grabbable for Scenery {
    fn set_grabbed(&mut self, grabbed: bool) {
        self.grabbed = grabbed;
    }

    fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    fn kind(&self) -> SceneryKind {
        self.kind
    }
}
