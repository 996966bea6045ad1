//! Which way the avatar's body sprite faces, from torso horizontal speed.

use serde::Serialize;

const TURN_SPEED: f32 = 3.0;
const FAR_TURN_SPEED: f32 = 9.75;
const TRANSITION_COOLDOWN: i32 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Facing {
    FarLeft,
    Left,
    #[default]
    Front,
    Right,
    FarRight,
}

impl Facing {
    pub fn classify(vx: f32) -> Facing {
        if (TURN_SPEED..=FAR_TURN_SPEED).contains(&vx) {
            Facing::Right
        } else if vx > FAR_TURN_SPEED {
            Facing::FarRight
        } else if (-FAR_TURN_SPEED..=-TURN_SPEED).contains(&vx) {
            Facing::Left
        } else if vx < -FAR_TURN_SPEED {
            Facing::FarLeft
        } else {
            Facing::Front
        }
    }
}

/// Facing with a cooldown so the sprite doesn't flap between frames.
#[derive(Clone, Copy, Debug)]
pub struct FacingTracker {
    facing: Facing,
    cooldown: i32,
}

impl Default for FacingTracker {
    fn default() -> Self {
        Self {
            facing: Facing::Front,
            cooldown: TRANSITION_COOLDOWN,
        }
    }
}

impl FacingTracker {
    pub fn update(&mut self, vx: f32) -> Facing {
        if self.cooldown < 0 {
            let next = Facing::classify(vx);
            if next != self.facing {
                self.facing = next;
                self.cooldown = TRANSITION_COOLDOWN;
            }
        }
        if self.cooldown >= 0 {
            self.cooldown -= 1;
        }
        self.facing
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }
}
