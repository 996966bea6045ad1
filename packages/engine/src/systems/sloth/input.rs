//! Per-tick player input and grab-button resolution.

use serde::{Deserialize, Serialize};

use crate::core::math::Vec2;
use crate::domain::config::MovementMode;

/// Raw controller state for one tick. Stick components are in [-1, 1] with
/// y pointing down, as gamepads report it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlInput {
    pub left_stick: Vec2,
    pub right_stick: Vec2,
    pub left_grab: bool,
    pub right_grab: bool,
}

impl ControlInput {
    pub fn new(left_stick: Vec2, right_stick: Vec2, left_grab: bool, right_grab: bool) -> Self {
        Self {
            left_stick: clamp_stick(left_stick),
            right_stick: clamp_stick(right_stick),
            left_grab,
            right_grab,
        }
    }
}

#[inline]
fn clamp_stick(v: Vec2) -> Vec2 {
    let c = |x: f32| if x.is_finite() { x.clamp(-1.0, 1.0) } else { 0.0 };
    Vec2::new(c(v.x), c(v.y))
}

/// Turns a held button into a grab intent according to the movement mode.
///
/// Toggle mode flips on the press edge only, so holding the button does not
/// flicker the hand.
#[derive(Clone, Copy, Debug, Default)]
pub struct GrabButton {
    held: bool,
    just_pressed: bool,
    toggled: bool,
}

impl GrabButton {
    pub fn resolve(&mut self, mode: MovementMode, pressed: bool) -> bool {
        let rising = pressed && !self.held;
        self.held = pressed;
        self.just_pressed = rising;
        match mode {
            MovementMode::GrabNormal => pressed,
            MovementMode::GrabReverse => !pressed,
            MovementMode::GrabToggle => {
                if rising {
                    self.toggled = !self.toggled;
                }
                self.toggled
            }
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// True only on the tick the button went down.
    pub fn just_pressed(&self) -> bool {
        self.just_pressed
    }

    /// Overwrite the toggle latch. A hand swap consumes the press that
    /// triggered it, so the latch is forced back to holding.
    pub fn set_toggled(&mut self, toggled: bool) {
        self.toggled = toggled;
    }
}
