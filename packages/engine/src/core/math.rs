//! 2D vector and angle helpers.
//!
//! All angles are radians. `wrap_angle` is the single normalization used by the
//! arm controller, and always lands in `(-PI, PI]`.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

/// 2D vector for physics calculations
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: Vec2) -> f32 {
        (*self - other).length()
    }

    /// Direction of the vector. A zero vector has angle 0 (`atan2(0, 0)`).
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Rotate counter-clockwise by `angle`.
    pub fn rotate(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

/// Normalize an angle into `(-PI, PI]`.
#[inline]
pub fn wrap_angle(theta: f32) -> f32 {
    let a = theta % TAU;
    if a <= -PI {
        a + TAU
    } else if a > PI {
        a - TAU
    } else {
        a
    }
}

/// Signed shortest rotation from `current` to `goal`.
#[inline]
pub fn angle_diff(goal: f32, current: f32) -> f32 {
    wrap_angle(goal - current)
}
