use rapier2d::prelude::{ColliderHandle, ImpulseJointHandle, RigidBodyHandle};

use crate::core::math::Vec2;
use crate::domain::filter::{CategoryBits, CAT_ALL};

/// Non-owning reference to a body in the world. May outlive the body; every
/// world call checks liveness before touching it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyRef(pub(crate) RigidBodyHandle);

/// Reference to a joint in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JointRef(pub(crate) ImpulseJointHandle);

/// Reference to a sensor collider attached to a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SensorRef(pub(crate) ColliderHandle);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    Fixed,
}

/// Box-shaped body description.
#[derive(Clone, Debug)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub position: Vec2,
    pub angle: f32,
    pub half_extents: Vec2,
    pub density: f32,
    pub friction: f32,
    pub gravity_scale: f32,
    pub linear_damping: f32,
    pub fixed_rotation: bool,
    pub ccd: bool,
    pub membership: CategoryBits,
    pub filter: CategoryBits,
}

impl BodyDesc {
    pub fn dynamic(half_width: f32, half_height: f32) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            position: Vec2::ZERO,
            angle: 0.0,
            half_extents: Vec2::new(half_width, half_height),
            density: 1.0,
            friction: 0.5,
            gravity_scale: 1.0,
            linear_damping: 0.0,
            fixed_rotation: false,
            ccd: false,
            membership: CAT_ALL,
            filter: CAT_ALL,
        }
    }

    pub fn fixed(half_width: f32, half_height: f32) -> Self {
        Self {
            kind: BodyKind::Fixed,
            gravity_scale: 0.0,
            fixed_rotation: true,
            ..Self::dynamic(half_width, half_height)
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    pub fn with_groups(mut self, membership: CategoryBits, filter: CategoryBits) -> Self {
        self.membership = membership;
        self.filter = filter;
        self
    }
}

/// Box sensor glued to the center of an existing body.
#[derive(Clone, Copy, Debug)]
pub struct SensorDesc {
    pub half_extents: Vec2,
    pub membership: CategoryBits,
    pub filter: CategoryBits,
}

/// Joint motor used as friction: zero target speed, small max torque.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointMotor {
    pub target_speed: f32,
    pub max_torque: f32,
}

impl JointMotor {
    pub fn friction(max_torque: f32) -> Self {
        Self { target_speed: 0.0, max_torque }
    }
}

/// Pin joint between two bodies at local anchors.
#[derive(Clone, Copy, Debug)]
pub struct RevoluteDesc {
    pub body_a: BodyRef,
    pub body_b: BodyRef,
    pub anchor_a: Vec2,
    pub anchor_b: Vec2,
    pub motor: Option<JointMotor>,
    /// Let the two jointed bodies collide with each other.
    pub contacts: bool,
}

impl RevoluteDesc {
    pub fn new(body_a: BodyRef, anchor_a: Vec2, body_b: BodyRef, anchor_b: Vec2) -> Self {
        Self {
            body_a,
            body_b,
            anchor_a,
            anchor_b,
            motor: None,
            contacts: false,
        }
    }

    pub fn with_motor(mut self, motor: JointMotor) -> Self {
        self.motor = Some(motor);
        self
    }
}
