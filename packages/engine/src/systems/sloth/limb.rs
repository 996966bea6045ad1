//! Limb chain: torso, two arms, two hands.
//!
//! Every part is placed so its joint anchors coincide with the parent's at
//! build time: `child = parent + rot(parent_angle) * parent_anchor -
//! rot(child_angle) * child_anchor`. The right arm rests at angle 0 and the
//! left arm at PI, both hanging off the same shoulder point.

use std::f32::consts::PI;

use serde::Serialize;

use crate::core::math::Vec2;
use crate::core::utils::random::range_f32;
use crate::domain::config::SlothConfig;
use crate::domain::filter::{
    CAT_NONE, HAND_SENSOR_FILTER, HAND_SENSOR_MEMBERSHIP, LIMB_FILTER, LIMB_MEMBERSHIP, TORSO_FILTER,
    TORSO_MEMBERSHIP,
};
use crate::systems::physics::{BodyDesc, BodyRef, JointMotor, JointRef, PhysicsWorld, RevoluteDesc, SensorDesc, SensorRef};

/// Scatter force range applied to every part on dismemberment.
const SCATTER_FORCE: f32 = 55.0;
const DISMEMBER_SPIN: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Part {
    Torso,
    RightArm,
    LeftArm,
    LeftHand,
    RightHand,
}

impl Part {
    pub const ALL: [Part; 5] = [Part::Torso, Part::RightArm, Part::LeftArm, Part::LeftHand, Part::RightHand];

    pub fn arm(side: Side) -> Part {
        match side {
            Side::Left => Part::LeftArm,
            Side::Right => Part::RightArm,
        }
    }

    pub fn hand(side: Side) -> Part {
        match side {
            Side::Left => Part::LeftHand,
            Side::Right => Part::RightHand,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Mass and inertia of a solid box, used by the catch impulses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxMass {
    pub mass: f32,
    pub inertia: f32,
}

impl BoxMass {
    pub fn of(density: f32, width: f32, height: f32) -> Self {
        let mass = density * width * height;
        Self {
            mass,
            inertia: mass * (width * width + height * height) / 12.0,
        }
    }
}

#[inline]
fn place(parent: Vec2, parent_angle: f32, parent_anchor: Vec2, angle: f32, anchor: Vec2) -> Vec2 {
    parent + parent_anchor.rotate(parent_angle) - anchor.rotate(angle)
}

pub struct LimbChain {
    parts: [BodyRef; 5],
    /// Torso to arm joints, indexed by `Side`. Gone after dismemberment.
    shoulders: Option<[JointRef; 2]>,
    wrists: [JointRef; 2],
    sensors: [SensorRef; 2],
    origin: Vec2,
    swing_inertia: f32,
    torso_inertia: f32,
}

impl LimbChain {
    pub fn build(world: &mut PhysicsWorld, config: &SlothConfig, origin: Vec2) -> Result<Self, String> {
        let layout = &config.layout;
        let scale = layout.object_scale;
        let reach = layout.arm_reach();

        let (body_w, body_h) = (layout.body_width * scale, layout.body_height * scale);
        let (arm_w, arm_h) = (layout.arm_width * scale, layout.arm_height * scale);
        let (hand_w, hand_h) = (layout.hand_width * scale, layout.hand_height * scale);

        let shoulder = Vec2::new(layout.shoulder_x / 2.0, layout.shoulder_y);
        let arm_anchor = Vec2::new(-reach / 2.0, 0.0);
        let wrist = Vec2::new(layout.wrist_offset(), 0.0);

        let torso = world.create_body(
            &BodyDesc::dynamic(body_w / 2.0, body_h / 2.0)
                .with_position(origin)
                .with_density(layout.torso_mass / (body_w * body_h))
                .with_fixed_rotation(true)
                .with_gravity_scale(config.gravity_scale)
                .with_linear_damping(layout.torso_linear_damping)
                .with_ccd(true)
                .with_groups(TORSO_MEMBERSHIP, TORSO_FILTER),
        );

        let limb = |half_w: f32, half_h: f32, density: f32| {
            BodyDesc::dynamic(half_w, half_h)
                .with_density(density)
                .with_friction(layout.limb_friction)
                .with_gravity_scale(config.gravity_scale)
                .with_ccd(true)
                .with_groups(LIMB_MEMBERSHIP, LIMB_FILTER)
        };

        let mut arms = [torso; 2];
        let mut hands = [torso; 2];
        for side in Side::BOTH {
            let angle = match side {
                Side::Left => PI,
                Side::Right => 0.0,
            };
            let arm_pos = place(origin, 0.0, shoulder, angle, arm_anchor);
            let arm = world.create_body(&limb(arm_w / 2.0, arm_h / 2.0, config.arm_density).with_position(arm_pos).with_angle(angle));
            let hand_pos = place(arm_pos, angle, wrist, 0.0, Vec2::ZERO);
            let hand = world.create_body(
                &limb(hand_w / 2.0, hand_h / 2.0, layout.hand_density)
                    .with_position(hand_pos)
                    .with_fixed_rotation(true),
            );
            arms[side.index()] = arm;
            hands[side.index()] = hand;
        }

        let motor = JointMotor::friction(layout.joint_friction_torque);
        let mut joint = |a: BodyRef, anchor_a: Vec2, b: BodyRef, anchor_b: Vec2| {
            world
                .create_revolute(&RevoluteDesc::new(a, anchor_a, b, anchor_b).with_motor(motor))
                .ok_or_else(|| "limb joint refers to a missing body".to_string())
        };
        let shoulders = [
            joint(torso, shoulder, arms[0], arm_anchor)?,
            joint(torso, shoulder, arms[1], arm_anchor)?,
        ];
        let wrists = [
            joint(arms[0], wrist, hands[0], Vec2::ZERO)?,
            joint(arms[1], wrist, hands[1], Vec2::ZERO)?,
        ];

        let sensor = SensorDesc {
            half_extents: Vec2::new(layout.hand_width, layout.hand_height),
            membership: HAND_SENSOR_MEMBERSHIP,
            filter: HAND_SENSOR_FILTER,
        };
        let missing = || "hand body vanished while attaching its sensor".to_string();
        let sensors = [
            world.attach_sensor(hands[0], &sensor).ok_or_else(missing)?,
            world.attach_sensor(hands[1], &sensor).ok_or_else(missing)?,
        ];

        let hand = BoxMass::of(layout.hand_density, hand_w, hand_h);
        let arm = BoxMass::of(config.arm_density, arm_w, arm_h);
        let torso_mass = BoxMass::of(layout.torso_mass / (body_w * body_h), body_w, body_h);

        Ok(Self {
            parts: [torso, arms[1], arms[0], hands[0], hands[1]],
            shoulders: Some(shoulders),
            wrists,
            sensors,
            origin,
            swing_inertia: hand.mass * reach * reach + arm.inertia,
            torso_inertia: torso_mass.inertia,
        })
    }

    /// Joints first, then bodies.
    pub fn teardown(&mut self, world: &mut PhysicsWorld) {
        if let Some(shoulders) = self.shoulders.take() {
            for joint in shoulders {
                world.remove_joint(joint);
            }
        }
        for joint in self.wrists {
            world.remove_joint(joint);
        }
        for body in self.parts {
            world.remove_body(body);
        }
    }

    /// Tear down and build again at `origin`. Handles from before the call are
    /// dead afterwards.
    pub fn rebuild(&mut self, world: &mut PhysicsWorld, config: &SlothConfig, origin: Vec2) -> Result<(), String> {
        self.teardown(world);
        *self = LimbChain::build(world, config, origin)?;
        Ok(())
    }

    /// Cut both arms loose and scatter every part. False if already done.
    pub fn dismember(&mut self, world: &mut PhysicsWorld, rng: &mut u32) -> bool {
        let Some(shoulders) = self.shoulders.take() else {
            return false;
        };
        for joint in shoulders {
            world.remove_joint(joint);
        }

        // The rotation lock only lifts on the next step, so the spin impulse
        // goes in as a velocity.
        let torso = self.torso();
        world.set_rotation_locked(torso, false);
        world.set_angular_velocity(torso, DISMEMBER_SPIN / self.torso_inertia);

        for body in self.parts {
            world.set_collision_groups(body, CAT_NONE, if body == torso { TORSO_FILTER } else { LIMB_FILTER });
            let force = Vec2::new(
                range_f32(rng, -SCATTER_FORCE, SCATTER_FORCE),
                range_f32(rng, -SCATTER_FORCE, SCATTER_FORCE),
            );
            world.apply_force(body, force);
        }
        true
    }

    pub fn is_dismembered(&self) -> bool {
        self.shoulders.is_none()
    }

    #[inline]
    pub fn body(&self, part: Part) -> BodyRef {
        self.parts[part.index()]
    }

    pub fn torso(&self) -> BodyRef {
        self.body(Part::Torso)
    }

    pub fn arm(&self, side: Side) -> BodyRef {
        self.body(Part::arm(side))
    }

    pub fn hand(&self, side: Side) -> BodyRef {
        self.body(Part::hand(side))
    }

    pub fn sensor(&self, side: Side) -> SensorRef {
        self.sensors[side.index()]
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// `hand_mass * reach^2 + arm_inertia`, the lever the catch impulses use.
    pub fn swing_inertia(&self) -> f32 {
        self.swing_inertia
    }

    pub fn is_alive(&self, world: &PhysicsWorld) -> bool {
        self.parts.iter().all(|&b| world.contains(b))
    }

    pub fn has_body(&self, body: BodyRef) -> bool {
        self.parts.contains(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build() -> (PhysicsWorld, LimbChain) {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -9.8));
        let chain = LimbChain::build(&mut world, &SlothConfig::default(), Vec2::new(2.0, 5.0)).unwrap();
        (world, chain)
    }

    #[test]
    fn builds_five_bodies_four_joints() {
        let (world, chain) = build();
        assert_eq!(world.body_count(), 5);
        assert_eq!(world.joint_count(), 4);
        assert!(chain.is_alive(&world));
        assert!(!chain.is_dismembered());
    }

    #[test]
    fn parts_start_on_their_anchors() {
        let (world, chain) = build();
        let torso = world.position(chain.torso()).unwrap();
        assert_eq!(torso, Vec2::new(2.0, 5.0));

        let right = world.position(chain.arm(Side::Right)).unwrap();
        let left = world.position(chain.arm(Side::Left)).unwrap();
        assert!(right.distance(Vec2::new(2.625, 5.1)) < 1e-5, "{:?}", right);
        assert!(left.distance(Vec2::new(1.375, 5.1)) < 1e-5, "{:?}", left);

        let rh = world.position(chain.hand(Side::Right)).unwrap();
        let lh = world.position(chain.hand(Side::Left)).unwrap();
        assert!(rh.distance(Vec2::new(3.0, 5.1)) < 1e-5, "{:?}", rh);
        assert!(lh.distance(Vec2::new(1.0, 5.1)) < 1e-5, "{:?}", lh);
    }

    #[test]
    fn swing_inertia_matches_box_formula() {
        let (_, chain) = build();
        let s = 1.0 / 1.5;
        let hand = BoxMass::of(10.0, 0.1 * s, 0.1 * s);
        let arm = BoxMass::of(1.0, 1.75 * s, 0.5 * s);
        let expected = hand.mass * 1.25 * 1.25 + arm.inertia;
        assert!((chain.swing_inertia() - expected).abs() < 1e-6);
    }

    #[test]
    fn teardown_leaves_nothing_behind() {
        let (mut world, mut chain) = build();
        chain.teardown(&mut world);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.joint_count(), 0);
    }

    #[test]
    fn rebuild_moves_the_chain() {
        let (mut world, mut chain) = build();
        let old_torso = chain.torso();
        chain.rebuild(&mut world, &SlothConfig::default(), Vec2::new(-4.0, 0.0)).unwrap();
        assert!(!world.contains(old_torso));
        assert_eq!(world.body_count(), 5);
        assert_eq!(world.joint_count(), 4);
        assert_eq!(world.position(chain.torso()), Some(Vec2::new(-4.0, 0.0)));
    }

    #[test]
    fn dismember_only_once() {
        let (mut world, mut chain) = build();
        let mut rng = 7;
        assert!(chain.dismember(&mut world, &mut rng));
        assert_eq!(world.joint_count(), 2);
        assert!(!chain.dismember(&mut world, &mut rng));
        world.step(1.0 / 60.0);
        assert!(world.angular_velocity(chain.torso()).unwrap() != 0.0);
    }
}
