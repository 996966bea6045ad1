use std::sync::Arc;

use super::*;
use crate::core::math::Vec2;
use crate::domain::config::{ControlMode, MovementMode, SlothConfig};
use crate::domain::filter::{CAT_ALL, CAT_VINE};
use crate::systems::physics::{BodyDesc, BodyRef, PhysicsWorld, Scenery, SceneryKind};

const DT: f32 = 1.0 / 60.0;

fn world_without_gravity() -> PhysicsWorld {
    PhysicsWorld::new(Vec2::ZERO)
}

fn spawn(world: &mut PhysicsWorld, config: SlothConfig) -> SlothActor {
    SlothActor::spawn(world, Arc::new(config), 1, Vec2::ZERO).unwrap()
}

fn branch(world: &mut PhysicsWorld, at: Vec2) -> BodyRef {
    let body = world.create_body(&BodyDesc::fixed(0.5, 0.05).with_position(at).with_groups(CAT_VINE, CAT_ALL));
    world.register_grabbable(body, Box::new(Scenery::new(SceneryKind::Branch)));
    body
}

/// One full tick in world order.
fn tick(world: &mut PhysicsWorld, actor: &mut SlothActor, input: ControlInput) -> TorqueOutput {
    actor.apply_controls(input);
    let out = actor.control(world);
    world.step(DT);
    actor.update(world);
    out
}

fn grab_both() -> ControlInput {
    ControlInput::new(Vec2::ZERO, Vec2::ZERO, true, true)
}

#[test]
fn left_stick_right_moves_only_left_arm() {
    let mut world = world_without_gravity();
    let mut actor = spawn(&mut world, SlothConfig::default());
    actor.apply_controls(ControlInput::new(Vec2::new(1.0, 0.0), Vec2::ZERO, false, false));
    let out = actor.control(&mut world);
    assert!(out.left.torque.abs() > 1.0);
    assert!(out.left.apply);
    assert_eq!(out.right.torque, 0.0);
}

#[test]
fn hands_grab_overlapping_branches() {
    let mut world = world_without_gravity();
    let mut actor = spawn(&mut world, SlothConfig::default());
    let left = branch(&mut world, Vec2::new(-1.0, 0.1));
    let right = branch(&mut world, Vec2::new(1.0, 0.1));

    tick(&mut world, &mut actor, grab_both());
    assert!(actor.is_grabbing(Side::Left));
    assert!(actor.is_grabbing(Side::Right));
    assert!(world.is_grabbed(left) && world.is_grabbed(right));
    assert_eq!(actor.grabs().target(Side::Left), Some(left));
    assert_eq!(actor.air_time(), 0);

    let leftmost = actor.leftmost_target(&world).unwrap();
    assert!(leftmost.distance(Vec2::new(-1.0, 0.1)) < 1e-5);

    tick(&mut world, &mut actor, ControlInput::default());
    assert!(!actor.grabs().is_grabbing());
    assert!(!world.is_grabbed(left));
}

#[test]
fn spinning_arm_triggers_anti_gimp_on_both_arms() {
    let mut world = world_without_gravity();
    let mut actor = spawn(&mut world, SlothConfig::default());
    branch(&mut world, Vec2::new(-1.0, 0.1));
    branch(&mut world, Vec2::new(1.0, 0.1));
    tick(&mut world, &mut actor, grab_both());
    assert!(actor.is_grabbing(Side::Left) && actor.is_grabbing(Side::Right));

    // The controller sees twice the body rate, so 15 rad/s reads as 30.
    let left_arm = actor.chain().arm(Side::Left);
    world.set_angular_velocity(left_arm, 15.0);
    world.set_angular_velocity(actor.chain().arm(Side::Right), 0.0);
    actor.apply_controls(ControlInput::new(Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0), true, true));
    let out = actor.control(&mut world);
    assert!((out.gimp_scale - (-2.0f32).exp()).abs() < 1e-4, "{}", out.gimp_scale);
}

#[test]
fn air_time_counts_up_and_scares() {
    let mut world = PhysicsWorld::new(Vec2::new(0.0, -9.8));
    let mut actor = spawn(&mut world, SlothConfig::default());
    for _ in 0..60 {
        tick(&mut world, &mut actor, ControlInput::default());
    }
    assert_eq!(actor.air_time(), 60);
    assert!(!actor.is_scared());
    tick(&mut world, &mut actor, ControlInput::default());
    assert!(actor.is_scared());
}

fn one_arm(movement_mode: MovementMode) -> SlothConfig {
    let mut config = SlothConfig::default();
    config.control_mode = ControlMode::OneArm;
    config.movement_mode = movement_mode;
    config
}

#[test]
fn one_arm_toggle_swap_keeps_a_hand_on() {
    let mut world = world_without_gravity();
    let mut actor = spawn(&mut world, one_arm(MovementMode::GrabToggle));
    let left = branch(&mut world, Vec2::new(-1.0, 0.1));
    let right = branch(&mut world, Vec2::new(1.0, 0.1));
    let press = ControlInput::new(Vec2::ZERO, Vec2::ZERO, false, true);
    let up = ControlInput::default();

    // First press: the button hand (right) takes hold.
    tick(&mut world, &mut actor, press);
    assert!(actor.is_grabbing(Side::Right));
    assert!(!actor.is_grabbing(Side::Left));
    assert!(world.is_grabbed(right));

    // Right anchored: the stick drives the free left arm.
    assert_eq!(actor.controlled_arm(), Some(Side::Left));
    let out = tick(&mut world, &mut actor, up);
    assert_eq!(out.driven, Some(Side::Left));
    assert!(actor.is_grabbing(Side::Right));

    // Second press with a branch under the free hand: atomic swap.
    tick(&mut world, &mut actor, press);
    assert!(actor.is_grabbing(Side::Left));
    assert!(!actor.is_grabbing(Side::Right));
    assert!(actor.grabs().did_safe_grab());
    assert!(world.is_grabbed(left) && !world.is_grabbed(right));

    // Letting the button up afterwards keeps the new grip.
    tick(&mut world, &mut actor, up);
    assert!(actor.is_grabbing(Side::Left));
    assert!(!actor.is_grabbing(Side::Right));
    assert_eq!(actor.air_time(), 0);

    // Left anchored now: the left stick is routed to the right arm.
    assert_eq!(actor.controlled_arm(), Some(Side::Right));
    let out = tick(&mut world, &mut actor, up);
    assert_eq!(out.driven, Some(Side::Right));
    assert!(actor.is_grabbing(Side::Left));
}

#[test]
fn one_arm_held_button_does_not_swap() {
    let mut world = world_without_gravity();
    let mut actor = spawn(&mut world, one_arm(MovementMode::GrabNormal));
    let left = branch(&mut world, Vec2::new(-1.0, 0.1));
    branch(&mut world, Vec2::new(1.0, 0.1));
    let press = ControlInput::new(Vec2::ZERO, Vec2::ZERO, false, true);

    for _ in 0..3 {
        tick(&mut world, &mut actor, press);
        assert!(actor.is_grabbing(Side::Right));
        assert!(!actor.is_grabbing(Side::Left));
        assert!(!actor.grabs().did_safe_grab());
    }
    assert!(!world.is_grabbed(left));
}

#[test]
fn one_arm_reverse_swaps_on_press() {
    let mut world = world_without_gravity();
    let mut actor = spawn(&mut world, one_arm(MovementMode::GrabReverse));
    branch(&mut world, Vec2::new(-1.0, 0.1));
    branch(&mut world, Vec2::new(1.0, 0.1));
    let press = ControlInput::new(Vec2::ZERO, Vec2::ZERO, false, true);

    // Button up means hold on.
    tick(&mut world, &mut actor, ControlInput::default());
    assert!(actor.is_grabbing(Side::Right));

    tick(&mut world, &mut actor, press);
    assert!(actor.is_grabbing(Side::Left));
    assert!(!actor.is_grabbing(Side::Right));

    // Still down: waiting for the release, no letting go.
    tick(&mut world, &mut actor, press);
    assert!(actor.is_grabbing(Side::Left));
    tick(&mut world, &mut actor, ControlInput::default());
    assert!(actor.is_grabbing(Side::Left));
}

#[test]
fn grab_toggle_holds_after_button_is_let_go() {
    let mut config = SlothConfig::default();
    config.movement_mode = MovementMode::GrabToggle;
    let mut world = world_without_gravity();
    let mut actor = spawn(&mut world, config);
    branch(&mut world, Vec2::new(1.0, 0.1));

    tick(&mut world, &mut actor, ControlInput::new(Vec2::ZERO, Vec2::ZERO, false, true));
    assert!(actor.is_grabbing(Side::Right));
    tick(&mut world, &mut actor, ControlInput::default());
    assert!(actor.is_grabbing(Side::Right));
    tick(&mut world, &mut actor, ControlInput::new(Vec2::ZERO, Vec2::ZERO, false, true));
    assert!(!actor.is_grabbing(Side::Right));
}

#[test]
fn grabbed_body_removed_elsewhere_is_dropped() {
    let mut world = world_without_gravity();
    let mut actor = spawn(&mut world, SlothConfig::default());
    let right = branch(&mut world, Vec2::new(1.0, 0.1));
    tick(&mut world, &mut actor, grab_both());
    assert!(actor.is_grabbing(Side::Right));

    world.remove_body(right);
    actor.apply_controls(grab_both());
    actor.sample_frame(&mut world);
    assert!(!actor.is_grabbing(Side::Right));
    assert!(actor.rightmost_target(&world).is_none());

    tick(&mut world, &mut actor, grab_both());
    assert!(!actor.is_grabbing(Side::Right));
}

#[test]
fn pinned_torso_stays_put() {
    let mut world = PhysicsWorld::new(Vec2::new(0.0, -9.8));
    let mut actor = spawn(&mut world, SlothConfig::default());
    assert!(actor.pin(&mut world));
    assert!(!actor.pin(&mut world));
    for _ in 0..60 {
        tick(&mut world, &mut actor, ControlInput::default());
    }
    assert!(actor.position(&world).unwrap().length() < 0.1);
    assert!(actor.snapshot(&world).pinned);
}

#[test]
fn dismember_lets_go_and_only_happens_once() {
    let mut world = world_without_gravity();
    let mut actor = spawn(&mut world, SlothConfig::default());
    branch(&mut world, Vec2::new(1.0, 0.1));
    tick(&mut world, &mut actor, grab_both());
    assert!(actor.grabs().is_grabbing());

    assert!(actor.dismember(&mut world));
    assert!(!actor.dismember(&mut world));
    assert!(!actor.grabs().is_grabbing());

    tick(&mut world, &mut actor, grab_both());
    assert!(!actor.grabs().is_grabbing());
    assert!(actor.snapshot(&world).dismembered);
}

#[test]
fn despawn_and_reset_clean_up() {
    let mut world = world_without_gravity();
    let mut actor = spawn(&mut world, SlothConfig::default());
    let extra = branch(&mut world, Vec2::new(1.0, 0.1));
    tick(&mut world, &mut actor, grab_both());
    actor.pin(&mut world);

    actor.reset(&mut world, Vec2::new(5.0, 5.0)).unwrap();
    assert!(!actor.is_pinned());
    assert!(!world.is_grabbed(extra));
    assert_eq!(actor.position(&world), Some(Vec2::new(5.0, 5.0)));

    actor.despawn(&mut world);
    assert_eq!(world.body_count(), 1);
    assert_eq!(world.joint_count(), 0);
}

#[test]
fn snapshot_serializes() {
    let mut world = world_without_gravity();
    let actor = spawn(&mut world, SlothConfig::default());
    let json = serde_json::to_string(&actor.snapshot(&world)).unwrap();
    assert!(json.contains("\"airTime\":0"));
    assert!(json.contains("\"facing\":\"Front\""));
}
