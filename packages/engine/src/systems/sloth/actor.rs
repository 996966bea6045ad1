//! The playable avatar.
//!
//! One tick runs in the order the world drives it:
//! `apply_controls` → `sample_frame` → `compute` → `apply_torques` →
//! (world step) → `update`. The split lets the simulation sample every
//! actor, compute their torques in parallel, and write them back serially.

use std::sync::Arc;

use serde::Serialize;

use crate::core::math::Vec2;
use crate::core::utils::random::seed;
use crate::domain::config::{ControlMode, SlothConfig};
use crate::systems::physics::{BodyDesc, BodyRef, JointRef, PhysicsWorld, RevoluteDesc};

use super::facing::{Facing, FacingTracker};
use super::grab::GrabController;
use super::input::{ControlInput, GrabButton};
use super::limb::{LimbChain, Side};
use super::torque::{one_arm_driven, ArmCommand, ArmSample, ArmTorqueController, ControlFrame, TorqueOutput};

/// Ticks without a grip before the avatar looks scared.
const SCARED_AIR_TIME: u32 = 60;
const PIN_RADIUS: f32 = 0.5;

pub struct SlothActor {
    id: u32,
    config: Arc<SlothConfig>,
    chain: LimbChain,
    grabs: GrabController,
    controller: ArmTorqueController,
    buttons: [GrabButton; 2],
    input: ControlInput,
    intents: [bool; 2],
    frame: ControlFrame,
    output: TorqueOutput,
    pin: Option<(BodyRef, JointRef)>,
    air_time: u32,
    facing_velocity: f32,
    facing: FacingTracker,
    rng_state: u32,
}

impl SlothActor {
    pub fn spawn(world: &mut PhysicsWorld, config: Arc<SlothConfig>, id: u32, origin: Vec2) -> Result<Self, String> {
        let chain = LimbChain::build(world, &config, origin)?;
        let controller = ArmTorqueController::new(&config, chain.swing_inertia());
        Ok(Self {
            id,
            grabs: GrabController::new(config.layout.shared_anchor_radius),
            controller,
            chain,
            config,
            buttons: [GrabButton::default(); 2],
            input: ControlInput::default(),
            intents: [false; 2],
            frame: ControlFrame::default(),
            output: TorqueOutput::default(),
            pin: None,
            air_time: 0,
            facing_velocity: 0.0,
            facing: FacingTracker::default(),
            rng_state: seed(id.wrapping_mul(0x9E37_79B9)),
        })
    }

    /// Remove grips, pin and limbs from the world.
    pub fn despawn(&mut self, world: &mut PhysicsWorld) {
        self.grabs.release_all(world);
        self.unpin(world);
        self.chain.teardown(world);
    }

    /// Rebuild the limb chain at `origin`, letting go of everything.
    pub fn reset(&mut self, world: &mut PhysicsWorld, origin: Vec2) -> Result<(), String> {
        self.grabs.release_all(world);
        self.unpin(world);
        self.chain.rebuild(world, &self.config, origin)?;
        self.grabs = GrabController::new(self.config.layout.shared_anchor_radius);
        self.controller = ArmTorqueController::new(&self.config, self.chain.swing_inertia());
        self.buttons = [GrabButton::default(); 2];
        self.intents = [false; 2];
        self.output = TorqueOutput::default();
        self.air_time = 0;
        self.facing = FacingTracker::default();
        Ok(())
    }

    // === PER-TICK ===

    /// Latch this tick's input and resolve the grab buttons into intents.
    pub fn apply_controls(&mut self, input: ControlInput) {
        self.input = input;
        let mode = self.config.movement_mode;
        match self.config.control_mode {
            ControlMode::TwoArm => {
                self.intents = [
                    self.buttons[0].resolve(mode, input.left_grab),
                    self.buttons[1].resolve(mode, input.right_grab),
                ];
            }
            ControlMode::OneArm => {
                let intent = self.buttons[0].resolve(mode, input.left_grab || input.right_grab);
                self.intents = [intent; 2];
            }
        }
    }

    /// Read arm state from the world for the controller. Grips lost since the
    /// last update are dropped first so the controller never sees them.
    pub fn sample_frame(&mut self, world: &mut PhysicsWorld) {
        if self.config.control_mode == ControlMode::TwoArm {
            self.grabs.clear_events();
        }
        self.grabs.prune(world);
        let world = &*world;
        let sample = |side: Side| {
            let arm = self.chain.arm(side);
            ArmSample {
                angle: world.angle(arm).unwrap_or(0.0),
                angular_velocity: world.angular_velocity(arm).unwrap_or(0.0),
                grabbing: self.grabs.is_held(side),
            }
        };
        self.frame = ControlFrame {
            left_stick: self.input.left_stick,
            right_stick: self.input.right_stick,
            left: sample(Side::Left),
            right: sample(Side::Right),
            pinned: self.pin.is_some(),
            one_arm_active: match self.config.control_mode {
                ControlMode::OneArm => Some(self.grabs.active_hand()),
                ControlMode::TwoArm => None,
            },
        };
    }

    /// Torques for the sampled frame. Touches only this actor.
    pub fn compute(&mut self) -> TorqueOutput {
        self.output = self.controller.compute(&self.frame);
        self.output
    }

    pub fn apply_torques(&mut self, world: &mut PhysicsWorld) {
        if self.chain.is_dismembered() {
            return;
        }
        for (side, command) in [(Side::Left, self.output.left), (Side::Right, self.output.right)] {
            if command.apply {
                world.apply_torque(self.chain.arm(side), command.torque);
            }
        }
    }

    /// Sample, compute and apply in one go.
    pub fn control(&mut self, world: &mut PhysicsWorld) -> TorqueOutput {
        self.sample_frame(world);
        let output = self.compute();
        self.apply_torques(world);
        output
    }

    /// Drop grips on bodies that were removed from the world.
    pub fn prune_grips(&mut self, world: &mut PhysicsWorld) {
        self.grabs.prune(world);
    }

    /// After the world step: grab mutation, then derived state.
    pub fn update(&mut self, world: &mut PhysicsWorld) {
        self.update_grabs(world);
        self.refresh(world);
    }

    /// Form and break grips from this tick's intents and the hand sensors.
    pub fn update_grabs(&mut self, world: &mut PhysicsWorld) {
        self.grabs.prune(world);
        if self.chain.is_dismembered() {
            return;
        }

        let candidates = [
            world.grab_candidate(self.chain.sensor(Side::Left)),
            world.grab_candidate(self.chain.sensor(Side::Right)),
        ];
        match self.config.control_mode {
            ControlMode::TwoArm => {
                for side in Side::BOTH {
                    if self.intents[side.index()] {
                        self.grabs.grab(world, &self.chain, candidates[side.index()], side);
                    } else {
                        self.grabs.release(world, side);
                    }
                }
            }
            ControlMode::OneArm => {
                let button = self.buttons[0];
                let swapped = self.grabs.set_safe_grab(
                    world,
                    &self.chain,
                    button.is_held(),
                    button.just_pressed(),
                    candidates[0],
                    candidates[1],
                );
                if swapped {
                    // The swap press must not count as a toggle release.
                    self.buttons[0].set_toggled(true);
                    return;
                }
                if self.grabs.waiting_for_safe_release() {
                    return;
                }
                let active = self.grabs.active_hand();
                if self.intents[active.index()] {
                    self.grabs.grab(world, &self.chain, candidates[active.index()], active);
                } else {
                    self.grabs.release(world, active);
                }
            }
        }
    }

    /// Air time and facing.
    pub fn refresh(&mut self, world: &PhysicsWorld) {
        if self.grabs.is_grabbing() {
            self.air_time = 0;
        } else {
            self.air_time = self.air_time.saturating_add(1);
        }
        self.facing_velocity = world.linear_velocity(self.chain.torso()).map_or(0.0, |v| v.x);
        self.facing.update(self.facing_velocity);
    }

    // === EVENTS ===

    /// Fix the torso to a static pin at its spawn point. Catch assists are
    /// switched off while pinned.
    pub fn pin(&mut self, world: &mut PhysicsWorld) -> bool {
        if self.pin.is_some() {
            return false;
        }
        let origin = self.chain.origin();
        let pin = world.create_body(&BodyDesc::fixed(PIN_RADIUS, PIN_RADIUS).with_position(origin).with_groups(0, 0));
        let torso = self.chain.torso();
        match world.create_revolute(&RevoluteDesc::new(pin, Vec2::ZERO, torso, Vec2::ZERO)) {
            Some(joint) => {
                self.pin = Some((pin, joint));
                true
            }
            None => {
                world.remove_body(pin);
                false
            }
        }
    }

    fn unpin(&mut self, world: &mut PhysicsWorld) {
        if let Some((body, joint)) = self.pin.take() {
            world.remove_joint(joint);
            world.remove_body(body);
        }
    }

    pub fn dismember(&mut self, world: &mut PhysicsWorld) -> bool {
        if self.chain.is_dismembered() {
            return false;
        }
        self.grabs.release_all(world);
        let done = self.chain.dismember(world, &mut self.rng_state);
        if done {
            console_log!("sloth {} dismembered", self.id);
        }
        done
    }

    // === QUERIES ===

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn config(&self) -> &SlothConfig {
        &self.config
    }

    pub fn chain(&self) -> &LimbChain {
        &self.chain
    }

    pub fn grabs(&self) -> &GrabController {
        &self.grabs
    }

    pub fn position(&self, world: &PhysicsWorld) -> Option<Vec2> {
        world.position(self.chain.torso())
    }

    pub fn arm_angle(&self, world: &PhysicsWorld, side: Side) -> Option<f32> {
        world.angle(self.chain.arm(side))
    }

    pub fn is_grabbing(&self, side: Side) -> bool {
        self.grabs.is_held(side)
    }

    pub fn power(&self) -> f32 {
        self.controller.power()
    }

    pub fn air_time(&self) -> u32 {
        self.air_time
    }

    pub fn is_scared(&self) -> bool {
        self.air_time > SCARED_AIR_TIME
    }

    pub fn facing_velocity(&self) -> f32 {
        self.facing_velocity
    }

    pub fn facing(&self) -> Facing {
        self.facing.facing()
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }

    pub fn is_dismembered(&self) -> bool {
        self.chain.is_dismembered()
    }

    pub fn last_output(&self) -> &TorqueOutput {
        &self.output
    }

    /// In one-arm mode, the arm that follows the stick.
    pub fn controlled_arm(&self) -> Option<Side> {
        match self.config.control_mode {
            ControlMode::OneArm => Some(one_arm_driven(
                self.grabs.active_hand(),
                self.grabs.is_held(Side::Left),
                self.grabs.is_held(Side::Right),
            )),
            ControlMode::TwoArm => None,
        }
    }

    fn target_position(&self, world: &PhysicsWorld, target: Option<BodyRef>) -> Option<Vec2> {
        target.and_then(|t| world.position(t))
    }

    pub fn leftmost_target(&self, world: &PhysicsWorld) -> Option<Vec2> {
        self.target_position(world, self.grabs.leftmost_target(world))
    }

    pub fn rightmost_target(&self, world: &PhysicsWorld) -> Option<Vec2> {
        self.target_position(world, self.grabs.rightmost_target(world))
    }

    pub fn top_target(&self, world: &PhysicsWorld) -> Option<Vec2> {
        self.target_position(world, self.grabs.top_target(world))
    }

    pub fn bottom_target(&self, world: &PhysicsWorld) -> Option<Vec2> {
        self.target_position(world, self.grabs.bottom_target(world))
    }

    pub fn snapshot(&self, world: &PhysicsWorld) -> ActorSnapshot {
        let arm = |side: Side| ArmSnapshot {
            angle: self.arm_angle(world, side).unwrap_or(0.0),
            heading: self.output_for(side).heading,
            torque: self.output_for(side).torque,
            debug_force: self.output_for(side).debug_force,
            grabbing: self.is_grabbing(side),
            hand: world.position(self.chain.hand(side)).unwrap_or_default(),
        };
        ActorSnapshot {
            id: self.id,
            position: self.position(world).unwrap_or_default(),
            left: arm(Side::Left),
            right: arm(Side::Right),
            power: self.power(),
            air_time: self.air_time,
            scared: self.is_scared(),
            facing_velocity: self.facing_velocity,
            facing: self.facing(),
            pinned: self.is_pinned(),
            dismembered: self.is_dismembered(),
            controlled_arm: self.controlled_arm(),
            most_recently_grabbed: self.grabs.most_recently_grabbed(),
            grabbed_entity: self.grabs.grabbed_event(),
            released_entity: self.grabs.released_event(),
            leftmost_target: self.leftmost_target(world),
            rightmost_target: self.rightmost_target(world),
            top_target: self.top_target(world),
            bottom_target: self.bottom_target(world),
        }
    }

    fn output_for(&self, side: Side) -> &ArmCommand {
        match side {
            Side::Left => &self.output.left,
            Side::Right => &self.output.right,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmSnapshot {
    pub angle: f32,
    pub heading: f32,
    pub torque: f32,
    pub debug_force: Vec2,
    pub grabbing: bool,
    pub hand: Vec2,
}

/// Everything rendering and tutorial logic read from an avatar.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorSnapshot {
    pub id: u32,
    pub position: Vec2,
    pub left: ArmSnapshot,
    pub right: ArmSnapshot,
    pub power: f32,
    pub air_time: u32,
    pub scared: bool,
    pub facing_velocity: f32,
    pub facing: Facing,
    pub pinned: bool,
    pub dismembered: bool,
    pub controlled_arm: Option<Side>,
    pub most_recently_grabbed: Option<Side>,
    pub grabbed_entity: bool,
    pub released_entity: bool,
    pub leftmost_target: Option<Vec2>,
    pub rightmost_target: Option<Vec2>,
    pub top_target: Option<Vec2>,
    pub bottom_target: Option<Vec2>,
}
