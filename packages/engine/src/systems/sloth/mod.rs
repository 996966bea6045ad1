//! Sloth avatar: limb chain, grips, arm controller and the actor tying them
//! together.

mod actor;
mod facing;
mod grab;
mod input;
mod limb;
mod torque;

pub use actor::{ActorSnapshot, ArmSnapshot, SlothActor};
pub use facing::{Facing, FacingTracker};
pub use grab::GrabController;
pub use input::{ControlInput, GrabButton};
pub use limb::{BoxMass, LimbChain, Part, Side};
pub use torque::{
    anti_gimp_scale, arm_heading, one_arm_driven, remap_one_arm, torque_law, ArmCommand, ArmSample,
    ArmTorqueController, ControlFrame, TorqueOutput,
};

#[cfg(test)]
#[path = "tests/actor_tests.rs"]
mod actor_tests;
