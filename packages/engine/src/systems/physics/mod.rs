//! Rigid-body world the avatars live in.
//!
//! Thin wrapper over rapier2d. Everything outside this module talks in
//! `Vec2`, `BodyRef` and `JointRef`; rapier types stay in here.

mod bodies;
mod grabbable;
mod world;

pub use bodies::{BodyDesc, BodyKind, BodyRef, JointMotor, JointRef, RevoluteDesc, SensorDesc, SensorRef};
pub use grabbable::{Grabbable, Scenery, SceneryKind};
pub use world::PhysicsWorld;
