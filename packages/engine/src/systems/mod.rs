pub mod physics;
pub mod sloth;
