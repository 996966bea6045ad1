//! Core helpers shared by every layer: vector math, angle wrapping,
//! logging and the deterministic RNG.

#[macro_use]
pub mod utils;
pub mod math;
