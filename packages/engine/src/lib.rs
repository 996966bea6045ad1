//! Askew Engine - dual-arm grab-and-swing avatar controller in WASM
//!
//! Architecture:
//! - core/          - Math, logging, RNG
//! - domain/        - Tunables and collision categories
//! - systems/       - Rigid-body world and the avatar itself
//! - simulation/    - Orchestration and the JS facade

// Logging macro must be first for macro export
#[macro_use]
pub mod core;
pub mod domain;
pub mod systems;
pub mod simulation;

pub use systems::physics;
pub use systems::sloth;

use wasm_bindgen::prelude::*;

// Re-export wasm-bindgen-rayon for thread pool initialization
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    console_log!("Askew engine {} initialized", version());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use crate::core::math::Vec2;
pub use domain::config::{ArmTuning, ControlMode, LimbLayout, MovementMode, SlothConfig};
pub use simulation::{PerfStats, World, WorldCore, WorldSnapshot};
pub use sloth::{ActorSnapshot, ControlInput, Side, SlothActor};

// Export scenery kinds for JS
#[wasm_bindgen]
pub fn scenery_branch() -> u8 { 0 }
#[wasm_bindgen]
pub fn scenery_vine() -> u8 { 1 }
#[wasm_bindgen]
pub fn scenery_wall() -> u8 { 2 }
#[wasm_bindgen]
pub fn scenery_win() -> u8 { 3 }
#[wasm_bindgen]
pub fn scenery_lose() -> u8 { 4 }
