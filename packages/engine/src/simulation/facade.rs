use wasm_bindgen::prelude::*;

use crate::core::math::Vec2;
use crate::systems::sloth::ControlInput;

use super::perf_stats::PerfStats;
use super::WorldCore;

#[wasm_bindgen]
pub struct World {
    core: WorldCore,
}

#[wasm_bindgen]
impl World {
    /// Create a world with the shipped tunables
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { core: WorldCore::new() }
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 { self.core.frame() }

    #[wasm_bindgen(getter)]
    pub fn actor_count(&self) -> usize { self.core.actor_count() }

    #[wasm_bindgen(getter)]
    pub fn scenery_count(&self) -> usize { self.core.scenery_count() }

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Get last step perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }

    pub fn set_gravity(&mut self, x: f32, y: f32) {
        self.core.set_gravity(x, y);
    }

    pub fn load_config(&mut self, json: String) -> Result<(), JsValue> {
        self.core
            .load_config_json(&json)
            .map_err(|e| JsValue::from_str(&e))?;
        Ok(())
    }

    pub fn get_config_json(&self) -> String {
        self.core.config().to_json()
    }

    // === SLOTH API ===

    /// Spawn an avatar with its torso at (x, y)
    /// Returns the avatar ID
    pub fn spawn_sloth(&mut self, x: f32, y: f32) -> Result<u32, JsValue> {
        self.core.spawn_sloth(x, y).map_err(|e| JsValue::from_str(&e))
    }

    pub fn despawn_sloth(&mut self, id: u32) -> bool {
        self.core.despawn_sloth(id)
    }

    /// Sticks are clamped to [-1, 1] per axis
    pub fn set_input(
        &mut self,
        id: u32,
        left_x: f32,
        left_y: f32,
        right_x: f32,
        right_y: f32,
        left_grab: bool,
        right_grab: bool,
    ) -> bool {
        let input = ControlInput::new(Vec2::new(left_x, left_y), Vec2::new(right_x, right_y), left_grab, right_grab);
        self.core.set_input(id, input)
    }

    pub fn pin_sloth(&mut self, id: u32) -> bool {
        self.core.pin_sloth(id)
    }

    pub fn dismember_sloth(&mut self, id: u32) -> bool {
        self.core.dismember_sloth(id)
    }

    pub fn reset_sloth(&mut self, id: u32, x: f32, y: f32) -> Result<(), JsValue> {
        self.core.reset_sloth(id, x, y).map_err(|e| JsValue::from_str(&e))
    }

    // === SCENERY API ===

    /// Add a box of level geometry. `kind`: 0 branch, 1 vine, 2 wall, 3 win, 4 lose
    pub fn add_scenery(&mut self, kind: u8, x: f32, y: f32, w: f32, h: f32, fixed: bool) -> Result<u32, JsValue> {
        self.core.add_scenery(kind, x, y, w, h, fixed).map_err(|e| JsValue::from_str(&e))
    }

    pub fn remove_scenery(&mut self, id: u32) -> bool {
        self.core.remove_scenery(id)
    }

    /// Step the simulation forward one fixed tick
    pub fn step(&mut self) {
        self.core.step();
    }

    pub fn snapshot_json(&self) -> String {
        self.core.snapshot_json()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn core(&self) -> &WorldCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut WorldCore {
        &mut self.core
    }
}
