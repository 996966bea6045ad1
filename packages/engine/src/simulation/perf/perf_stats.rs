use wasm_bindgen::prelude::*;

#[wasm_bindgen]
#[derive(Clone)]
pub struct PerfStats {
    pub(super) step_ms: f64,
    pub(super) input_ms: f64,
    pub(super) control_ms: f64,
    pub(super) apply_ms: f64,
    pub(super) physics_ms: f64,
    pub(super) grab_ms: f64,
    pub(super) refresh_ms: f64,
    pub(super) actor_count: u32,
    pub(super) body_count: u32,
    pub(super) joint_count: u32,
    pub(super) grabbing_hands: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

impl Default for PerfStats {
    fn default() -> Self {
        PerfStats {
            step_ms: 0.0,
            input_ms: 0.0,
            control_ms: 0.0,
            apply_ms: 0.0,
            physics_ms: 0.0,
            grab_ms: 0.0,
            refresh_ms: 0.0,
            actor_count: 0,
            body_count: 0,
            joint_count: 0,
            grabbing_hands: 0,
        }
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn input_ms(&self) -> f64 { self.input_ms }
    #[wasm_bindgen(getter)]
    pub fn control_ms(&self) -> f64 { self.control_ms }
    #[wasm_bindgen(getter)]
    pub fn apply_ms(&self) -> f64 { self.apply_ms }
    #[wasm_bindgen(getter)]
    pub fn physics_ms(&self) -> f64 { self.physics_ms }
    #[wasm_bindgen(getter)]
    pub fn grab_ms(&self) -> f64 { self.grab_ms }
    #[wasm_bindgen(getter)]
    pub fn refresh_ms(&self) -> f64 { self.refresh_ms }

    #[wasm_bindgen(getter)]
    pub fn actor_count(&self) -> u32 { self.actor_count }
    #[wasm_bindgen(getter)]
    pub fn body_count(&self) -> u32 { self.body_count }
    #[wasm_bindgen(getter)]
    pub fn joint_count(&self) -> u32 { self.joint_count }
    #[wasm_bindgen(getter)]
    pub fn grabbing_hands(&self) -> u32 { self.grabbing_hands }
}
