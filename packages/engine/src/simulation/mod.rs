//! World - avatars swinging through a rigid-body level
//!
//! `WorldCore` only orchestrates: the avatars live in `systems::sloth`, the
//! rigid-body world in `systems::physics`. Each concern of the core sits in
//! its own file below and works on `&mut WorldCore`.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::math::Vec2;
use crate::domain::config::SlothConfig;
use crate::systems::physics::{BodyRef, PhysicsWorld};
use crate::systems::sloth::{ControlInput, SlothActor};

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "step/step.rs"]
mod step;
#[path = "commands/commands.rs"]
mod commands;
#[path = "snapshot/snapshot.rs"]
mod snapshot;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
mod facade;

pub use facade::World;
pub use perf_stats::PerfStats;
pub use snapshot::{ScenerySnapshot, WorldSnapshot};

use perf_timer::StepClock;

/// An avatar and the input it plays with until told otherwise.
pub(crate) struct ActorSlot {
    pub(crate) actor: SlothActor,
    pub(crate) input: ControlInput,
}

/// The simulation world
pub struct WorldCore {
    config: Arc<SlothConfig>,
    physics: PhysicsWorld,
    actors: BTreeMap<u32, ActorSlot>,
    scenery: BTreeMap<u32, BodyRef>,

    // Settings
    gravity: Vec2,

    // State
    next_actor_id: u32,
    next_scenery_id: u32,
    frame: u64,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl WorldCore {
    /// Create a world with the shipped tunables.
    pub fn new() -> Self {
        init::create_world_core(SlothConfig::default())
    }

    pub fn with_config(config: SlothConfig) -> Self {
        init::create_world_core(config)
    }

    /// Parse and install a `config.json` blob. Avatars spawned afterwards use
    /// it; existing ones keep the config they were built with.
    pub fn load_config_json(&mut self, json: &str) -> Result<(), String> {
        settings::load_config_json(self, json)
    }

    pub fn config(&self) -> &SlothConfig {
        &self.config
    }

    pub fn frame(&self) -> u64 { self.frame }

    pub fn actor_count(&self) -> usize { self.actors.len() }

    pub fn scenery_count(&self) -> usize { self.scenery.len() }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Get last step perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    pub fn set_gravity(&mut self, x: f32, y: f32) {
        settings::set_gravity(self, x, y);
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    // === AVATARS ===

    /// Spawn an avatar with its torso at `(x, y)`. Returns its id.
    pub fn spawn_sloth(&mut self, x: f32, y: f32) -> Result<u32, String> {
        commands::spawn_sloth(self, x, y)
    }

    pub fn despawn_sloth(&mut self, id: u32) -> bool {
        commands::despawn_sloth(self, id)
    }

    /// Input used from the next step on, until replaced.
    pub fn set_input(&mut self, id: u32, input: ControlInput) -> bool {
        commands::set_input(self, id, input)
    }

    pub fn pin_sloth(&mut self, id: u32) -> bool {
        commands::pin_sloth(self, id)
    }

    pub fn dismember_sloth(&mut self, id: u32) -> bool {
        commands::dismember_sloth(self, id)
    }

    pub fn reset_sloth(&mut self, id: u32, x: f32, y: f32) -> Result<(), String> {
        commands::reset_sloth(self, id, x, y)
    }

    pub fn actor(&self, id: u32) -> Option<&SlothActor> {
        self.actors.get(&id).map(|slot| &slot.actor)
    }

    // === SCENERY ===

    /// Add a box of level geometry centered at `(x, y)`. Returns its id.
    pub fn add_scenery(&mut self, kind: u8, x: f32, y: f32, w: f32, h: f32, fixed: bool) -> Result<u32, String> {
        commands::add_scenery(self, kind, x, y, w, h, fixed)
    }

    /// Remove level geometry, even while an avatar holds on to it.
    pub fn remove_scenery(&mut self, id: u32) -> bool {
        commands::remove_scenery(self, id)
    }

    pub fn scenery_body(&self, id: u32) -> Option<BodyRef> {
        self.scenery.get(&id).copied()
    }

    // === STEP ===

    /// Advance one fixed tick.
    pub fn step(&mut self) {
        step::step(self);
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        snapshot::snapshot(self)
    }

    pub fn snapshot_json(&self) -> String {
        snapshot::snapshot_json(self)
    }
}

impl Default for WorldCore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
