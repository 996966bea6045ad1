use std::sync::Arc;

use crate::core::math::Vec2;
use crate::domain::config::SlothConfig;

use super::perf_stats::PerfStats;
use super::WorldCore;

pub(super) fn load_config_json(world: &mut WorldCore, json: &str) -> Result<(), String> {
    match SlothConfig::from_json(json) {
        Ok(config) => {
            world.config = Arc::new(config);
            console_log!("config loaded");
            Ok(())
        }
        Err(err) => {
            console_log!("config rejected: {}", err);
            Err(err)
        }
    }
}

pub(super) fn enable_perf_metrics(world: &mut WorldCore, enabled: bool) {
    world.perf_enabled = enabled;
    if !enabled {
        world.perf_stats.reset();
    }
}

pub(super) fn get_perf_stats(world: &WorldCore) -> PerfStats {
    world.perf_stats.clone()
}

pub(super) fn set_gravity(world: &mut WorldCore, x: f32, y: f32) {
    world.gravity = Vec2::new(x, y);
    world.physics.set_gravity(world.gravity);
}
