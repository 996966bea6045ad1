use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::math::Vec2;
use crate::domain::config::SlothConfig;
use crate::systems::physics::PhysicsWorld;

use super::perf_stats::PerfStats;
use super::WorldCore;

/// Level gravity; each body scales it by its own gravity scale.
pub(super) const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -9.8);

pub(super) fn create_world_core(config: SlothConfig) -> WorldCore {
    WorldCore {
        config: Arc::new(config),
        physics: PhysicsWorld::new(DEFAULT_GRAVITY),
        actors: BTreeMap::new(),
        scenery: BTreeMap::new(),
        gravity: DEFAULT_GRAVITY,
        next_actor_id: 0,
        next_scenery_id: 0,
        frame: 0,
        perf_enabled: false,
        perf_stats: PerfStats::default(),
    }
}
