use serde::Serialize;

use crate::core::math::Vec2;
use crate::systems::physics::SceneryKind;
use crate::systems::sloth::ActorSnapshot;

use super::WorldCore;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenerySnapshot {
    pub id: u32,
    pub kind: Option<SceneryKind>,
    pub position: Vec2,
    pub angle: f32,
    pub grabbed: bool,
}

/// Per-frame state handed to the renderer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub frame: u64,
    pub actors: Vec<ActorSnapshot>,
    pub scenery: Vec<ScenerySnapshot>,
}

pub(super) fn snapshot(world: &WorldCore) -> WorldSnapshot {
    let physics = &world.physics;
    let actors = world.actors.values().map(|slot| slot.actor.snapshot(physics)).collect();
    let scenery = world
        .scenery
        .iter()
        .filter(|(_, body)| physics.contains(**body))
        .map(|(&id, &body)| ScenerySnapshot {
            id,
            kind: physics.grabbable_kind(body),
            position: physics.position(body).unwrap_or_default(),
            angle: physics.angle(body).unwrap_or(0.0),
            grabbed: physics.is_grabbed(body),
        })
        .collect();
    WorldSnapshot { frame: world.frame, actors, scenery }
}

pub(super) fn snapshot_json(world: &WorldCore) -> String {
    serde_json::to_string(&snapshot(world)).unwrap_or_else(|err| {
        console_log!("snapshot serialization failed: {}", err);
        String::from("{}")
    })
}
