use crate::core::math::Vec2;
use crate::domain::filter::CAT_ALL;
use crate::systems::physics::{BodyDesc, Scenery, SceneryKind};
use crate::systems::sloth::{ControlInput, SlothActor};

use super::{ActorSlot, WorldCore};

/// Scenery narrower than this on either axis is rejected.
const MIN_SCENERY_EXTENT: f32 = 1e-3;

pub(super) fn spawn_sloth(world: &mut WorldCore, x: f32, y: f32) -> Result<u32, String> {
    if !x.is_finite() || !y.is_finite() {
        return Err(format!("spawn position ({}, {}) is not finite", x, y));
    }
    let id = world.next_actor_id;
    let actor = SlothActor::spawn(&mut world.physics, world.config.clone(), id, Vec2::new(x, y))?;
    world.next_actor_id = world.next_actor_id.wrapping_add(1);
    world.actors.insert(id, ActorSlot { actor, input: ControlInput::default() });
    console_log!("sloth {} spawned at ({}, {})", id, x, y);
    Ok(id)
}

pub(super) fn despawn_sloth(world: &mut WorldCore, id: u32) -> bool {
    match world.actors.remove(&id) {
        Some(mut slot) => {
            slot.actor.despawn(&mut world.physics);
            console_log!("sloth {} despawned", id);
            true
        }
        None => false,
    }
}

pub(super) fn set_input(world: &mut WorldCore, id: u32, input: ControlInput) -> bool {
    match world.actors.get_mut(&id) {
        Some(slot) => {
            slot.input = ControlInput::new(input.left_stick, input.right_stick, input.left_grab, input.right_grab);
            true
        }
        None => false,
    }
}

pub(super) fn pin_sloth(world: &mut WorldCore, id: u32) -> bool {
    let physics = &mut world.physics;
    world.actors.get_mut(&id).map_or(false, |slot| slot.actor.pin(physics))
}

pub(super) fn dismember_sloth(world: &mut WorldCore, id: u32) -> bool {
    let physics = &mut world.physics;
    world.actors.get_mut(&id).map_or(false, |slot| slot.actor.dismember(physics))
}

pub(super) fn reset_sloth(world: &mut WorldCore, id: u32, x: f32, y: f32) -> Result<(), String> {
    if !x.is_finite() || !y.is_finite() {
        return Err(format!("reset position ({}, {}) is not finite", x, y));
    }
    let physics = &mut world.physics;
    let slot = world.actors.get_mut(&id).ok_or_else(|| format!("no sloth with id {}", id))?;
    slot.input = ControlInput::default();
    slot.actor.reset(physics, Vec2::new(x, y))
}

pub(super) fn add_scenery(world: &mut WorldCore, kind: u8, x: f32, y: f32, w: f32, h: f32, fixed: bool) -> Result<u32, String> {
    let kind = SceneryKind::from_id(kind).ok_or_else(|| format!("unknown scenery kind {}", kind))?;
    if ![x, y, w, h].iter().all(|v| v.is_finite()) {
        return Err("scenery geometry is not finite".to_string());
    }
    if w < MIN_SCENERY_EXTENT || h < MIN_SCENERY_EXTENT {
        return Err(format!("scenery size {}x{} is too small", w, h));
    }

    let desc = if fixed {
        BodyDesc::fixed(w * 0.5, h * 0.5)
    } else {
        BodyDesc::dynamic(w * 0.5, h * 0.5)
    };
    let body = world
        .physics
        .create_body(&desc.with_position(Vec2::new(x, y)).with_groups(kind.category(), CAT_ALL));
    world.physics.register_grabbable(body, Box::new(Scenery::new(kind)));

    let id = world.next_scenery_id;
    world.next_scenery_id = world.next_scenery_id.wrapping_add(1);
    world.scenery.insert(id, body);
    Ok(id)
}

/// Grips on the removed body are dropped right away.
pub(super) fn remove_scenery(world: &mut WorldCore, id: u32) -> bool {
    let Some(body) = world.scenery.remove(&id) else {
        return false;
    };
    let removed = world.physics.remove_body(body);
    let physics = &mut world.physics;
    for slot in world.actors.values_mut() {
        slot.actor.prune_grips(physics);
    }
    removed
}
