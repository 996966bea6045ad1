#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::systems::sloth::Side;

use super::{ActorSlot, StepClock, WorldCore};

/// One fixed tick.
///
/// Torques are computed from a frame sampled before any of them is written,
/// so actors never see each other's half-applied control. The world is
/// stepped once for everybody, then grabs are resolved against the contacts
/// of the new positions.
pub(super) fn step(world: &mut WorldCore) {
    let clock = StepClock::new(world.perf_enabled);
    if clock.is_on() {
        world.perf_stats.reset();
        world.perf_stats.actor_count = world.actors.len() as u32;
    }

    // === INPUT ===
    let ms = clock.phase(|| latch_inputs(world));
    world.perf_stats.input_ms = ms;

    // === CONTROL ===
    let ms = clock.phase(|| compute_torques(world));
    world.perf_stats.control_ms = ms;
    let ms = clock.phase(|| apply_torques(world));
    world.perf_stats.apply_ms = ms;

    // === PHYSICS ===
    let dt = world.config.dt();
    let ms = clock.phase(|| world.physics.step(dt));
    world.perf_stats.physics_ms = ms;

    // === GRABS ===
    let ms = clock.phase(|| update_grabs(world));
    world.perf_stats.grab_ms = ms;
    let ms = clock.phase(|| refresh(world));
    world.perf_stats.refresh_ms = ms;

    world.frame += 1;

    if let Some(total) = clock.total_ms() {
        world.perf_stats.step_ms = total;
        world.perf_stats.body_count = world.physics.body_count() as u32;
        world.perf_stats.joint_count = world.physics.joint_count() as u32;
        world.perf_stats.grabbing_hands = world
            .actors
            .values()
            .map(|slot| Side::BOTH.iter().filter(|&&side| slot.actor.is_grabbing(side)).count() as u32)
            .sum();
    }
}

fn latch_inputs(world: &mut WorldCore) {
    let physics = &mut world.physics;
    for slot in world.actors.values_mut() {
        slot.actor.apply_controls(slot.input);
        slot.actor.sample_frame(physics);
    }
}

fn compute_torques(world: &mut WorldCore) {
    #[cfg(feature = "parallel")]
    {
        let mut slots: Vec<&mut ActorSlot> = world.actors.values_mut().collect();
        slots.par_iter_mut().for_each(|slot| {
            slot.actor.compute();
        });
    }
    #[cfg(not(feature = "parallel"))]
    {
        for slot in world.actors.values_mut() {
            compute_one(slot);
        }
    }
}

#[cfg(not(feature = "parallel"))]
#[inline]
fn compute_one(slot: &mut ActorSlot) {
    slot.actor.compute();
}

fn apply_torques(world: &mut WorldCore) {
    let physics = &mut world.physics;
    for slot in world.actors.values_mut() {
        slot.actor.apply_torques(physics);
    }
}

fn update_grabs(world: &mut WorldCore) {
    let physics = &mut world.physics;
    for slot in world.actors.values_mut() {
        slot.actor.update_grabs(physics);
    }
}

fn refresh(world: &mut WorldCore) {
    let physics = &world.physics;
    for slot in world.actors.values_mut() {
        slot.actor.refresh(physics);
    }
}
