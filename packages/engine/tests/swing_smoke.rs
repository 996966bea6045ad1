use askew_engine::{ControlInput, Side, Vec2, WorldCore};

#[test]
fn avatar_swings_from_a_branch_without_falling() {
    let mut world = WorldCore::new();
    let id = world.spawn_sloth(0.0, 0.0).unwrap();
    world.add_scenery(0, 1.0, 0.1, 1.0, 0.1, true).unwrap();

    // Hang from the right hand and pump the free arm.
    for frame in 0..240 {
        let push = if (frame / 40) % 2 == 0 { 1.0 } else { -1.0 };
        world.set_input(id, ControlInput::new(Vec2::new(push, 0.0), Vec2::ZERO, false, true));
        world.step();
    }

    let actor = world.actor(id).unwrap();
    assert!(actor.is_grabbing(Side::Right));
    assert!(!actor.is_grabbing(Side::Left));
    assert_eq!(actor.air_time(), 0);
    let pos = actor.position(world.physics()).unwrap();
    assert!(pos.x.is_finite() && pos.y.is_finite());
    assert!(pos.distance(Vec2::new(1.0, 0.1)) < 5.0);
}
