use askew_engine::World;

#[test]
fn perf_smoke_step() {
    let mut world = World::new();
    world.enable_perf_metrics(true);
    for i in 0..8 {
        let x = i as f32 * 6.0;
        world.spawn_sloth(x, 0.0).unwrap();
        world.add_scenery(0, x - 1.0, 0.1, 1.0, 0.1, true).unwrap();
        world.add_scenery(0, x + 1.0, 0.1, 1.0, 0.1, true).unwrap();
        world.set_input(i, 0.5, 0.0, -0.5, 0.0, true, true);
    }
    world.step();
    let stats = world.get_perf_stats();
    assert!(stats.step_ms() >= 0.0);
    assert_eq!(stats.actor_count(), 8);
    assert_eq!(stats.grabbing_hands(), 16);
}
