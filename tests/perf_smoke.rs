use sphere_burst_engine::{CpuBackend, SimulationCore, SpawnSource, Vec3, WorldConfig};

#[test]
fn perf_smoke_step() {
    let config = WorldConfig { particle_count: 512, ..WorldConfig::default() };
    let spawn = SpawnSource::grid(8, 1.1, Vec3::splat(-3.85)).unwrap();
    let mut core = SimulationCore::with_backend(config, spawn, Box::new(CpuBackend::default())).unwrap();
    core.enable_perf_metrics(true);
    core.set_trigger(Vec3::ZERO);
    core.request_activation();
    for _ in 0..10 {
        core.step(0.005).unwrap();
    }
    let stats = core.perf_stats();
    assert!(stats.step_ms() >= 0.0);
    assert!(stats.collide_ms() >= 0.0);
    assert_eq!(stats.particles_processed(), 512);
    assert!(stats.dynamic_count() > 0);
    assert_eq!(stats.non_finite(), 0);
}
