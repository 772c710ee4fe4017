use sphere_burst_engine::{
    create_backend, BackendKind, CpuBackend, SimError, SimulationCore, SpawnSource, Vec3,
    WorldConfig,
};

#[test]
fn json_config_drives_a_run() {
    let json = r#"{
        "particleCount": 27,
        "boundsExtent": [4.0, 6.0, 4.0],
        "gravityScale": 0.5,
        "multithreaded": false,
        "spawnOffset": [0.0, 1.0, 0.0],
        "seed": 99
    }"#;
    let spawn = SpawnSource::grid(3, 1.2, Vec3::splat(-1.2)).unwrap();
    let mut core = SimulationCore::from_json(json, spawn).unwrap();

    assert_eq!(core.particle_count(), 27);
    assert_eq!(core.backend_name(), "cpu-sequential");
    assert_eq!(core.config().effective_gravity(), Vec3::new(0.0, -4.905, 0.0));
    assert!(core.particles().iter().all(|p| p.is_static));

    core.set_trigger(Vec3::new(0.0, 1.0, 0.0));
    let report = core.step(core.config().fixed_dt).unwrap();
    assert_eq!(report.tick, 1);
    assert!(report.activated >= 1);
}

#[test]
fn config_round_trips_through_json() {
    let config = WorldConfig { particle_count: 10, activation_impulse: true, ..WorldConfig::default() };
    let parsed = WorldConfig::from_json(&config.to_json()).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn misconfiguration_is_fatal() {
    let spawn = || SpawnSource::grid(2, 1.0, Vec3::ZERO).unwrap();
    for json in [
        r#"{ "particleCount": 0 }"#,
        r#"{ "sphereRadius": -1.0 }"#,
        r#"{ "restitutionLoss": 1.5 }"#,
        r#"{ "batchSize": 0 }"#,
        r#"{ "boundsExtent": [1.0, -1.0, 1.0] }"#,
    ] {
        assert!(
            matches!(SimulationCore::from_json(json, spawn()), Err(SimError::InvalidConfig(_))),
            "{} should be rejected",
            json
        );
    }
    assert!(matches!(
        WorldConfig::from_json(r#"{ "backend": "quantum" }"#),
        Err(SimError::ConfigParse(_))
    ));
    assert_eq!(SpawnSource::from_flat(&[]), Err(SimError::EmptySpawnSource));
}

#[test]
fn backend_follows_the_config() {
    let cpu = create_backend(&WorldConfig { multithreaded: true, ..WorldConfig::default() }).unwrap();
    assert_eq!(cpu.name(), "cpu-parallel");

    let gpu_config = WorldConfig { backend: BackendKind::Gpu, ..WorldConfig::default() };
    match create_backend(&gpu_config) {
        Ok(backend) => assert_eq!(backend.name(), "gpu"),
        Err(err) => assert!(matches!(err, SimError::GpuUnavailable(_)), "{}", err),
    }
}

#[test]
fn injected_backend_is_used() {
    let spawn = SpawnSource::grid(2, 1.5, Vec3::ZERO).unwrap();
    let config = WorldConfig { particle_count: 8, ..WorldConfig::default() };
    let core = SimulationCore::with_backend(config, spawn, Box::new(CpuBackend::sequential())).unwrap();
    assert_eq!(core.backend_name(), "cpu-sequential");
}
