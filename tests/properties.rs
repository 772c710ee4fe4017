use sphere_burst_engine::{
    CpuBackend, Particle, ParticleStore, SimulationCore, SpawnSource, StepBackend, TickInput, Vec3,
    WorldConfig,
};

const DT: f32 = 0.005;

fn run(backend: &mut CpuBackend, store: &mut ParticleStore, config: &WorldConfig, input: TickInput, ticks: usize) {
    for _ in 0..ticks {
        backend.advance_tick(store, config, &input).unwrap();
    }
}

#[test]
fn free_fall_matches_symplectic_euler() {
    let config = WorldConfig { bounds_extent: Vec3::splat(1000.0), ..WorldConfig::default() };
    let g = config.effective_gravity().y;
    let dt = 0.01;
    let n = 50;

    for multithreaded in [false, true] {
        let mut store = ParticleStore::new(vec![Particle::new_dynamic(Vec3::ZERO, Vec3::ZERO)]);
        let mut backend = CpuBackend::new(multithreaded, 8);
        run(&mut backend, &mut store, &config, TickInput::new(dt), n);

        let p = store.particles()[0];
        let expected_v = n as f32 * g * dt;
        let expected_y = g * dt * dt * (n * (n + 1)) as f32 / 2.0;
        assert!((p.velocity.y - expected_v).abs() < 1e-3, "v {} vs {}", p.velocity.y, expected_v);
        assert!((p.position.y - expected_y).abs() < 1e-3, "y {} vs {}", p.position.y, expected_y);
        assert_eq!(p.position.x, 0.0);
    }
}

#[test]
fn particles_stay_inside_the_box() {
    let config = WorldConfig::default();
    let bounds = config.bounds();
    // One particle per column so nothing collides and only the boundary acts
    let mut particles = Vec::new();
    for (k, x) in [-3.0f32, 0.0, 3.0].into_iter().enumerate() {
        for (m, z) in [-3.0f32, 0.0, 3.0].into_iter().enumerate() {
            let vy = 40.0 * (k as f32 - 1.0) + 15.0 * m as f32;
            particles.push(Particle::new_dynamic(Vec3::new(x, 0.0, z), Vec3::new(0.0, vy, 0.0)));
        }
    }
    let mut store = ParticleStore::new(particles);
    let mut lone = ParticleStore::new(vec![Particle::new_dynamic(
        Vec3::new(-4.0, 4.0, -4.0),
        Vec3::new(300.0, -250.0, 120.0),
    )]);

    let mut backend = CpuBackend::new(true, 4);
    for _ in 0..400 {
        backend.advance_tick(&mut store, &config, &TickInput::new(0.02)).unwrap();
        backend.advance_tick(&mut lone, &config, &TickInput::new(0.02)).unwrap();
        for p in store.iter().chain(lone.iter()) {
            assert!(bounds.contains(p.position), "escaped at {:?}", p.position);
        }
    }
}

#[test]
fn collision_overshoot_past_a_face_is_clamped_next_tick() {
    let config = WorldConfig { gravity: Vec3::ZERO, ..WorldConfig::default() };
    let bounds = config.bounds();
    let floor = bounds.min().y;
    let dt = 0.01;
    // `b` slides over `a`, which rests on the floor, and keeps going
    let mut store = ParticleStore::new(vec![
        Particle::new_dynamic(Vec3::new(0.0, floor, 0.0), Vec3::ZERO),
        Particle::new_dynamic(Vec3::new(-2.0, floor + 0.4, 0.0), Vec3::new(200.0, 0.0, 0.0)),
    ]);
    let mut backend = CpuBackend::new(true, 1);

    // Collide runs after the clamp, so the push-out may leave `a` below the floor
    backend.advance_tick(&mut store, &config, &TickInput::new(dt)).unwrap();
    let a = store.particles()[0];
    assert!(a.position.y < floor, "expected overshoot, got {:?}", a.position);

    backend.advance_tick(&mut store, &config, &TickInput::new(dt)).unwrap();
    for p in store.iter() {
        assert!(bounds.contains(p.position), "escaped at {:?}", p.position);
    }
    assert_eq!(store.particles()[0].position.y, floor);
}

#[test]
fn overlapping_dynamic_pair_separates_in_one_tick() {
    let config = WorldConfig { gravity: Vec3::ZERO, ..WorldConfig::default() };
    let r = config.sphere_radius;
    for multithreaded in [false, true] {
        let mut store = ParticleStore::new(vec![
            Particle::new_dynamic(Vec3::new(0.1, 0.0, 0.0), Vec3::ZERO),
            Particle::new_dynamic(Vec3::new(0.4, 0.3, 0.0), Vec3::ZERO),
        ]);
        let mut backend = CpuBackend::new(multithreaded, 1);
        backend.advance_tick(&mut store, &config, &TickInput::new(DT)).unwrap();
        let d = store.particles()[0].position.distance(store.particles()[1].position);
        assert!(d >= 2.0 * r - 1e-5, "multithreaded={} distance {}", multithreaded, d);
    }
}

#[test]
fn static_particles_are_bit_for_bit_unchanged() {
    let config = WorldConfig::default();
    let spawn = SpawnSource::grid(3, 0.6, Vec3::splat(-0.6)).unwrap();
    let source = sphere_burst_engine::simulation::spawn_particles(
        &WorldConfig { particle_count: 27, ..config.clone() },
        &spawn,
    );

    for multithreaded in [false, true] {
        let mut store = source.clone();
        // A dynamic sphere dropped through the static cluster must not move it
        store.particles_mut()[13] = Particle::new_dynamic(Vec3::ZERO, Vec3::new(0.0, -3.0, 0.0));
        let before = store.clone();

        let far = TickInput::new(DT).with_trigger(Vec3::splat(4.5));
        let mut backend = CpuBackend::new(multithreaded, 5);
        run(&mut backend, &mut store, &config, far, 60);

        for (i, (now, then)) in store.iter().zip(before.iter()).enumerate() {
            if then.is_static {
                assert_eq!(now, then, "static particle {} changed", i);
            }
        }
    }
}

#[test]
fn activation_never_reverts() {
    let config = WorldConfig { particle_count: 64, explosion_radius: 2.5, ..WorldConfig::default() };
    let spawn = SpawnSource::grid(4, 1.5, Vec3::splat(-2.25)).unwrap();
    let mut core = SimulationCore::with_backend(config, spawn, Box::new(CpuBackend::new(true, 16))).unwrap();

    let mut was_dynamic = vec![false; core.particle_count()];
    for t in 0..200 {
        // Sweep the trigger across the cluster like a rocket flying past
        let x = -4.0 + 8.0 * t as f32 / 200.0;
        core.set_trigger(Vec3::new(x, 0.75, 0.75));
        if t == 100 {
            core.request_activation();
        }
        core.step(DT).unwrap();
        for (i, p) in core.particles().iter().enumerate() {
            if was_dynamic[i] {
                assert!(!p.is_static, "particle {} reverted to static on tick {}", i, t);
            }
            was_dynamic[i] = !p.is_static;
        }
    }
    assert!(was_dynamic.iter().any(|d| *d));
}

#[test]
fn rebuild_twice_gives_the_same_spawn() {
    let config = WorldConfig { particle_count: 100, ..WorldConfig::default() };
    let spawn = SpawnSource::grid(4, 1.5, Vec3::splat(-2.25)).unwrap();
    let expected = sphere_burst_engine::simulation::spawn_particles(&config, &spawn);
    let mut core = SimulationCore::with_backend(config, spawn, Box::new(CpuBackend::default())).unwrap();

    core.set_trigger(Vec3::ZERO);
    core.request_activation();
    for _ in 0..5 {
        core.step(DT).unwrap();
    }

    core.rebuild().unwrap();
    let first = core.store().clone();
    core.rebuild().unwrap();
    let second = core.store().clone();

    assert_eq!(first, second);
    assert_eq!(first, expected);
    assert_eq!(first.len(), 100);
    assert!(first.iter().all(|p| p.is_static));
    assert_eq!(core.active_fraction(), 0.0);
}
