use crate::core::SimError;
use crate::domain::{Particle, ParticleStore, SpawnSource, WorldConfig};

use super::clock::FixedStepClock;
use super::events::EventQueue;
use super::perf_stats::PerfStats;
use super::random::inside_unit_sphere;
use super::render_extract::InstanceBuffer;
use super::StepBackend;
use super::SimulationCore;

/// Spawn the whole particle set: mirrored source vertex + offset, random
/// velocity inside the unit sphere times `spawn_force`, everything static.
pub fn spawn_particles(config: &WorldConfig, source: &SpawnSource) -> ParticleStore {
    let mut rng_state = config.seed;
    let particles = (0..config.particle_count as usize)
        .map(|i| {
            let position = config.spawn_mirror_axis.apply(source.vertex_for(i)) + config.spawn_offset;
            let velocity = inside_unit_sphere(&mut rng_state) * config.spawn_force;
            Particle::new_static(position, velocity)
        })
        .collect();
    ParticleStore::new(particles)
}

pub(super) fn create_core(
    config: WorldConfig,
    spawn: SpawnSource,
    mut backend: Box<dyn StepBackend>,
) -> Result<SimulationCore, SimError> {
    config.validate()?;
    if spawn.is_empty() {
        return Err(SimError::EmptySpawnSource);
    }

    let store = spawn_particles(&config, &spawn);
    backend.upload(&store)?;

    log::info!(
        "simulation ready: {} particles, backend {}",
        store.len(),
        backend.name()
    );

    let mut render = InstanceBuffer::new(store.len(), config.sphere_radius);
    render.update(&store);

    Ok(SimulationCore {
        clock: FixedStepClock::new(config.fixed_dt),
        config,
        spawn,
        store,
        backend,
        trigger: None,
        activation_request: false,
        events: EventQueue::default(),
        completion_reported: false,
        render,
        tick: 0,
        perf_enabled: false,
        perf_stats: PerfStats::default(),
    })
}

/// Recreate the store from the unchanged configuration and hand it to the backend
pub(super) fn rebuild(core: &mut SimulationCore) -> Result<(), SimError> {
    core.store = spawn_particles(&core.config, &core.spawn);
    core.backend.upload(&core.store)?;
    core.tick = 0;
    core.trigger = None;
    core.activation_request = false;
    core.completion_reported = false;
    core.events.clear();
    core.clock.reset();
    core.perf_stats.reset();
    core.render.resize(core.store.len());
    core.render.update(&core.store);
    log::info!("rebuilt {} particles", core.store.len());
    Ok(())
}
