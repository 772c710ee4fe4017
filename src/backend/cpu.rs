use crate::core::SimError;
use crate::domain::{Particle, ParticleStore, TickInput, TickStats, WorldConfig};
use crate::simulation::PerfTimer;
use crate::systems::physics::{
    advance_motion, resolve_against_snapshot, resolve_sequential, ActivationPlan, CollisionStats,
    MotionParams,
};

use super::StepBackend;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// CPU executor.
///
/// - `multithreaded = false`: one sweep over the store; particle `i` runs
///   motion, then collides against every `j` (both sides written), then
///   activation. Gauss-Seidel ordering, the reference behaviour.
/// - `multithreaded = true`: two phases over `batch_size` chunks. Phase A runs
///   motion for everyone, phase B resolves each `i` against a frozen copy of
///   phase A and only writes `i`. Race free and independent of thread
///   scheduling; numerically differs from the sequential sweep once contacts
///   occur.
pub struct CpuBackend {
    multithreaded: bool,
    batch_size: usize,
    snapshot: Vec<Particle>,
}

impl CpuBackend {
    pub fn new(multithreaded: bool, batch_size: usize) -> Self {
        Self {
            multithreaded,
            batch_size: batch_size.max(1),
            snapshot: Vec::new(),
        }
    }

    pub fn sequential() -> Self {
        Self::new(false, 1)
    }

    pub fn is_multithreaded(&self) -> bool {
        self.multithreaded
    }

    fn tick_sequential(
        particles: &mut [Particle],
        motion: &MotionParams,
        activation: &ActivationPlan,
        sphere_radius: f32,
    ) -> (CollisionStats, u32) {
        let mut collisions = CollisionStats::default();
        let mut activated = 0u32;

        for i in 0..particles.len() {
            let mut current = particles[i];
            advance_motion(&mut current, motion);
            collisions = collisions.merge(resolve_sequential(particles, i, &mut current, sphere_radius));
            if activation.apply(&mut current) {
                activated += 1;
            }
            particles[i] = current;
        }

        (collisions, activated)
    }

    fn motion_phase(&self, particles: &mut [Particle], motion: &MotionParams) {
        #[cfg(feature = "parallel")]
        {
            particles
                .par_chunks_mut(self.batch_size)
                .for_each(|batch| batch.iter_mut().for_each(|p| advance_motion(p, motion)));
        }

        #[cfg(not(feature = "parallel"))]
        {
            particles
                .chunks_mut(self.batch_size)
                .for_each(|batch| batch.iter_mut().for_each(|p| advance_motion(p, motion)));
        }
    }

    fn resolve_phase(
        &self,
        particles: &mut [Particle],
        activation: &ActivationPlan,
        sphere_radius: f32,
    ) -> (CollisionStats, u32) {
        let batch_size = self.batch_size;
        let snapshot = self.snapshot.as_slice();
        let resolve_batch = |(batch_idx, batch): (usize, &mut [Particle])| {
            let mut collisions = CollisionStats::default();
            let mut activated = 0u32;
            for (k, current) in batch.iter_mut().enumerate() {
                let i = batch_idx * batch_size + k;
                collisions = collisions.merge(resolve_against_snapshot(current, i, snapshot, sphere_radius));
                if activation.apply(current) {
                    activated += 1;
                }
            }
            (collisions, activated)
        };
        let merge = |a: (CollisionStats, u32), b: (CollisionStats, u32)| (a.0.merge(b.0), a.1 + b.1);

        #[cfg(feature = "parallel")]
        {
            particles
                .par_chunks_mut(batch_size)
                .enumerate()
                .map(resolve_batch)
                .reduce(|| (CollisionStats::default(), 0), merge)
        }

        #[cfg(not(feature = "parallel"))]
        {
            particles
                .chunks_mut(batch_size)
                .enumerate()
                .map(resolve_batch)
                .fold((CollisionStats::default(), 0), merge)
        }
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new(true, 64)
    }
}

impl StepBackend for CpuBackend {
    fn name(&self) -> &'static str {
        if self.multithreaded {
            "cpu-parallel"
        } else {
            "cpu-sequential"
        }
    }

    fn upload(&mut self, store: &ParticleStore) -> Result<(), SimError> {
        // The store itself is the CPU state; only the scratch buffer is sized here
        self.snapshot.clear();
        self.snapshot.reserve(store.len());
        Ok(())
    }

    fn advance_tick(
        &mut self,
        store: &mut ParticleStore,
        config: &WorldConfig,
        input: &TickInput,
    ) -> Result<TickStats, SimError> {
        let motion = MotionParams::for_tick(config, input.dt);
        let activation = ActivationPlan::for_tick(config, input);
        let radius = config.sphere_radius;
        let particles = store.particles_mut();

        let mut stats = TickStats {
            particles_processed: particles.len() as u32,
            activation_served: activation.explosion.is_some(),
            ..TickStats::default()
        };

        let (collisions, activated) = if self.multithreaded {
            let t0 = PerfTimer::start();
            self.motion_phase(particles, &motion);
            self.snapshot.clear();
            self.snapshot.extend_from_slice(particles);
            stats.integrate_ms = t0.elapsed_ms();

            let t1 = PerfTimer::start();
            let result = self.resolve_phase(particles, &activation, radius);
            stats.collide_ms = t1.elapsed_ms();
            result
        } else {
            let t0 = PerfTimer::start();
            let result = Self::tick_sequential(particles, &motion, &activation, radius);
            stats.collide_ms = t0.elapsed_ms();
            result
        };

        stats.contacts = collisions.contacts;
        stats.degenerate_pairs = collisions.degenerate_pairs;
        stats.activated = activated;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Vec3;

    fn dynamic_pair(gap: f32) -> ParticleStore {
        ParticleStore::new(vec![
            Particle::new_dynamic(Vec3::new(0.0, 0.0, 0.0), Vec3::ZERO),
            Particle::new_dynamic(Vec3::new(gap, 0.0, 0.0), Vec3::ZERO),
        ])
    }

    fn weightless() -> WorldConfig {
        WorldConfig { gravity: Vec3::ZERO, ..WorldConfig::default() }
    }

    #[test]
    fn both_modes_separate_an_overlapping_pair() {
        for multithreaded in [false, true] {
            let mut backend = CpuBackend::new(multithreaded, 1);
            let mut store = dynamic_pair(0.4);
            backend.upload(&store).unwrap();
            let stats = backend
                .advance_tick(&mut store, &weightless(), &TickInput::new(0.01))
                .unwrap();
            assert!(stats.contacts >= 1, "{}: no contact", backend.name());
            let d = store.particles()[0].position.distance(store.particles()[1].position);
            assert!(d >= 1.0 - 1e-5, "{}: distance {}", backend.name(), d);
        }
    }

    #[test]
    fn modes_agree_without_contacts() {
        let config = WorldConfig::default();
        let make = || {
            ParticleStore::new(
                (0..10)
                    .map(|i| Particle::new_dynamic(Vec3::new((i as f32 - 4.5) * 1.05, 0.0, 0.0), Vec3::ZERO))
                    .collect(),
            )
        };
        let mut seq_store = make();
        let mut par_store = make();
        let mut seq = CpuBackend::sequential();
        let mut par = CpuBackend::new(true, 3);
        for _ in 0..40 {
            seq.advance_tick(&mut seq_store, &config, &TickInput::new(0.005)).unwrap();
            par.advance_tick(&mut par_store, &config, &TickInput::new(0.005)).unwrap();
        }
        assert_eq!(seq_store, par_store);
    }

    #[test]
    fn activation_request_is_served_and_counted() {
        let config = WorldConfig { explosion_radius: 2.0, ..weightless() };
        let mut store = ParticleStore::new(vec![
            Particle::new_static(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO),
            Particle::new_static(Vec3::new(4.0, 0.0, 0.0), Vec3::ZERO),
        ]);
        let mut backend = CpuBackend::new(true, 64);
        let input = TickInput::new(0.01).with_trigger(Vec3::ZERO).with_activation_request();
        let stats = backend.advance_tick(&mut store, &config, &input).unwrap();
        assert!(stats.activation_served);
        assert_eq!(stats.activated, 1);
        assert!(!store.particles()[0].is_static);
        assert!(store.particles()[1].is_static);
    }

    #[test]
    fn freshly_activated_particle_moves_next_tick() {
        let config = WorldConfig::default();
        let start = Vec3::new(0.0, 1.0, 0.0);
        let mut store = ParticleStore::new(vec![Particle::new_static(start, Vec3::ZERO)]);
        let mut backend = CpuBackend::sequential();
        backend
            .advance_tick(&mut store, &config, &TickInput::new(0.01).with_trigger(start))
            .unwrap();
        assert!(!store.particles()[0].is_static);
        assert_eq!(store.particles()[0].position, start);

        backend.advance_tick(&mut store, &config, &TickInput::new(0.01)).unwrap();
        assert!(store.particles()[0].position.y < start.y);
    }
}
