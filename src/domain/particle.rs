use crate::core::Vec3;

/// One simulated sphere (point mass, linear velocity only)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// World-space center
    pub position: Vec3,
    pub velocity: Vec3,
    /// Excluded from gravity, bounds and collision until activated
    pub is_static: bool,
}

impl Particle {
    pub fn new_static(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity, is_static: true }
    }

    pub fn new_dynamic(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity, is_static: false }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// Index -> physical state for every particle of a run.
///
/// Owned by the simulation core; backends borrow it for exactly one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn dynamic_count(&self) -> usize {
        self.particles.iter().filter(|p| !p.is_static).count()
    }

    /// Fraction of particles no longer static (0 for an empty store)
    pub fn active_fraction(&self) -> f32 {
        if self.particles.is_empty() {
            return 0.0;
        }
        self.dynamic_count() as f32 / self.particles.len() as f32
    }

    pub fn non_finite_count(&self) -> usize {
        self.particles.iter().filter(|p| !p.is_finite()).count()
    }
}

impl From<Vec<Particle>> for ParticleStore {
    fn from(particles: Vec<Particle>) -> Self {
        Self::new(particles)
    }
}
