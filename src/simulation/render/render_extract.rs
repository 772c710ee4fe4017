use crate::domain::ParticleStore;

pub const FLOATS_PER_TRANSFORM: usize = 16;
pub const FLOATS_PER_POSITION: usize = 3;

/// Render-side transfer buffers, rewritten once per frame from the committed store.
///
/// `transforms` holds one column-major 4x4 matrix per particle (uniform scale,
/// translation in elements 12..15); `positions` is the packed `xyz` stream.
/// A particle whose position is not finite keeps its previous entry.
pub struct InstanceBuffer {
    scale: f32,
    transforms: Vec<f32>,
    positions: Vec<f32>,
}

impl InstanceBuffer {
    pub fn new(count: usize, sphere_radius: f32) -> Self {
        let mut buffer = Self {
            scale: sphere_radius * 2.0,
            transforms: Vec::new(),
            positions: Vec::new(),
        };
        buffer.resize(count);
        buffer
    }

    /// Reset every entry to an identity-at-origin transform with the sphere scale
    pub fn resize(&mut self, count: usize) {
        self.transforms.clear();
        self.transforms.reserve(count * FLOATS_PER_TRANSFORM);
        for _ in 0..count {
            self.transforms.extend_from_slice(&[
                self.scale, 0.0, 0.0, 0.0,
                0.0, self.scale, 0.0, 0.0,
                0.0, 0.0, self.scale, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ]);
        }
        self.positions.clear();
        self.positions.resize(count * FLOATS_PER_POSITION, 0.0);
    }

    /// Copy translations out of `store`. Returns how many particles were skipped.
    pub fn update(&mut self, store: &ParticleStore) -> u32 {
        if store.len() * FLOATS_PER_TRANSFORM != self.transforms.len() {
            self.resize(store.len());
        }

        let mut skipped = 0u32;
        for (i, particle) in store.iter().enumerate() {
            if !particle.position.is_finite() {
                skipped += 1;
                continue;
            }
            let [x, y, z] = particle.position.to_array();
            let t = i * FLOATS_PER_TRANSFORM;
            self.transforms[t + 12] = x;
            self.transforms[t + 13] = y;
            self.transforms[t + 14] = z;
            let p = i * FLOATS_PER_POSITION;
            self.positions[p..p + 3].copy_from_slice(&[x, y, z]);
        }
        skipped
    }

    pub fn len(&self) -> usize {
        self.transforms.len() / FLOATS_PER_TRANSFORM
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn transforms(&self) -> &[f32] {
        &self.transforms
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn translation(&self, index: usize) -> Option<[f32; 3]> {
        let t = index * FLOATS_PER_TRANSFORM;
        self.transforms
            .get(t + 12..t + 15)
            .map(|s| [s[0], s[1], s[2]])
    }

    pub fn transforms_ptr(&self) -> *const f32 {
        self.transforms.as_ptr()
    }

    pub fn positions_ptr(&self) -> *const f32 {
        self.positions.as_ptr()
    }
}
