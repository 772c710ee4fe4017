use crate::core::{SimError, Vec3};

/// Vertex list the particle lattice is spawned from (usually a mesh)
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnSource {
    vertices: Vec<Vec3>,
}

impl SpawnSource {
    pub fn new(vertices: Vec<Vec3>) -> Result<Self, SimError> {
        if vertices.is_empty() {
            return Err(SimError::EmptySpawnSource);
        }
        Ok(Self { vertices })
    }

    /// Build from packed `xyz` triples; a trailing partial triple is ignored
    pub fn from_flat(flat: &[f32]) -> Result<Self, SimError> {
        let vertices = flat
            .chunks_exact(3)
            .map(|v| Vec3::new(v[0], v[1], v[2]))
            .collect();
        Self::new(vertices)
    }

    /// Regular `n x n x n` lattice starting at `origin`
    pub fn grid(per_axis: u32, spacing: f32, origin: Vec3) -> Result<Self, SimError> {
        let n = per_axis as usize;
        let mut vertices = Vec::with_capacity(n * n * n);
        for iy in 0..per_axis {
            for iz in 0..per_axis {
                for ix in 0..per_axis {
                    vertices.push(
                        origin + Vec3::new(ix as f32, iy as f32, iz as f32) * spacing,
                    );
                }
            }
        }
        Self::new(vertices)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex used by particle `index` (wraps when there are more particles than vertices)
    pub fn vertex_for(&self, index: usize) -> Vec3 {
        self.vertices[index % self.vertices.len()]
    }
}
