//! Step backends - interchangeable executors of one fixed tick
//!
//! - cpu/ - sequential reference sweep or rayon double-buffered batches
//! - gpu/ - wgpu compute dispatch with synchronous readback
//!
//! Callers only see `StepBackend`; which one runs is picked from
//! `WorldConfig::backend` or injected directly.

mod cpu;
#[cfg(all(feature = "gpu", not(target_arch = "wasm32")))]
pub mod gpu;

pub use cpu::CpuBackend;
#[cfg(all(feature = "gpu", not(target_arch = "wasm32")))]
pub use gpu::GpuBackend;

use crate::core::SimError;
use crate::domain::{BackendKind, ParticleStore, TickInput, TickStats, WorldConfig};

/// Advance the whole particle store by one fixed tick
pub trait StepBackend {
    fn name(&self) -> &'static str;

    /// Make `store` the backend's current state (run start and rebuild)
    fn upload(&mut self, store: &ParticleStore) -> Result<(), SimError>;

    /// Integrator -> Boundary -> Collision -> Activation over every particle.
    /// On return `store` holds the committed post-tick snapshot.
    fn advance_tick(
        &mut self,
        store: &mut ParticleStore,
        config: &WorldConfig,
        input: &TickInput,
    ) -> Result<TickStats, SimError>;
}

/// Build the backend selected by `config.backend`.
/// A GPU that cannot be set up is fatal to the run.
pub fn create_backend(config: &WorldConfig) -> Result<Box<dyn StepBackend>, SimError> {
    match config.backend {
        BackendKind::Cpu => Ok(Box::new(CpuBackend::new(
            config.multithreaded,
            config.batch_size as usize,
        ))),
        BackendKind::Gpu => create_gpu_backend(config),
    }
}

#[cfg(all(feature = "gpu", not(target_arch = "wasm32")))]
fn create_gpu_backend(config: &WorldConfig) -> Result<Box<dyn StepBackend>, SimError> {
    Ok(Box::new(GpuBackend::new(config.particle_count)?))
}

#[cfg(not(all(feature = "gpu", not(target_arch = "wasm32"))))]
fn create_gpu_backend(_config: &WorldConfig) -> Result<Box<dyn StepBackend>, SimError> {
    Err(SimError::GpuUnavailable(
        "built without the native `gpu` feature".to_string(),
    ))
}
