//! Sphere Burst Engine - fixed-tick sphere particle simulation in WASM and native
//!
//! Static spheres spawned from a mesh wake up near a moving trigger point (or
//! in an explosion around it), then fall under gravity, bounce inside a box
//! and push each other apart. One tick runs on the CPU (sequential or rayon
//! batches) or on the GPU (wgpu compute), behind the same backend trait.
//!
//! Architecture:
//! - core/       - math, errors, logging
//! - domain/     - particles, world config, spawn source, tick I/O
//! - systems/    - per-particle physics stages
//! - backend/    - CPU and GPU tick executors
//! - simulation/ - orchestration, events, render extract, wasm facade

pub mod core;
pub mod domain;
pub mod systems;
pub mod backend;
pub mod simulation;

pub use systems::physics;

use wasm_bindgen::prelude::*;

// Re-export wasm-bindgen-rayon for thread pool initialization
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine: panic hook + console logger
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    crate::core::logger::init();
    log::info!("sphere burst engine {} initialized", env!("CARGO_PKG_VERSION"));
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use crate::backend::{create_backend, CpuBackend, StepBackend};
#[cfg(all(feature = "gpu", not(target_arch = "wasm32")))]
pub use crate::backend::GpuBackend;
pub use crate::core::{SimError, Vec3};
pub use crate::domain::{
    BackendKind, Bounds, MirrorAxis, Particle, ParticleStore, SpawnSource, TickInput, TickStats,
    WorldConfig,
};
pub use crate::simulation::{
    FixedStepClock, InstanceBuffer, PerfStats, SimEvent, Simulation, SimulationCore, TickReport,
};
