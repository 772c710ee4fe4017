//! Simulation - fixed-tick orchestration around a step backend
//!
//! The core owns the particle store and hands it to the backend for exactly
//! one tick at a time. Everything a host touches goes through here:
//! - init/   - spawn from mesh vertices, rebuild
//! - step/   - one tick: backend, activation handshake, events, render extract
//! - clock/  - frame time -> fixed ticks
//! - events/ - queued notifications for gameplay/UI
//! - render/ - instance transforms for the renderer
//! - perf/   - optional timings
//! - facade  - wasm-bindgen surface

use crate::backend::{self, StepBackend};
use crate::core::{SimError, Vec3};
use crate::domain::{Particle, ParticleStore, SpawnSource, WorldConfig};

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/random.rs"]
mod random;
#[path = "init/init.rs"]
mod init;
#[path = "step/step.rs"]
mod step;
#[path = "clock/clock.rs"]
pub mod clock;
#[path = "events/events.rs"]
pub mod events;
#[path = "render/render_extract.rs"]
mod render_extract;
mod facade;

pub use clock::{FixedStepClock, MAX_STEPS_PER_FRAME};
pub use events::{EventQueue, SimEvent};
pub use facade::Simulation;
pub use init::spawn_particles;
pub use perf_stats::PerfStats;
pub use render_extract::InstanceBuffer;
pub use step::TickReport;

pub(crate) use perf_timer::PerfTimer;

pub struct SimulationCore {
    config: WorldConfig,
    spawn: SpawnSource,
    store: ParticleStore,
    backend: Box<dyn StepBackend>,
    clock: FixedStepClock,

    // Written by the host between ticks, read once per tick
    trigger: Option<Vec3>,
    activation_request: bool,

    events: EventQueue,
    completion_reported: bool,
    render: InstanceBuffer,
    tick: u64,

    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl SimulationCore {
    /// Build with the backend selected by `config.backend`
    pub fn new(config: WorldConfig, spawn: SpawnSource) -> Result<Self, SimError> {
        config.validate()?;
        let backend = backend::create_backend(&config)?;
        init::create_core(config, spawn, backend)
    }

    /// Build around an explicitly supplied backend
    pub fn with_backend(
        config: WorldConfig,
        spawn: SpawnSource,
        backend: Box<dyn StepBackend>,
    ) -> Result<Self, SimError> {
        init::create_core(config, spawn, backend)
    }

    pub fn from_json(config_json: &str, spawn: SpawnSource) -> Result<Self, SimError> {
        Self::new(WorldConfig::from_json(config_json)?, spawn)
    }

    /// Run exactly one fixed tick of `dt` seconds
    pub fn step(&mut self, dt: f32) -> Result<TickReport, SimError> {
        step::step(self, dt)
    }

    /// Feed frame time to the fixed-step clock; returns the ticks run
    pub fn advance(&mut self, frame_dt: f32) -> Result<u32, SimError> {
        step::advance(self, frame_dt)
    }

    /// Throw the run away and respawn from the same configuration
    pub fn rebuild(&mut self) -> Result<(), SimError> {
        init::rebuild(self)
    }

    pub fn set_trigger(&mut self, position: Vec3) {
        self.trigger = Some(position);
    }

    pub fn clear_trigger(&mut self) {
        self.trigger = None;
    }

    pub fn trigger(&self) -> Option<Vec3> {
        self.trigger
    }

    /// Fire-once explosion around the trigger on the next tick
    pub fn request_activation(&mut self) {
        self.activation_request = true;
    }

    pub fn activation_pending(&self) -> bool {
        self.activation_request
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    pub fn next_event(&mut self) -> Option<SimEvent> {
        self.events.pop()
    }

    pub fn active_fraction(&self) -> f32 {
        self.store.active_fraction()
    }

    pub fn particles(&self) -> &[Particle] {
        self.store.particles()
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn particle_count(&self) -> usize {
        self.store.len()
    }

    pub fn instances(&self) -> &InstanceBuffer {
        &self.render
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Enable or disable per-tick perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.perf_enabled = enabled;
        if !enabled {
            self.perf_stats.reset();
        }
    }

    /// Last tick's perf snapshot (zeros when perf disabled)
    pub fn perf_stats(&self) -> PerfStats {
        self.perf_stats.clone()
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
