use std::collections::VecDeque;

use wasm_bindgen::prelude::*;

use crate::core::{SimError, Vec3};
use crate::domain::SpawnSource;

use super::perf_stats::PerfStats;
use super::{SimEvent, SimulationCore};

fn to_js(err: SimError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct Simulation {
    core: SimulationCore,
    // Events already pulled out of the core, waiting for the host
    inbox: VecDeque<SimEvent>,
}

impl Simulation {
    fn collect_events(&mut self) {
        self.inbox.extend(self.core.drain_events());
    }
}

#[wasm_bindgen]
impl Simulation {
    /// Create a run from a JSON `WorldConfig` and packed `xyz` mesh vertices
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, spawn_vertices: &[f32]) -> Result<Simulation, JsValue> {
        let spawn = SpawnSource::from_flat(spawn_vertices).map_err(to_js)?;
        let core = SimulationCore::from_json(config_json, spawn).map_err(to_js)?;
        Ok(Self { core, inbox: VecDeque::new() })
    }

    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> u32 { self.core.particle_count() as u32 }

    #[wasm_bindgen(getter)]
    pub fn active_fraction(&self) -> f32 { self.core.active_fraction() }

    #[wasm_bindgen(getter)]
    pub fn tick(&self) -> u64 { self.core.tick() }

    #[wasm_bindgen(getter)]
    pub fn backend_name(&self) -> String { self.core.backend_name().to_string() }

    pub fn set_trigger(&mut self, x: f32, y: f32, z: f32) {
        self.core.set_trigger(Vec3::new(x, y, z));
    }

    pub fn clear_trigger(&mut self) {
        self.core.clear_trigger();
    }

    pub fn request_activation(&mut self) {
        self.core.request_activation();
    }

    /// Run one fixed tick; returns the particles activated by it
    pub fn step(&mut self, dt: f32) -> Result<u32, JsValue> {
        let report = self.core.step(dt).map_err(to_js)?;
        self.collect_events();
        Ok(report.activated)
    }

    /// Clock-driven stepping from frame time; returns the ticks run
    pub fn advance(&mut self, frame_dt: f32) -> Result<u32, JsValue> {
        let steps = self.core.advance(frame_dt).map_err(to_js)?;
        self.collect_events();
        Ok(steps)
    }

    pub fn rebuild(&mut self) -> Result<(), JsValue> {
        self.inbox.clear();
        self.core.rebuild().map_err(to_js)
    }

    /// Activated count of the oldest unread activation completion, if any
    pub fn take_activation_completed(&mut self) -> Option<u32> {
        let index = self
            .inbox
            .iter()
            .position(|e| matches!(e, SimEvent::ActivationCompleted { .. }))?;
        match self.inbox.remove(index) {
            Some(SimEvent::ActivationCompleted { activated, .. }) => Some(activated),
            _ => None,
        }
    }

    /// Oldest unread event as JSON (`{"type":"activationCompleted",...}`), if any
    pub fn next_event_json(&mut self) -> Option<String> {
        let event = self.inbox.pop_front()?;
        serde_json::to_string(&event).ok()
    }

    pub fn positions_ptr(&self) -> *const f32 {
        self.core.instances().positions_ptr()
    }

    pub fn positions_len(&self) -> usize {
        self.core.instances().positions().len()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.core.instances().transforms_ptr()
    }

    pub fn instances_len(&self) -> usize {
        self.core.instances().transforms().len()
    }

    /// Enable or disable per-tick perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Get last tick perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.perf_stats()
    }
}
