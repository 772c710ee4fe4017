use wasm_bindgen::prelude::*;

use crate::domain::TickStats;

/// Last tick's timings and counters (all zero while metrics are disabled)
#[wasm_bindgen]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PerfStats {
    pub(super) step_ms: f64,
    pub(super) integrate_ms: f64,
    pub(super) collide_ms: f64,
    pub(super) readback_ms: f64,
    pub(super) particles_processed: u32,
    pub(super) contacts_resolved: u32,
    pub(super) degenerate_pairs: u32,
    pub(super) activated: u32,
    pub(super) non_finite: u32,
    pub(super) dynamic_count: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }

    pub(crate) fn record_tick(&mut self, stats: &TickStats) {
        self.integrate_ms = stats.integrate_ms;
        self.collide_ms = stats.collide_ms;
        self.readback_ms = stats.readback_ms;
        self.particles_processed = stats.particles_processed;
        self.contacts_resolved = stats.contacts;
        self.degenerate_pairs = stats.degenerate_pairs;
        self.activated = stats.activated;
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn integrate_ms(&self) -> f64 { self.integrate_ms }
    #[wasm_bindgen(getter)]
    pub fn collide_ms(&self) -> f64 { self.collide_ms }
    #[wasm_bindgen(getter)]
    pub fn readback_ms(&self) -> f64 { self.readback_ms }
    #[wasm_bindgen(getter)]
    pub fn particles_processed(&self) -> u32 { self.particles_processed }
    #[wasm_bindgen(getter)]
    pub fn contacts_resolved(&self) -> u32 { self.contacts_resolved }
    #[wasm_bindgen(getter)]
    pub fn degenerate_pairs(&self) -> u32 { self.degenerate_pairs }
    #[wasm_bindgen(getter)]
    pub fn activated(&self) -> u32 { self.activated }
    #[wasm_bindgen(getter)]
    pub fn non_finite(&self) -> u32 { self.non_finite }
    #[wasm_bindgen(getter)]
    pub fn dynamic_count(&self) -> u32 { self.dynamic_count }
}
