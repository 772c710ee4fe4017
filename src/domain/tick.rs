use crate::core::Vec3;

/// What the scheduler hands a backend for one fixed tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickInput {
    pub dt: f32,
    /// Current trigger point (rocket), if one is in flight
    pub trigger: Option<Vec3>,
    /// Fire-once explosion request around `trigger`
    pub activation_request: bool,
}

impl TickInput {
    pub fn new(dt: f32) -> Self {
        Self { dt, trigger: None, activation_request: false }
    }

    pub fn with_trigger(mut self, trigger: Vec3) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn with_activation_request(mut self) -> Self {
        self.activation_request = true;
        self
    }
}

/// Counters a backend reports back for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickStats {
    pub particles_processed: u32,
    pub contacts: u32,
    pub degenerate_pairs: u32,
    /// Particles that went static -> dynamic this tick
    pub activated: u32,
    /// An activation request was consumed by this tick
    pub activation_served: bool,
    pub integrate_ms: f64,
    pub collide_ms: f64,
    pub readback_ms: f64,
}
