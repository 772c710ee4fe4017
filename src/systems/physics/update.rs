use crate::core::Vec3;
use crate::domain::{Bounds, Particle, WorldConfig};

use super::bounds::clamp_to_bounds;
use super::forces::integrate;

/// Tick-constant inputs of the motion stage (Integrator + Boundary Resolver)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionParams {
    pub gravity: Vec3,
    pub dt: f32,
    pub bounds: Bounds,
    pub restitution_loss: f32,
}

impl MotionParams {
    pub fn for_tick(config: &WorldConfig, dt: f32) -> Self {
        Self {
            gravity: config.effective_gravity(),
            dt,
            bounds: config.bounds(),
            restitution_loss: config.restitution_loss,
        }
    }
}

/// Integrate then clamp a single particle.
/// Static particles are skipped entirely so they stay bit-for-bit unchanged.
#[inline(always)]
pub fn advance_motion(particle: &mut Particle, params: &MotionParams) {
    if particle.is_static {
        return;
    }
    integrate(particle, params.gravity, params.dt);
    clamp_to_bounds(particle, &params.bounds, params.restitution_loss);
}
