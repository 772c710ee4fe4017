use crate::core::Vec3;
use crate::domain::Particle;

/// Semi-implicit Euler: velocity first, then position with the new velocity.
/// Static particles are left untouched.
#[inline(always)]
pub fn integrate(particle: &mut Particle, gravity: Vec3, dt: f32) {
    if particle.is_static {
        return;
    }
    particle.velocity += gravity * dt;
    particle.position += particle.velocity * dt;
}
