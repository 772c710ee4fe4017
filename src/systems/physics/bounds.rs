use crate::domain::{Bounds, Particle};

/// Clamp a particle into `bounds`, flipping and damping the velocity on every
/// axis that left the box. Axes are handled independently, so a corner exit
/// clamps several axes in the same call.
///
/// Returns the number of faces hit.
#[inline(always)]
pub fn clamp_to_bounds(particle: &mut Particle, bounds: &Bounds, restitution_loss: f32) -> u32 {
    if particle.is_static {
        return 0;
    }

    let lo = bounds.min();
    let hi = bounds.max();
    let mut hits = 0;

    for axis in 0..3 {
        let pos = particle.position.axis(axis);
        if pos < lo.axis(axis) {
            *particle.position.axis_mut(axis) = lo.axis(axis);
            *particle.velocity.axis_mut(axis) *= -restitution_loss;
            hits += 1;
        } else if pos > hi.axis(axis) {
            *particle.position.axis_mut(axis) = hi.axis(axis);
            *particle.velocity.axis_mut(axis) *= -restitution_loss;
            hits += 1;
        }
    }

    hits
}
