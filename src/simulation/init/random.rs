use crate::core::Vec3;

/// Random number generator (xorshift32). A zero state is remapped so the
/// sequence never collapses.
#[inline]
pub(crate) fn xorshift32(state: &mut u32) -> u32 {
    let mut x = if *state == 0 { 0x9E37_79B9 } else { *state };
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Uniform float in [0, 1)
#[inline]
pub(crate) fn next_unit(state: &mut u32) -> f32 {
    (xorshift32(state) >> 8) as f32 / (1u32 << 24) as f32
}

/// Uniform point inside the unit sphere (rejection sampled)
pub(crate) fn inside_unit_sphere(state: &mut u32) -> Vec3 {
    loop {
        let p = Vec3::new(
            next_unit(state) * 2.0 - 1.0,
            next_unit(state) * 2.0 - 1.0,
            next_unit(state) * 2.0 - 1.0,
        );
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}
