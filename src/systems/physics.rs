//! Physics System - point spheres under gravity in a box
//!
//! Stages, in tick order:
//! - forces     - semi-implicit Euler integration
//! - bounds     - clamp into the world box, damped reflection
//! - collision  - pairwise penetration correction + normal velocity removal
//! - activation - static -> dynamic near the trigger point
//!
//! Every stage works on a single `Particle` (or a pair) so the CPU backend can
//! run it per index in parallel batches; the compute shader mirrors the same
//! arithmetic.

mod activation;
mod bounds;
mod collision;
mod forces;
mod update;

pub use activation::{activate, explode, ActivationPlan, Explosion};
pub use bounds::clamp_to_bounds;
pub use collision::{
    detect, remove_normal_velocity, resolve_against, resolve_against_snapshot, resolve_pair,
    resolve_sequential, CollisionStats, Contact,
};
pub use forces::integrate;
pub use update::{advance_motion, MotionParams};
