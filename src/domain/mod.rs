//! Domain model: particles, world configuration, spawn data, tick I/O.

pub mod config;
pub mod particle;
pub mod spawn;
pub mod tick;

pub use config::{BackendKind, Bounds, MirrorAxis, WorldConfig};
pub use particle::{Particle, ParticleStore};
pub use spawn::SpawnSource;
pub use tick::{TickInput, TickStats};
