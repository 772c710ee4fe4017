//! Core building blocks shared by every layer: math, errors, logging.

pub mod error;
pub mod logger;
pub mod vec3;

pub use error::SimError;
pub use vec3::Vec3;
