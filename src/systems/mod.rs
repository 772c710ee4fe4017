//! Per-particle physics stages shared by every backend.

pub mod physics;
