use serde::{Deserialize, Serialize};

use crate::core::{SimError, Vec3};

/// Which step backend executes the tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Cpu,
    Gpu,
}

/// Axis negated when spawn positions are taken from mesh vertices
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorAxis {
    None,
    #[default]
    X,
    Y,
    Z,
}

impl MirrorAxis {
    pub fn apply(self, v: Vec3) -> Vec3 {
        match self {
            MirrorAxis::None => v,
            MirrorAxis::X => Vec3::new(-v.x, v.y, v.z),
            MirrorAxis::Y => Vec3::new(v.x, -v.y, v.z),
            MirrorAxis::Z => Vec3::new(v.x, v.y, -v.z),
        }
    }
}

/// Axis-aligned box given by center and half-widths
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub center: Vec3,
    pub extent: Vec3,
}

impl Bounds {
    pub fn new(center: Vec3, extent: Vec3) -> Self {
        Self { center, extent }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.extent
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.extent
    }

    pub fn contains(&self, p: Vec3) -> bool {
        let (lo, hi) = (self.min(), self.max());
        (0..3).all(|axis| p.axis(axis) >= lo.axis(axis) && p.axis(axis) <= hi.axis(axis))
    }
}

/// Per-run world parameters. Immutable while a run is in progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldConfig {
    pub particle_count: u32,
    pub bounds_center: Vec3,
    pub bounds_extent: Vec3,
    /// World gravity before `gravity_scale`
    pub gravity: Vec3,
    pub gravity_scale: f32,
    pub sphere_radius: f32,
    /// Fraction of velocity kept (sign flipped) on a boundary bounce
    pub restitution_loss: f32,
    pub explosion_force: f32,
    pub explosion_radius: f32,
    pub activation_detect_radius: f32,
    /// Push newly exploded particles outward instead of only waking them
    pub activation_impulse: bool,
    pub spawn_offset: Vec3,
    pub spawn_mirror_axis: MirrorAxis,
    /// Scale of the random initial velocity
    pub spawn_force: f32,
    pub seed: u32,
    pub backend: BackendKind,
    pub multithreaded: bool,
    /// Particles per parallel batch on the CPU backend
    pub batch_size: u32,
    pub fixed_dt: f32,
    /// Dynamic fraction that raises the completion event
    pub completion_threshold: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            particle_count: 256,
            bounds_center: Vec3::ZERO,
            bounds_extent: Vec3::splat(5.0),
            gravity: Vec3::new(0.0, -9.81, 0.0),
            gravity_scale: 1.0,
            sphere_radius: 0.5,
            restitution_loss: 0.5,
            explosion_force: 10.0,
            explosion_radius: 2.0,
            activation_detect_radius: 1.0,
            activation_impulse: false,
            spawn_offset: Vec3::ZERO,
            spawn_mirror_axis: MirrorAxis::X,
            spawn_force: 5.0,
            seed: 12345,
            backend: BackendKind::Cpu,
            multithreaded: true,
            batch_size: 64,
            fixed_dt: 0.005,
            completion_threshold: 0.95,
        }
    }
}

impl WorldConfig {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Gravity actually applied by the integrator
    pub fn effective_gravity(&self) -> Vec3 {
        self.gravity * self.gravity_scale
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.bounds_center, self.bounds_extent)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.particle_count == 0 {
            return Err(invalid("particle count must be positive"));
        }
        if !self.sphere_radius.is_finite() || self.sphere_radius < 0.0 {
            return Err(invalid(format!("sphere radius {} is negative or not finite", self.sphere_radius)));
        }
        if !self.bounds_center.is_finite() || !self.bounds_extent.is_finite() {
            return Err(invalid("bounds must be finite"));
        }
        if (0..3).any(|axis| self.bounds_extent.axis(axis) < 0.0) {
            return Err(invalid("bounds extent must not be negative"));
        }
        if !self.effective_gravity().is_finite() {
            return Err(invalid("gravity must be finite"));
        }
        if !(0.0..=1.0).contains(&self.restitution_loss) {
            return Err(invalid(format!("restitution loss {} outside [0, 1]", self.restitution_loss)));
        }
        if self.batch_size == 0 {
            return Err(invalid("batch size must be positive"));
        }
        if !(self.fixed_dt > 0.0 && self.fixed_dt.is_finite()) {
            return Err(invalid("fixed timestep must be positive"));
        }
        if !(0.0..=1.0).contains(&self.completion_threshold) {
            return Err(invalid("completion threshold outside [0, 1]"));
        }
        if self.activation_detect_radius < 0.0 || self.explosion_radius < 0.0 {
            return Err(invalid("activation radii must not be negative"));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> SimError {
    SimError::InvalidConfig(reason.into())
}
