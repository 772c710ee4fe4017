use bytemuck::{Pod, Zeroable};

use crate::domain::{Particle, TickInput, WorldConfig};

/// Device-side particle: position.xyz + static flag + velocity.xyz + pad
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuParticle {
    pub position: [f32; 3],
    pub is_static: u32,
    pub velocity: [f32; 3],
    pub _pad: u32,
}

impl From<&Particle> for GpuParticle {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.position.to_array(),
            is_static: p.is_static as u32,
            velocity: p.velocity.to_array(),
            _pad: 0,
        }
    }
}

impl From<&GpuParticle> for Particle {
    fn from(p: &GpuParticle) -> Self {
        Self {
            position: p.position.into(),
            velocity: p.velocity.into(),
            is_static: p.is_static != 0,
        }
    }
}

/// Per-tick uniform block. vec3 + scalar pairs keep every row 16-byte aligned.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct GpuSimParams {
    pub gravity: [f32; 3],
    pub dt: f32,
    pub bounds_center: [f32; 3],
    pub sphere_radius: f32,
    pub bounds_extent: [f32; 3],
    pub restitution_loss: f32,
    pub trigger: [f32; 3],
    pub detect_radius: f32,
    pub count: u32,
    pub has_trigger: u32,
    pub explosion_radius: f32,
    pub explosion_force: f32,
    pub impulse: u32,
    pub _pad0: u32,
    pub _pad1: u32,
    pub _pad2: u32,
}

impl GpuSimParams {
    pub fn new(config: &WorldConfig, input: &TickInput, count: u32) -> Self {
        let trigger = input.trigger.unwrap_or_default();
        Self {
            gravity: config.effective_gravity().to_array(),
            dt: input.dt,
            bounds_center: config.bounds_center.to_array(),
            sphere_radius: config.sphere_radius,
            bounds_extent: config.bounds_extent.to_array(),
            restitution_loss: config.restitution_loss,
            trigger: trigger.to_array(),
            detect_radius: config.activation_detect_radius,
            count,
            has_trigger: input.trigger.is_some() as u32,
            explosion_radius: config.explosion_radius,
            explosion_force: config.explosion_force,
            impulse: config.activation_impulse as u32,
            _pad0: 0,
            _pad1: 0,
            _pad2: 0,
        }
    }
}

pub const STATUS_REQUEST: usize = 0;
pub const STATUS_SERVED: usize = 1;
pub const STATUS_ACTIVATED: usize = 2;
pub const STATUS_CONTACTS: usize = 3;
pub const STATUS_DEGENERATE: usize = 4;
pub const STATUS_WORDS: usize = 6;

/// Host copy of the shader's atomic status words
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusWords(pub [u32; STATUS_WORDS]);

impl StatusWords {
    pub fn requesting() -> Self {
        let mut words = [0; STATUS_WORDS];
        words[STATUS_REQUEST] = 1;
        Self(words)
    }

    pub fn served(&self) -> bool {
        self.0[STATUS_SERVED] != 0
    }

    pub fn activated(&self) -> u32 {
        self.0[STATUS_ACTIVATED]
    }

    /// Contacts resolved this tick, counted once per ordered pair
    pub fn contacts(&self) -> u32 {
        self.0[STATUS_CONTACTS]
    }

    pub fn degenerate_pairs(&self) -> u32 {
        self.0[STATUS_DEGENERATE]
    }

    pub fn is_clear(&self) -> bool {
        self.0.iter().all(|w| *w == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Vec3;

    #[test]
    fn particle_stride_is_32_bytes() {
        assert_eq!(std::mem::size_of::<GpuParticle>(), 32);
    }

    #[test]
    fn sim_params_size_is_96_bytes() {
        assert_eq!(std::mem::size_of::<GpuSimParams>(), 96);
    }

    #[test]
    fn particle_conversion_keeps_state() {
        let p = Particle::new_static(Vec3::new(1.0, -2.0, 3.0), Vec3::new(0.5, 0.0, -0.5));
        let gpu = GpuParticle::from(&p);
        assert_eq!(gpu.is_static, 1);
        assert_eq!(Particle::from(&gpu), p);
    }

    #[test]
    fn params_flag_missing_trigger() {
        let config = WorldConfig::default();
        let params = GpuSimParams::new(&config, &TickInput::new(0.01), 8);
        assert_eq!(params.has_trigger, 0);
        let params = GpuSimParams::new(&config, &TickInput::new(0.01).with_trigger(Vec3::splat(1.0)), 8);
        assert_eq!(params.has_trigger, 1);
        assert_eq!(params.trigger, [1.0; 3]);
    }

    #[test]
    fn status_words_decode() {
        let status = StatusWords([1, 1, 7, 4, 2, 0]);
        assert!(status.served());
        assert_eq!(status.activated(), 7);
        assert_eq!(status.contacts(), 4);
        assert_eq!(status.degenerate_pairs(), 2);
        assert!(!status.is_clear());
        assert!(StatusWords::default().is_clear());
        assert_eq!(StatusWords::requesting().0, [1, 0, 0, 0, 0, 0]);
    }
}
