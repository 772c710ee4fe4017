use crate::core::Vec3;
use crate::domain::{Particle, TickInput, WorldConfig};

/// Explosion around the trigger point, served once per activation request
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Explosion {
    pub center: Vec3,
    pub radius: f32,
    /// Outward impulse strength, `None` to only wake particles
    pub force: Option<f32>,
}

/// Everything the Activation Trigger needs for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ActivationPlan {
    pub trigger: Option<Vec3>,
    pub detect_radius: f32,
    pub explosion: Option<Explosion>,
}

impl ActivationPlan {
    pub fn for_tick(config: &WorldConfig, input: &TickInput) -> Self {
        let explosion = match (input.activation_request, input.trigger) {
            (true, Some(center)) => Some(Explosion {
                center,
                radius: config.explosion_radius,
                force: config.activation_impulse.then_some(config.explosion_force),
            }),
            _ => None,
        };
        Self {
            trigger: input.trigger,
            detect_radius: config.activation_detect_radius,
            explosion,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.trigger.is_none() && self.explosion.is_none()
    }

    /// Wake a static particle near the trigger or inside the explosion.
    /// Returns true when the particle flipped to dynamic.
    #[inline]
    pub fn apply(&self, particle: &mut Particle) -> bool {
        if !particle.is_static {
            return false;
        }

        if let Some(trigger) = self.trigger {
            if activate(particle, trigger, self.detect_radius) {
                return true;
            }
        }

        if let Some(explosion) = self.explosion {
            return explode(particle, &explosion);
        }

        false
    }
}

/// Proximity activation. No velocity is imparted.
#[inline]
pub fn activate(particle: &mut Particle, trigger: Vec3, detect_radius: f32) -> bool {
    if !particle.is_static {
        return false;
    }
    if particle.position.distance(trigger) < detect_radius {
        particle.is_static = false;
        return true;
    }
    false
}

/// Explosion activation with the optional falloff impulse
/// `dir * force * (1 - dist / radius)`.
#[inline]
pub fn explode(particle: &mut Particle, explosion: &Explosion) -> bool {
    if !particle.is_static {
        return false;
    }
    let offset = particle.position - explosion.center;
    let dist = offset.length();
    if !(dist < explosion.radius) {
        return false;
    }

    particle.is_static = false;
    if let Some(force) = explosion.force {
        if dist > 0.0 {
            let falloff = 1.0 - dist / explosion.radius;
            particle.velocity += (offset / dist) * (force * falloff);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_inside_radius_only() {
        let mut near = Particle::new_static(Vec3::new(0.5, 0.0, 0.0), Vec3::ZERO);
        let mut far = Particle::new_static(Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO);
        assert!(activate(&mut near, Vec3::ZERO, 1.0));
        assert!(!activate(&mut far, Vec3::ZERO, 1.0));
        assert!(!near.is_static);
        assert!(far.is_static);
        assert_eq!(near.velocity, Vec3::ZERO);
    }

    #[test]
    fn dynamic_particles_never_reactivate() {
        let mut p = Particle::new_dynamic(Vec3::ZERO, Vec3::ZERO);
        assert!(!activate(&mut p, Vec3::ZERO, 1.0));
        assert!(!p.is_static);
    }

    #[test]
    fn plan_without_request_has_no_explosion() {
        let config = WorldConfig::default();
        let plan = ActivationPlan::for_tick(&config, &TickInput::new(0.01).with_trigger(Vec3::ZERO));
        assert!(plan.explosion.is_none());
        assert!(ActivationPlan::for_tick(&config, &TickInput::new(0.01)).is_idle());
    }

    #[test]
    fn explosion_wakes_within_explosion_radius() {
        let config = WorldConfig {
            activation_detect_radius: 0.5,
            explosion_radius: 3.0,
            ..WorldConfig::default()
        };
        let input = TickInput::new(0.01).with_trigger(Vec3::ZERO).with_activation_request();
        let plan = ActivationPlan::for_tick(&config, &input);

        let mut p = Particle::new_static(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO);
        assert!(plan.apply(&mut p));
        assert_eq!(p.velocity, Vec3::ZERO);
    }

    #[test]
    fn impulse_points_away_from_center() {
        let explosion = Explosion { center: Vec3::ZERO, radius: 2.0, force: Some(10.0) };
        let mut p = Particle::new_static(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO);
        assert!(explode(&mut p, &explosion));
        assert!((p.velocity.x - 5.0).abs() < 1e-6);

        let mut centered = Particle::new_static(Vec3::ZERO, Vec3::ZERO);
        assert!(explode(&mut centered, &explosion));
        assert!(centered.velocity.is_finite());
    }
}
