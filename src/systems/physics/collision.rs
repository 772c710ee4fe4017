use crate::core::Vec3;
use crate::domain::Particle;

/// Outcome of testing two equal-radius spheres against each other
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Contact {
    Separated,
    /// Coincident centers: no normal exists, the pair is skipped this tick
    Degenerate,
    Penetrating {
        /// Unit vector from the second center towards the first
        normal: Vec3,
        /// Half of the penetration depth along `normal`
        correction: Vec3,
    },
}

/// Per-pass collision counters (merged across parallel batches)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionStats {
    pub contacts: u32,
    pub degenerate_pairs: u32,
}

impl CollisionStats {
    #[inline]
    pub fn record(&mut self, contact: Contact) {
        match contact {
            Contact::Separated => {}
            Contact::Degenerate => self.degenerate_pairs += 1,
            Contact::Penetrating { .. } => self.contacts += 1,
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            contacts: self.contacts + other.contacts,
            degenerate_pairs: self.degenerate_pairs + other.degenerate_pairs,
        }
    }
}

#[inline(always)]
pub fn detect(first: Vec3, second: Vec3, sphere_radius: f32) -> Contact {
    let dir = first - second;
    let dist = dir.length();
    let min_dist = sphere_radius + sphere_radius;

    // NaN distances fail this comparison and fall through as separated
    if !(dist < min_dist) {
        return Contact::Separated;
    }
    if dist <= 0.0 {
        return Contact::Degenerate;
    }

    let normal = dir / dist;
    let penetration = min_dist - dist;
    Contact::Penetrating { normal, correction: normal * (penetration / 2.0) }
}

/// Drop the velocity component along `normal` (zero restitution on the contact normal)
#[inline(always)]
pub fn remove_normal_velocity(velocity: Vec3, normal: Vec3) -> Vec3 {
    velocity - normal * velocity.dot(normal)
}

/// Push both spheres apart by half the penetration each.
/// Static spheres keep their state.
#[inline]
pub fn resolve_pair(first: &mut Particle, second: &mut Particle, sphere_radius: f32) -> Contact {
    let contact = detect(first.position, second.position, sphere_radius);
    if let Contact::Penetrating { normal, correction } = contact {
        if !first.is_static {
            first.position += correction;
            first.velocity = remove_normal_velocity(first.velocity, normal);
        }
        if !second.is_static {
            second.position -= correction;
            second.velocity = remove_normal_velocity(second.velocity, normal);
        }
    }
    contact
}

/// One-sided variant: only `first` moves, `other` is read-only
#[inline]
pub fn resolve_against(first: &mut Particle, other: &Particle, sphere_radius: f32) -> Contact {
    let contact = detect(first.position, other.position, sphere_radius);
    if let Contact::Penetrating { normal, correction } = contact {
        if !first.is_static {
            first.position += correction;
            first.velocity = remove_normal_velocity(first.velocity, normal);
        }
    }
    contact
}

/// Sequential sweep for particle `i` (held in `current`) over every other
/// non-static particle. Pairs are visited over the full range, so a pair
/// resolved while sweeping `j` is tested again while sweeping `i`, and
/// corrections compound within the tick.
///
/// `particles[i]` is skipped; the caller stores `current` back afterwards.
pub fn resolve_sequential(
    particles: &mut [Particle],
    i: usize,
    current: &mut Particle,
    sphere_radius: f32,
) -> CollisionStats {
    let mut stats = CollisionStats::default();
    if current.is_static {
        return stats;
    }

    for j in 0..particles.len() {
        if j == i {
            continue;
        }
        let other = &mut particles[j];
        if other.is_static {
            continue;
        }
        let contact = resolve_pair(current, other, sphere_radius);
        if contact == Contact::Degenerate {
            log::debug!("skipping coincident pair ({}, {})", i, j);
        }
        stats.record(contact);
    }

    stats
}

/// Snapshot sweep for particle `i`: every other non-static particle is read
/// from `snapshot`, only `current` is written. Used by the parallel CPU pass
/// and mirrored by the compute shader.
pub fn resolve_against_snapshot(
    current: &mut Particle,
    i: usize,
    snapshot: &[Particle],
    sphere_radius: f32,
) -> CollisionStats {
    let mut stats = CollisionStats::default();
    if current.is_static {
        return stats;
    }

    for (j, other) in snapshot.iter().enumerate() {
        if j == i || other.is_static {
            continue;
        }
        let contact = resolve_against(current, other, sphere_radius);
        if contact == Contact::Degenerate {
            log::debug!("skipping coincident pair ({}, {})", i, j);
        }
        stats.record(contact);
    }

    stats
}
