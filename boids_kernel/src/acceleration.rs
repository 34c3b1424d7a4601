use glam::Vec2;

use crate::options::SteeringParams;

/// Neighbours closer than this are treated as coincident: their separation
/// weight is computed at `SEPARATION_EPSILON` and, at exactly zero distance,
/// the push direction falls back to the x axis ordered by index.
pub const SEPARATION_EPSILON: f32 = 1e-3;

/// Upper bound on a single neighbour's `1 / d^k` weight, whatever the falloff.
pub const MAX_SEPARATION_WEIGHT: f32 = 1e6;

/// Per-axis bound on the acceleration written for an agent.
pub const MAX_ACCELERATION: f32 = 1e12;

/// The three contributions making up one agent's acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Steering {
    pub cohesion: Vec2,
    pub alignment: Vec2,
    pub separation: Vec2,
    /// agents within sight distance
    pub neighbours: usize,
}

impl Steering {
    pub fn total(&self) -> Vec2 {
        self.cohesion + self.alignment + self.separation
    }
}

/// Scans every other agent and returns the steering components for agent `index`.
///
/// Reads only; deterministic for a given snapshot of `positions` and `velocities`.
pub fn steering(
    index: usize,
    positions: &[Vec2],
    velocities: &[Vec2],
    params: &SteeringParams,
) -> Steering {
    let position = positions[index];
    let velocity = velocities[index];

    let mut centre = Vec2::ZERO;
    let mut heading = Vec2::ZERO;
    let mut push = Vec2::ZERO;
    let mut count = 0;

    for (other, (other_position, other_velocity)) in
        positions.iter().zip(velocities.iter()).enumerate()
    {
        if other == index {
            continue;
        }

        let offset = position - *other_position;
        let distance = offset.length();

        if distance > params.sight_distance {
            continue;
        }

        centre += *other_position;
        heading += *other_velocity;
        count += 1;

        if distance < params.avoidance_distance {
            push += repulsion(offset, distance, index, other, params.separation_falloff);
        }
    }

    if count == 0 {
        return Steering::default();
    }

    let n = count as f32;

    Steering {
        cohesion: (centre / n - position) * params.cohesion_factor,
        alignment: (heading / n - velocity) * params.alignment_factor,
        separation: push * params.separation_factor,
        neighbours: count,
    }
}

/// Acceleration of agent `index` for this tick: cohesion + alignment + separation,
/// or zero when nobody is in sight.
///
/// Always finite: each axis is held within `MAX_ACCELERATION`, a NaN axis
/// reads as zero.
#[inline]
pub fn acceleration(
    index: usize,
    positions: &[Vec2],
    velocities: &[Vec2],
    params: &SteeringParams,
) -> Vec2 {
    let total = steering(index, positions, velocities, params).total();

    Vec2::new(saturate(total.x), saturate(total.y))
}

fn saturate(x: f32) -> f32 {
    if x.is_nan() {
        0.
    } else {
        x.clamp(-MAX_ACCELERATION, MAX_ACCELERATION)
    }
}

/// Unit vector away from the neighbour, weighted by `1 / distance^falloff`
/// up to `MAX_SEPARATION_WEIGHT`.
fn repulsion(offset: Vec2, distance: f32, index: usize, other: usize, falloff: f32) -> Vec2 {
    let clamped = distance.max(SEPARATION_EPSILON);
    let weight = clamped.powf(-falloff).min(MAX_SEPARATION_WEIGHT);

    let direction = if distance > 0. {
        offset / distance
    } else if index < other {
        Vec2::new(-1., 0.)
    } else {
        Vec2::new(1., 0.)
    };

    direction * weight
}
