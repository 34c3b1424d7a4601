use glam::Vec2;

use crate::{
    math_helpers::{
        border_proximity, clamp_speed, direction_from_heading, heading, wrap_component,
        VELOCITY_EPSILON,
    },
    options::{Boundary, MotionParams},
};

/// One agent's state after a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
}

/// Inward push for an agent inside the border band, growing linearly from zero
/// at the band's inner edge to `border_avoidance_factor` at the wall.
pub fn border_avoidance(position: Vec2, params: &MotionParams) -> Vec2 {
    let band = params.border_sight_distance;
    let size = params.area_size;

    Vec2::new(
        border_proximity(position.x, size, band),
        border_proximity(position.y, size, band),
    ) * params.border_avoidance_factor
}

/// Integrates one agent over `delta_time`.
///
/// Total over its inputs: a non-finite acceleration is dropped, a velocity too
/// short to carry a direction keeps the previous heading, and the resulting
/// position is forced back into the area.
pub fn integrate(
    acceleration: Vec2,
    velocity: Vec2,
    position: Vec2,
    rotation: f32,
    delta_time: f32,
    params: &MotionParams,
) -> Kinematics {
    let acceleration = if acceleration.is_finite() {
        acceleration
    } else {
        Vec2::ZERO
    };

    let steer = acceleration + border_avoidance(position, params);

    let fallback = if velocity.length() > VELOCITY_EPSILON {
        velocity.normalize()
    } else {
        direction_from_heading(rotation)
    };

    let velocity = clamp_speed(
        velocity + steer * delta_time,
        fallback,
        params.minimum_velocity,
        params.maximum_velocity,
    );

    let position = contain(position + velocity * delta_time, params);

    let rotation = if velocity.length() > VELOCITY_EPSILON {
        heading(velocity)
    } else {
        rotation
    };

    Kinematics {
        position,
        velocity,
        rotation,
    }
}

fn contain(position: Vec2, params: &MotionParams) -> Vec2 {
    let size = params.area_size;

    match params.boundary {
        Boundary::Clamp => Vec2::new(position.x.clamp(0., size), position.y.clamp(0., size)),
        Boundary::Toroidal => Vec2::new(
            wrap_component(position.x, size),
            wrap_component(position.y, size),
        ),
    }
}
