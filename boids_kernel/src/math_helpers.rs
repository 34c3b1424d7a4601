use glam::Vec2;

/// Below this speed a velocity has no usable direction.
pub const VELOCITY_EPSILON: f32 = 1e-6;

/// Angle of a vector in radians, `(-π, π]`, measured from the +x axis.
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Unit vector pointing along `rotation` radians.
#[inline]
pub fn direction_from_heading(rotation: f32) -> Vec2 {
    Vec2::new(rotation.cos(), rotation.sin())
}

/// Clamps the length of `velocity` into `[min_speed, max_speed]`.
///
/// A velocity too short to carry a direction is lifted to `min_speed` along
/// `fallback`, which the caller guarantees to be a unit vector. So is one with
/// an infinite or NaN component. A finite velocity whose length overflows is
/// rescaled before it is measured.
pub fn clamp_speed(velocity: Vec2, fallback: Vec2, min_speed: f32, max_speed: f32) -> Vec2 {
    let speed = velocity.length();

    if !speed.is_finite() {
        return match large_direction(velocity) {
            Some(direction) => direction * max_speed,
            None => fallback * min_speed,
        };
    }

    if speed > max_speed {
        velocity * (max_speed / speed)
    } else if speed >= min_speed {
        velocity
    } else if speed > VELOCITY_EPSILON {
        velocity * (min_speed / speed)
    } else {
        fallback * min_speed
    }
}

/// Unit direction of a finite vector too long to measure directly.
fn large_direction(v: Vec2) -> Option<Vec2> {
    if !v.is_finite() {
        return None;
    }

    let scale = v.abs().max_element();
    if scale <= 0. {
        return None;
    }

    Some((v / scale).normalize())
}

/// Wraps a coordinate into `[0, size)` toroidally.
#[inline]
pub fn wrap_component(x: f32, size: f32) -> f32 {
    let wrapped = x.rem_euclid(size);

    // tiny negatives round up to `size`
    if wrapped >= size {
        0.
    } else {
        wrapped
    }
}

/// How far inside the border bands a coordinate sits, `0` at a band's inner
/// edge and `1` at (or beyond) its wall. The low wall pushes positive and the
/// high wall negative, so the result already points inward. Overlapping bands
/// cancel out where both walls are equally near.
pub fn border_proximity(x: f32, size: f32, band: f32) -> f32 {
    if band <= 0. {
        return 0.;
    }

    let low = ((band - x) / band).clamp(0., 1.);
    let high = ((x - (size - band)) / band).clamp(0., 1.);

    low - high
}
