//! Quadratic easing curves used by the camera.

/// Quadratic ease-in: slow start, accelerating.
#[allow(dead_code)]
#[must_use]
pub fn quad_in(t: f32) -> f32 {
    t * t
}

/// Quadratic ease-out: fast start, decelerating.
#[must_use]
pub fn quad_out(t: f32) -> f32 {
    -t * (t - 2.0)
}

/// Quadratic ease-in-out.
#[allow(dead_code)]
#[must_use]
pub fn quad_in_out(t: f32) -> f32 {
    let t = t * 2.0;
    if t < 1.0 {
        0.5 * t * t
    } else {
        let t = t - 1.0;
        -0.5 * (t * (t - 2.0) - 1.0)
    }
}
