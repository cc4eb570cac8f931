// core/geometry.rs

// Planar geometry helpers shared by the controller, the avoidance layer and the
// path optimizer. Headings are radians in (-PI, PI], measured from +x toward +y.

use nalgebra::Vector2;
use std::f64::consts::{PI, TAU};

/// Position or displacement in the simulation plane
pub type Vec2 = Vector2<f64>;

/// Wraps an angle into (-PI, PI]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut wrapped = PI - (PI - angle).rem_euclid(TAU);
    // rem_euclid can round up to TAU for inputs just past a multiple of TAU
    if wrapped <= -PI {
        wrapped += TAU;
    }
    wrapped
}

/// Euclidean distance between two points
pub fn distance(a: &Vec2, b: &Vec2) -> f64 {
    (b - a).norm()
}

/// Heading from `from` toward `to`
pub fn heading_to(from: &Vec2, to: &Vec2) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Signed shortest rotation from `current` to `target`.
///
/// The result lies in (-PI, PI], so an exactly opposite target always turns
/// in the positive direction.
pub fn shortest_turn(current: f64, target: f64) -> f64 {
    normalize_angle(target - current)
}

/// Turns `current` toward `target` by at most `max_step` radians and returns
/// the normalized result
pub fn steer_toward(current: f64, target: f64, max_step: f64) -> f64 {
    let diff = shortest_turn(current, target);
    let step = diff.signum() * diff.abs().min(max_step.max(0.0));
    normalize_angle(current + step)
}

/// Point `length` units ahead of `origin` along `heading`
pub fn project(origin: &Vec2, heading: f64, length: f64) -> Vec2 {
    origin + Vec2::new(heading.cos(), heading.sin()) * length
}

/// Compass-style degrees in [0, 360) for display
pub fn heading_degrees(heading: f64) -> f64 {
    heading.to_degrees().rem_euclid(360.0)
}
