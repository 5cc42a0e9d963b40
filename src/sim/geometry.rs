//! 2D vector and angle helpers
//!
//! Plain arithmetic comes straight from `glam::Vec2`; this module adds the
//! pieces the steering code needs that must never divide by zero or snap
//! across the ±π seam.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Normalize, returning the zero vector for zero (or non-finite) length
#[inline]
pub fn safe_normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Direction angle of a vector (atan2)
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Wrap an angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Signed shortest-arc difference `to - from`, in [-π, π)
#[inline]
pub fn angle_between(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Interpolate between two angles along the shortest arc
///
/// `t = 0` returns `from`, `t = 1` returns `to` (wrapped).
#[inline]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    normalize_angle(from + angle_between(from, to) * t)
}

/// Scale `v` down uniformly so its length does not exceed `max`
#[inline]
pub fn clamp_length(v: Vec2, max: f32) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq > max * max && len_sq > 0.0 {
        v * (max / len_sq.sqrt())
    } else {
        v
    }
}
