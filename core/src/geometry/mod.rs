//! Ground-plane geometry helpers
//!
//! The world is Y-up; all containment tests happen on the XZ plane. A rotation of
//! 0 faces +Z and positive rotation turns towards +X.

mod shape;

pub use shape::AoeShape;

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Slack added to every containment test so points on the boundary (up to float
/// rounding) count as inside.
pub const BOUNDARY_EPSILON: f32 = 1e-3;
/// Angular slack for cone tests, in radians
pub const ANGLE_EPSILON: f32 = 1e-4;

/// Normalize an angle to (-π, π]
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Unit vector on the ground plane for a facing angle
#[inline]
pub fn direction_to_vec3(rotation: f32) -> Vec3 {
    Vec3::new(rotation.sin(), 0.0, rotation.cos())
}

/// Facing angle of a ground-plane offset (0 for a zero vector)
#[inline]
pub fn direction_from_vec3(offset: Vec3) -> f32 {
    offset.x.atan2(offset.z)
}

/// Express a world-space offset in the local frame of something facing `rotation`.
/// Returns `(forward, right)` distances.
#[inline]
pub fn to_local(offset: Vec3, rotation: f32) -> (f32, f32) {
    let (sin, cos) = rotation.sin_cos();
    let forward = offset.x * sin + offset.z * cos;
    let right = offset.x * cos - offset.z * sin;
    (forward, right)
}

#[inline]
fn length_squared_xz(offset: Vec3) -> f32 {
    offset.x * offset.x + offset.z * offset.z
}

/// `offset` is relative to the circle center
#[inline]
pub fn point_in_circle(offset: Vec3, radius: f32) -> bool {
    let r = radius + BOUNDARY_EPSILON;
    length_squared_xz(offset) <= r * r
}

/// `offset` is relative to the donut center; the inner edge counts as inside
#[inline]
pub fn point_in_donut(offset: Vec3, inner: f32, outer: f32) -> bool {
    let inner = (inner - BOUNDARY_EPSILON).max(0.0);
    length_squared_xz(offset) >= inner * inner && point_in_circle(offset, outer)
}

/// `offset` is relative to the apex; the cone bisector points along `rotation`
pub fn point_in_cone(offset: Vec3, rotation: f32, radius: f32, half_angle: f32) -> bool {
    if !point_in_circle(offset, radius) {
        return false;
    }
    if length_squared_xz(offset) <= BOUNDARY_EPSILON * BOUNDARY_EPSILON {
        return true;
    }
    let (forward, right) = to_local(offset, rotation);
    right.abs().atan2(forward) <= half_angle + ANGLE_EPSILON
}

/// `offset` is relative to the rect origin; the rect extends `length_front` along
/// `rotation` and `length_back` behind
pub fn point_in_rect(
    offset: Vec3,
    rotation: f32,
    length_front: f32,
    half_width: f32,
    length_back: f32,
) -> bool {
    let (forward, right) = to_local(offset, rotation);
    forward <= length_front + BOUNDARY_EPSILON
        && forward >= -length_back - BOUNDARY_EPSILON
        && right.abs() <= half_width + BOUNDARY_EPSILON
}
