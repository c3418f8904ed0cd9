//! Area-of-effect shapes
//!
//! Shapes are stateless descriptions; the origin and facing are supplied on every
//! check so a single shape can be reused for all casts of one ability.

use bossmod_types::ColorCategory;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{
    direction_to_vec3, normalize_angle, point_in_circle, point_in_cone, point_in_donut,
    point_in_rect,
};
use crate::render::RenderPrimitive;
use crate::world::Actor;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum AoeShape {
    Circle {
        radius: f32,
    },
    Donut {
        inner: f32,
        outer: f32,
    },
    /// Apex at the origin, bisector along the facing
    Cone {
        radius: f32,
        half_angle: f32,
    },
    /// Extends `length_front` ahead of the origin and `length_back` behind
    Rect {
        length_front: f32,
        half_width: f32,
        length_back: f32,
    },
}

impl AoeShape {
    pub const fn circle(radius: f32) -> Self {
        Self::Circle { radius }
    }

    pub const fn donut(inner: f32, outer: f32) -> Self {
        Self::Donut { inner, outer }
    }

    pub const fn cone(radius: f32, half_angle: f32) -> Self {
        Self::Cone { radius, half_angle }
    }

    pub const fn rect(length_front: f32, half_width: f32) -> Self {
        Self::Rect {
            length_front,
            half_width,
            length_back: 0.0,
        }
    }

    pub const fn rect_centered(half_length: f32, half_width: f32) -> Self {
        Self::Rect {
            length_front: half_length,
            half_width,
            length_back: half_length,
        }
    }

    /// Whether `point` is inside the shape anchored at `origin` facing `rotation`.
    /// Points on the boundary are inside.
    pub fn check(&self, point: Vec3, origin: Vec3, rotation: f32) -> bool {
        let offset = point - origin;
        match *self {
            AoeShape::Circle { radius } => point_in_circle(offset, radius),
            AoeShape::Donut { inner, outer } => point_in_donut(offset, inner, outer),
            AoeShape::Cone { radius, half_angle } => {
                point_in_cone(offset, rotation, radius, half_angle)
            }
            AoeShape::Rect {
                length_front,
                half_width,
                length_back,
            } => point_in_rect(offset, rotation, length_front, half_width, length_back),
        }
    }

    /// Check against a shape centered on an actor, using its position and facing
    pub fn check_actor(&self, point: Vec3, origin: &Actor) -> bool {
        self.check(point, origin.position, origin.rotation)
    }

    /// World-space primitive for the renderer
    pub fn render_data(&self, origin: Vec3, rotation: f32, color: ColorCategory) -> RenderPrimitive {
        match *self {
            AoeShape::Circle { radius } => RenderPrimitive::ZoneCircle {
                center: origin,
                radius,
                color,
            },
            AoeShape::Donut { inner, outer } => RenderPrimitive::ZoneDonut {
                center: origin,
                inner,
                outer,
                color,
            },
            AoeShape::Cone { radius, half_angle } => RenderPrimitive::ZoneCone {
                apex: origin,
                radius,
                direction_start: normalize_angle(rotation - half_angle),
                direction_end: normalize_angle(rotation + half_angle),
                color,
            },
            AoeShape::Rect {
                length_front,
                half_width,
                length_back,
            } => {
                let forward = direction_to_vec3(rotation);
                let right = Vec3::new(forward.z, 0.0, -forward.x);
                let front = origin + forward * length_front;
                let back = origin - forward * length_back;
                RenderPrimitive::ZoneQuad {
                    corners: [
                        front + right * half_width,
                        front - right * half_width,
                        back - right * half_width,
                        back + right * half_width,
                    ],
                    color,
                }
            }
        }
    }
}
