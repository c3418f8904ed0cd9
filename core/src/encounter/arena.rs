//! Arena bounds

use bossmod_types::ColorCategory;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::AoeShape;
use crate::render::RenderData;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArenaBounds {
    Circle { radius: f32 },
    /// Axis-aligned; `half_length` runs along Z
    Rect { half_width: f32, half_length: f32 },
}

/// Playable area of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub center: Vec3,
    pub bounds: ArenaBounds,
}

impl Arena {
    pub fn circle(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            bounds: ArenaBounds::Circle { radius },
        }
    }

    pub fn rect(center: Vec3, half_width: f32, half_length: f32) -> Self {
        Self {
            center,
            bounds: ArenaBounds::Rect {
                half_width,
                half_length,
            },
        }
    }

    fn shape(&self) -> AoeShape {
        match self.bounds {
            ArenaBounds::Circle { radius } => AoeShape::circle(radius),
            ArenaBounds::Rect {
                half_width,
                half_length,
            } => AoeShape::rect_centered(half_length, half_width),
        }
    }

    pub fn in_bounds(&self, point: Vec3) -> bool {
        self.shape().check(point, self.center, 0.0)
    }

    /// Pull a point back inside the arena, keeping its height
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        let offset = point - self.center;
        let clamped = match self.bounds {
            ArenaBounds::Circle { radius } => {
                let flat = Vec3::new(offset.x, 0.0, offset.z);
                if flat.length_squared() <= radius * radius {
                    return point;
                }
                flat.normalize_or_zero() * radius
            }
            ArenaBounds::Rect {
                half_width,
                half_length,
            } => Vec3::new(
                offset.x.clamp(-half_width, half_width),
                0.0,
                offset.z.clamp(-half_length, half_length),
            ),
        };
        Vec3::new(self.center.x + clamped.x, point.y, self.center.z + clamped.z)
    }

    /// Border outline for the renderer
    pub fn draw_border(&self, out: &mut RenderData) {
        match self.bounds {
            ArenaBounds::Circle { radius } => out.circle(self.center, radius, ColorCategory::Border),
            ArenaBounds::Rect {
                half_width,
                half_length,
            } => {
                let c = self.center;
                let corners = [
                    c + Vec3::new(half_width, 0.0, half_length),
                    c + Vec3::new(-half_width, 0.0, half_length),
                    c + Vec3::new(-half_width, 0.0, -half_length),
                    c + Vec3::new(half_width, 0.0, -half_length),
                ];
                for (i, from) in corners.iter().enumerate() {
                    out.line(*from, corners[(i + 1) % 4], ColorCategory::Border);
                }
            }
        }
    }
}
