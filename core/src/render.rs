//! Render data exported to the external renderer
//!
//! The engine never draws. Components push classified primitives into a
//! [`RenderData`] list and the renderer decides how each [`ColorCategory`] looks.

use bossmod_types::ColorCategory;
use glam::Vec3;
use serde::Serialize;

use crate::geometry::AoeShape;

/// One drawable item, in world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderPrimitive {
    /// Filled circular zone
    ZoneCircle {
        center: Vec3,
        radius: f32,
        color: ColorCategory,
    },
    /// Filled ring between two radii
    ZoneDonut {
        center: Vec3,
        inner: f32,
        outer: f32,
        color: ColorCategory,
    },
    /// Filled circle sector; directions are facing angles
    ZoneCone {
        apex: Vec3,
        radius: f32,
        direction_start: f32,
        direction_end: f32,
        color: ColorCategory,
    },
    /// Filled quadrilateral, corners in winding order
    ZoneQuad {
        corners: [Vec3; 4],
        color: ColorCategory,
    },
    /// Circle outline (safe spots, markers)
    Circle {
        center: Vec3,
        radius: f32,
        color: ColorCategory,
    },
    Line {
        from: Vec3,
        to: Vec3,
        color: ColorCategory,
    },
    /// An actor marker with facing
    Actor {
        position: Vec3,
        rotation: f32,
        color: ColorCategory,
    },
}

impl RenderPrimitive {
    pub fn color(&self) -> ColorCategory {
        match self {
            Self::ZoneCircle { color, .. }
            | Self::ZoneDonut { color, .. }
            | Self::ZoneCone { color, .. }
            | Self::ZoneQuad { color, .. }
            | Self::Circle { color, .. }
            | Self::Line { color, .. }
            | Self::Actor { color, .. } => *color,
        }
    }

    pub fn is_zone(&self) -> bool {
        matches!(
            self,
            Self::ZoneCircle { .. }
                | Self::ZoneDonut { .. }
                | Self::ZoneCone { .. }
                | Self::ZoneQuad { .. }
        )
    }
}

/// Primitives collected for one player's view during one tick.
///
/// Zones are kept apart from markers so the renderer can draw them underneath.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderData {
    pub zones: Vec<RenderPrimitive>,
    pub markers: Vec<RenderPrimitive>,
}

impl RenderData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Danger (or safe) zone for a shape anchored at `origin` facing `rotation`
    pub fn zone(&mut self, shape: &AoeShape, origin: Vec3, rotation: f32, color: ColorCategory) {
        self.zones.push(shape.render_data(origin, rotation, color));
    }

    pub fn push(&mut self, primitive: RenderPrimitive) {
        if primitive.is_zone() {
            self.zones.push(primitive);
        } else {
            self.markers.push(primitive);
        }
    }

    pub fn circle(&mut self, center: Vec3, radius: f32, color: ColorCategory) {
        self.markers.push(RenderPrimitive::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn line(&mut self, from: Vec3, to: Vec3, color: ColorCategory) {
        self.markers.push(RenderPrimitive::Line { from, to, color });
    }

    pub fn actor(&mut self, position: Vec3, rotation: f32, color: ColorCategory) {
        self.markers.push(RenderPrimitive::Actor {
            position,
            rotation,
            color,
        });
    }

    pub fn len(&self) -> usize {
        self.zones.len() + self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty() && self.markers.is_empty()
    }

    /// All primitives, zones first
    pub fn iter(&self) -> impl Iterator<Item = &RenderPrimitive> {
        self.zones.iter().chain(self.markers.iter())
    }
}
