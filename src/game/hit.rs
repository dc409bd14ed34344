//! Hand bounding boxes and the target hit test.

use nalgebra::Point2;

use super::Viewport;
use crate::landmarks::LandmarkSet;

/// Axis-aligned screen rectangle in pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub origin_x: f32,
    pub origin_y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(origin_x: f32, origin_y: f32, width: f32, height: f32) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    /// Extent of one hand's landmarks scaled into frame pixels, `None` if the
    /// set is empty.
    pub fn from_landmarks(landmarks: &LandmarkSet, viewport: Viewport) -> Option<Self> {
        let (min, max) = landmarks.xy_bounds()?;

        Some(Self {
            origin_x: min.x * viewport.width,
            origin_y: min.y * viewport.height,
            width: (max.x - min.x) * viewport.width,
            height: (max.y - min.y) * viewport.height,
        })
    }

    pub fn max_x(&self) -> f32 {
        self.origin_x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.origin_y + self.height
    }

    /// Closed containment: all four edges count as inside.
    pub fn contains(&self, p: Point2<f32>) -> bool {
        p.x >= self.origin_x && p.x <= self.max_x() && p.y >= self.origin_y && p.y <= self.max_y()
    }
}
