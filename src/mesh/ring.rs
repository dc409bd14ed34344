//! Strip triangulation of a boundary ring.
//!
//! The ring alternates between two opposing curves (upper and lower lip), so
//! every run of three consecutive ring points spans the gap between them.
//! Triangles `(i, i + 1, i + 2)` tile the area without a center vertex, which
//! keeps concave outlines such as an open mouth free of overlapping fans. A
//! ring walked around the perimeter instead still yields `2N - 2` triangles,
//! but they overlap and leave gaps.

use std::collections::HashSet;

use nalgebra::Point3;

use super::{Mesh, Vertex};
use crate::error::{ComposeError, Result};
use crate::landmarks::{Landmark, LandmarkSet};

/// Cyclic ordering of landmark indices. Even length, no repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryRing {
    indices: Vec<usize>,
}

impl BoundaryRing {
    pub fn new(indices: Vec<usize>) -> Result<Self> {
        if indices.len() % 2 != 0 {
            return Err(ComposeError::OddRing(indices.len()));
        }

        let mut seen = HashSet::with_capacity(indices.len());
        for &i in indices.iter() {
            if !seen.insert(i) {
                return Err(ComposeError::DuplicateRingIndex(i));
            }
        }

        Ok(Self { indices })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

// image space (y down, z negative toward the camera) to scene space
fn scene_point(l: &Landmark) -> Point3<f32> {
    Point3::new(l.x, -l.y, -l.z)
}

/// Builds the recentered strip mesh for `ring` from this frame's landmarks.
///
/// Fails with [`ComposeError::MissingLandmark`] if any ring index is absent and
/// with [`ComposeError::RingTooShort`] if fewer than three points are available.
pub fn triangulate(ring: &BoundaryRing, landmarks: &LandmarkSet) -> Result<Mesh> {
    let points = ring
        .indices()
        .iter()
        .map(|&i| landmarks.landmark(i))
        .collect::<Result<Vec<_>>>()?;

    if points.len() < 3 {
        return Err(ComposeError::RingTooShort(points.len()));
    }

    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for triple in points.windows(3) {
        for l in triple {
            vertices.push(Vertex::new(scene_point(l), [l.x, l.y]));
        }
    }

    Ok(Mesh::new(vertices).recentered())
}
