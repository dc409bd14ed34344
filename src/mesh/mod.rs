//! Per-frame surface meshes.
//!
//! A [`Mesh`] is rebuilt from scratch every frame and handed to the renderer by
//! value. Vertices are stored as a flat triangle list: every three consecutive
//! vertices form one triangle.

pub mod deform;
pub mod ring;

use bytemuck::{Pod, Zeroable};
use nalgebra::{Point3, Vector3};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: Point3<f32>, uv: [f32; 2]) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            uv,
        }
    }

    pub fn point(&self) -> Point3<f32> {
        Point3::from(self.position)
    }
}

/// Debug-only segment, never part of the mesh data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    /// Placement of the local origin in the parent scene.
    pub position: Point3<f32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            position: Point3::origin(),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = &[Vertex]> {
        self.vertices.chunks_exact(3)
    }

    /// Interleaved position/uv buffer ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Mean of all vertex positions, each counted as often as it is emitted.
    pub fn centroid(&self) -> Option<Point3<f32>> {
        if self.vertices.is_empty() {
            return None;
        }

        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.point().coords);

        Some(Point3::from(sum / self.vertices.len() as f32))
    }

    /// Moves the local origin onto the vertex centroid and shifts `position`
    /// by the same amount, so the mesh does not move in the parent scene.
    pub fn recentered(mut self) -> Self {
        let Some(center) = self.centroid() else {
            return self;
        };

        for v in self.vertices.iter_mut() {
            v.position[0] -= center.x;
            v.position[1] -= center.y;
            v.position[2] -= center.z;
        }
        self.position += center.coords;

        self
    }
}
