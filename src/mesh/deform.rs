//! Procedural sine displacement of a surface mesh.

use nalgebra::Point3;

use super::{LineSegment, Mesh};
use crate::config::DeformConfig;

/// Output of one deformation pass. Both parts are replaced every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Deformed {
    pub mesh: Mesh,
    pub debug_lines: Vec<LineSegment>,
}

/// Bends `mesh` vertically as a function of each vertex's horizontal distance
/// from the local origin: `y += sin(|x| * curvature) * amplitude`.
///
/// Always starts from the given (undeformed) mesh, so calling it once per frame
/// never accumulates displacement.
pub fn deform(mesh: &Mesh, config: &DeformConfig) -> Deformed {
    let origin = Point3::origin();
    let mut out = mesh.clone();
    let mut debug_lines = Vec::new();

    if config.debug_lines {
        debug_lines.reserve(out.vertices().len());
    }

    for v in out.vertices_mut() {
        if config.debug_lines {
            debug_lines.push(LineSegment {
                start: v.point(),
                end: origin,
            });
        }

        let dist_x = (v.position[0] - origin.x).abs();
        v.position[1] += (dist_x * config.curvature).sin() * config.amplitude;
    }

    Deformed {
        mesh: out,
        debug_lines,
    }
}
