//! Retargeting of an externally loaded object onto a tracked face.
//!
//! The object's orientation follows the detector's transformation matrix while
//! one landmark ("pin vertex") stays visually anchored: its image position is
//! unprojected through the camera and the pin's offset from a center landmark
//! is added, scaled by the measured face size.

pub mod canonical;
pub mod procrustes;

use nalgebra::{Matrix4, Point3, Vector3};

use crate::camera::{ndc_from_landmark, PerspectiveCamera};
use crate::config::RetargetConfig;
use crate::error::{ComposeError, Result};
use crate::landmarks::topology::face;
use crate::landmarks::{Landmark, LandmarkSet};

/// Pose handed to the renderer for the retargeted object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectPose {
    pub visible: bool,
    pub matrix: Matrix4<f32>,
    /// Whether the renderer may recompute the matrix from its own
    /// position/rotation/scale. Always `false` once a pose was composed.
    pub matrix_auto_update: bool,
}

impl Default for ObjectPose {
    fn default() -> Self {
        Self {
            visible: false,
            matrix: Matrix4::identity(),
            matrix_auto_update: true,
        }
    }
}

/// Width, height and depth of the detected face in normalized units.
pub fn face_dimensions(landmarks: &LandmarkSet) -> Result<Vector3<f32>> {
    let width = landmarks.distance(face::LEFT_CHEEK, face::RIGHT_CHEEK)?;
    let forehead = landmarks.landmark(face::FOREHEAD)?;
    let chin = landmarks.landmark(face::CHIN)?;

    let height = (forehead - chin).norm();
    let depth = (forehead.z - chin.z).abs();

    Ok(Vector3::new(width, height, depth))
}

/// Offset of `pin` from `center` in scene orientation (y up), scaled per axis
/// by `dimensions` and then by `gain`.
pub fn pin_displacement(
    pin: &Landmark,
    center: &Landmark,
    dimensions: &Vector3<f32>,
    gain: f32,
) -> Vector3<f32> {
    let d = pin - center;
    Vector3::new(d.x, -d.y, d.z).component_mul(dimensions) * gain
}

/// `transform * translate(anchor) * translate(displacement) * scale(uniform_scale)`
pub fn compose_matrix(
    transform: &Matrix4<f32>,
    anchor: &Point3<f32>,
    displacement: &Vector3<f32>,
    uniform_scale: f32,
) -> Matrix4<f32> {
    transform
        * Matrix4::new_translation(&anchor.coords)
        * Matrix4::new_translation(displacement)
        * Matrix4::new_scaling(uniform_scale)
}

/// Computes the world matrix for one frame. Fails if any landmark the
/// computation needs is missing.
pub fn compose_pose(
    config: &RetargetConfig,
    landmarks: &LandmarkSet,
    transform: &Matrix4<f32>,
    camera: &PerspectiveCamera,
) -> Result<Matrix4<f32>> {
    let dimensions = face_dimensions(landmarks)?;
    let pin = landmarks.landmark(config.pin_vertex)?;
    let center = landmarks.landmark(config.center_landmark)?;

    let displacement = pin_displacement(&pin, &center, &dimensions, config.displacement_scale);
    let anchor = camera.unproject(&ndc_from_landmark(&pin));

    Ok(compose_matrix(
        transform,
        &anchor,
        &displacement,
        config.uniform_scale,
    ))
}

/// Holds the retargeted object's pose across frames.
#[derive(Debug, Clone, Default)]
pub struct Retargeter {
    pose: ObjectPose,
}

impl Retargeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> &ObjectPose {
        &self.pose
    }

    /// Updates the pose for this frame.
    ///
    /// An empty landmark set or a missing transformation matrix hides the
    /// object. On error the previous pose is kept untouched.
    pub fn update(
        &mut self,
        config: &RetargetConfig,
        landmarks: &LandmarkSet,
        transform: Option<&Matrix4<f32>>,
        camera: &PerspectiveCamera,
    ) -> Result<&ObjectPose> {
        if landmarks.is_empty() {
            self.pose.visible = false;
            return Ok(&self.pose);
        }

        let Some(transform) = transform else {
            self.pose.visible = false;
            return Ok(&self.pose);
        };

        let matrix = compose_pose(config, landmarks, transform, camera)?;
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(ComposeError::Degenerate("non-finite object pose"));
        }

        self.pose = ObjectPose {
            visible: true,
            matrix,
            matrix_auto_update: false,
        };

        Ok(&self.pose)
    }
}
