//! Perspective camera used to unproject landmarks into the scene.

use nalgebra::{Isometry3, Matrix4, Perspective3, Point3};

use crate::error::{ComposeError, Result};
use crate::landmarks::Landmark;

const K_DEGREES_TO_RADIANS: f32 = std::f32::consts::PI / 180.0;

/// Camera the scene is rendered through. Landmarks are unprojected with its
/// inverse projection, so it has to match the renderer's active camera.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    vertical_fov_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
    /// camera-to-world
    pose: Isometry3<f32>,
}

impl PerspectiveCamera {
    pub fn new(vertical_fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<Self> {
        if !(vertical_fov_degrees > 0.0 && vertical_fov_degrees < 180.0) {
            return Err(ComposeError::invalid_config(
                "camera.vertical_fov_degrees",
                format!("{vertical_fov_degrees} is outside (0, 180)"),
            ));
        }
        if !(aspect.is_finite() && aspect > 0.0) {
            return Err(ComposeError::invalid_config("camera.aspect", "must be positive"));
        }
        if !(near > 0.0 && far.is_finite() && far > near) {
            return Err(ComposeError::invalid_config(
                "camera.near",
                format!("need 0 < near < far, got near={near} far={far}"),
            ));
        }

        Ok(Self {
            vertical_fov_degrees,
            aspect,
            near,
            far,
            pose: Isometry3::identity(),
        })
    }

    /// Camera whose aspect ratio follows the video frame.
    pub fn for_frame(
        vertical_fov_degrees: f32,
        near: f32,
        far: f32,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Self> {
        if frame_width == 0 || frame_height == 0 {
            return Err(ComposeError::Degenerate("zero-sized video frame"));
        }
        Self::new(
            vertical_fov_degrees,
            frame_width as f32 / frame_height as f32,
            near,
            far,
        )
    }

    pub fn with_pose(mut self, pose: Isometry3<f32>) -> Self {
        self.pose = pose;
        self
    }

    pub fn pose(&self) -> &Isometry3<f32> {
        &self.pose
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(
            self.aspect,
            self.vertical_fov_degrees * K_DEGREES_TO_RADIANS,
            self.near,
            self.far,
        )
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().to_homogeneous()
    }

    /// NDC to world space through the inverse projection and the camera pose.
    pub fn unproject(&self, ndc: &Point3<f32>) -> Point3<f32> {
        self.pose * self.projection().unproject_point(ndc)
    }

    /// World space to NDC.
    pub fn project(&self, world: &Point3<f32>) -> Point3<f32> {
        let view = self.pose.inverse_transform_point(world);
        self.projection().project_point(&view)
    }
}

/// Maps a normalized image landmark to NDC: x and y to `[-1, 1]` with y
/// pointing up, z kept as given.
pub fn ndc_from_landmark(landmark: &Landmark) -> Point3<f32> {
    Point3::new(2.0 * landmark.x - 1.0, 1.0 - 2.0 * landmark.y, landmark.z)
}
