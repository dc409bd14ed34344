//! Transform estimation from a canonical face shape.

use nalgebra::{DVector, Matrix3xX, Matrix4, Point3};

use super::procrustes::{ProcrustesSolver, WeightedProcrustes};
use crate::camera::{ndc_from_landmark, PerspectiveCamera};
use crate::error::{ComposeError, Result};
use crate::landmarks::LandmarkSet;

/// Reference shape used to estimate a transformation matrix when the detector
/// does not provide one. Each canonical point is paired with the landmark
/// index it corresponds to and a fitting weight.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalModel {
    landmark_ids: Vec<usize>,
    points: Matrix3xX<f32>,
    weights: DVector<f32>,
}

impl CanonicalModel {
    pub fn new(
        landmark_ids: Vec<usize>,
        points: Vec<Point3<f32>>,
        weights: Vec<f32>,
    ) -> Result<Self> {
        if landmark_ids.len() != points.len() || points.len() != weights.len() {
            return Err(ComposeError::invalid_config(
                "canonical_model",
                format!(
                    "{} ids, {} points and {} weights must match",
                    landmark_ids.len(),
                    points.len(),
                    weights.len()
                ),
            ));
        }
        if points.len() < 3 {
            return Err(ComposeError::invalid_config("canonical_model", "need at least 3 points"));
        }

        let columns: Vec<_> = points.iter().map(|p| p.coords).collect();

        Ok(Self {
            landmark_ids,
            points: Matrix3xX::from_columns(&columns),
            weights: DVector::from_vec(weights),
        })
    }

    pub fn len(&self) -> usize {
        self.landmark_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmark_ids.is_empty()
    }

    /// Fits the canonical shape onto this frame's landmarks, unprojected
    /// through `camera`, and returns the model-to-world matrix.
    pub fn estimate_transform(
        &self,
        landmarks: &LandmarkSet,
        camera: &PerspectiveCamera,
    ) -> Result<Matrix4<f32>> {
        if landmarks.is_empty() {
            return Err(ComposeError::NoLandmarks);
        }

        let observed = self
            .landmark_ids
            .iter()
            .map(|&i| {
                let l = landmarks.landmark(i)?;
                Ok(camera.unproject(&ndc_from_landmark(&l)).coords)
            })
            .collect::<Result<Vec<_>>>()?;

        WeightedProcrustes::new().solve(
            &self.points,
            &Matrix3xX::from_columns(&observed),
            &self.weights,
        )
    }
}
