// Weighted extended orthogonal Procrustes: finds the uniform scale s, rotation R
// and translation t minimizing sum_i w_i * |s * R * source_i + t - target_i|^2.

use nalgebra::{DVector, Matrix3, Matrix3xX, Matrix4, Vector3};

use crate::error::{ComposeError, Result};

const K_ABSOLUTE_ERROR_EPS: f32 = 1e-6;

pub trait ProcrustesSolver {
    /// Returns the 4x4 similarity transform mapping `source_points` onto
    /// `target_points`.
    fn solve(
        &self,
        source_points: &Matrix3xX<f32>,
        target_points: &Matrix3xX<f32>,
        point_weights: &DVector<f32>,
    ) -> Result<Matrix4<f32>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WeightedProcrustes;

impl WeightedProcrustes {
    pub fn new() -> Self {
        WeightedProcrustes
    }

    fn validate_input_points(
        source_points: &Matrix3xX<f32>,
        target_points: &Matrix3xX<f32>,
    ) -> Result<()> {
        if source_points.ncols() == 0 {
            return Err(ComposeError::Degenerate("no source points"));
        }
        if source_points.ncols() != target_points.ncols() {
            return Err(ComposeError::Degenerate(
                "source and target point counts differ",
            ));
        }
        Ok(())
    }

    fn validate_point_weights(num_points: usize, point_weights: &DVector<f32>) -> Result<()> {
        if point_weights.len() != num_points {
            return Err(ComposeError::Degenerate("point and weight counts differ"));
        }
        if point_weights.iter().any(|w| *w < 0.0 || !w.is_finite()) {
            return Err(ComposeError::Degenerate("negative or non-finite point weight"));
        }
        if point_weights.sum() <= f32::EPSILON {
            return Err(ComposeError::Degenerate("total point weight is too small"));
        }
        Ok(())
    }

    // scales column j of `matrix` by `weights[j]`
    fn scale_columns(matrix: &Matrix3xX<f32>, weights: &DVector<f32>) -> Matrix3xX<f32> {
        let mut out = matrix.clone();
        for (mut column, w) in out.column_iter_mut().zip(weights.iter()) {
            column *= *w;
        }
        out
    }

    fn combine_transform_matrix(
        rotation_and_scale: &Matrix3<f32>,
        translation: &Vector3<f32>,
    ) -> Matrix4<f32> {
        let mut result = Matrix4::identity();
        result
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(rotation_and_scale);
        result.fixed_view_mut::<3, 1>(0, 3).copy_from(translation);
        result
    }

    fn compute_optimal_rotation(design_matrix: &Matrix3<f32>) -> Result<Matrix3<f32>> {
        if design_matrix.norm() <= K_ABSOLUTE_ERROR_EPS {
            return Err(ComposeError::Degenerate("design matrix is near zero"));
        }

        let svd = design_matrix.svd(true, true);
        let mut post_rotation = svd.u.ok_or(ComposeError::Degenerate("SVD produced no U"))?;
        let pre_rotation = svd
            .v_t
            .ok_or(ComposeError::Degenerate("SVD produced no V^T"))?;

        // det(R) must be +1, a reflection is not a valid pose
        if post_rotation.determinant() * pre_rotation.determinant() < 0.0 {
            let mut column = post_rotation.column_mut(2);
            column *= -1.0;
        }

        Ok(post_rotation * pre_rotation)
    }

    fn compute_optimal_scale(
        centered_weighted_sources: &Matrix3xX<f32>,
        weighted_sources: &Matrix3xX<f32>,
        weighted_targets: &Matrix3xX<f32>,
        rotation: &Matrix3<f32>,
    ) -> Result<f32> {
        let rotated = rotation * centered_weighted_sources;
        let numerator = rotated.dot(weighted_targets);
        let denominator = centered_weighted_sources.dot(weighted_sources);

        if denominator <= f32::EPSILON || numerator / denominator <= f32::EPSILON {
            return Err(ComposeError::Degenerate("scale is too small"));
        }

        Ok(numerator / denominator)
    }
}

impl ProcrustesSolver for WeightedProcrustes {
    fn solve(
        &self,
        source_points: &Matrix3xX<f32>,
        target_points: &Matrix3xX<f32>,
        point_weights: &DVector<f32>,
    ) -> Result<Matrix4<f32>> {
        Self::validate_input_points(source_points, target_points)?;
        Self::validate_point_weights(source_points.ncols(), point_weights)?;

        let sqrt_weights = point_weights.map(|w| w.sqrt());
        let total_weight = point_weights.sum();

        let weighted_sources = Self::scale_columns(source_points, &sqrt_weights);
        let weighted_targets = Self::scale_columns(target_points, &sqrt_weights);

        let source_center_of_mass: Vector3<f32> =
            Self::scale_columns(&weighted_sources, &sqrt_weights).column_sum() / total_weight;

        let centered_weighted_sources =
            &weighted_sources - source_center_of_mass * sqrt_weights.transpose();

        let design_matrix: Matrix3<f32> =
            &weighted_targets * centered_weighted_sources.transpose();
        let rotation = Self::compute_optimal_rotation(&design_matrix)?;

        let scale = Self::compute_optimal_scale(
            &centered_weighted_sources,
            &weighted_sources,
            &weighted_targets,
            &rotation,
        )?;
        let rotation_and_scale = rotation * scale;

        let pointwise_diffs = &weighted_targets - rotation_and_scale * &weighted_sources;
        let translation: Vector3<f32> =
            Self::scale_columns(&pointwise_diffs, &sqrt_weights).column_sum() / total_weight;

        Ok(Self::combine_transform_matrix(&rotation_and_scale, &translation))
    }
}
