//! Gaussian-mixture PHD evaluator.
//!
//! Stands in for the external numeric routine the playback core consumes:
//! each component contributes `w * N(x; mean, covariance)` at every grid
//! sample.

use crate::error::SimError;
use nalgebra::{Matrix3, Vector3};
use phdview_core::{Grid, MixtureSampler, ScalarField};
use std::f64::consts::PI;

/// A weighted 3D Gaussian.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianComponent {
    /// Expected number of targets this component accounts for
    pub weight: f64,
    pub mean: Vector3<f64>,
    pub covariance: Matrix3<f64>,

    /// Cached inverse covariance
    precision: Matrix3<f64>,

    /// Cached `1 / sqrt((2π)^3 |Σ|)`
    norm: f64,
}

impl GaussianComponent {
    /// # Errors
    /// `Scenario` if the weight is negative or the covariance is not
    /// positive definite.
    pub fn new(weight: f64, mean: Vector3<f64>, covariance: Matrix3<f64>) -> Result<Self, SimError> {
        if weight.is_nan() || weight < 0.0 {
            return Err(SimError::scenario(format!("component weight {} is negative", weight)));
        }
        let det = covariance.determinant();
        if det.is_nan() || det <= 0.0 {
            return Err(SimError::scenario("component covariance is not positive definite"));
        }
        let precision = covariance
            .try_inverse()
            .ok_or_else(|| SimError::scenario("component covariance is singular"))?;

        Ok(Self {
            weight,
            mean,
            covariance,
            precision,
            norm: 1.0 / ((2.0 * PI).powi(3) * det).sqrt(),
        })
    }

    /// Isotropic component with standard deviation `sigma` on every axis.
    pub fn isotropic(weight: f64, mean: Vector3<f64>, sigma: f64) -> Result<Self, SimError> {
        Self::new(weight, mean, Matrix3::identity() * (sigma * sigma))
    }

    /// Weighted density at `x`.
    #[inline]
    pub fn density(&self, x: &Vector3<f64>) -> f64 {
        let d = x - self.mean;
        let mahalanobis_sq = d.dot(&(self.precision * d));
        self.weight * self.norm * (-0.5 * mahalanobis_sq).exp()
    }
}

/// Samples a mixture (a list of components) on a grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianMixtureSampler;

impl MixtureSampler<Vec<GaussianComponent>> for GaussianMixtureSampler {
    fn sample(&self, mixture: &Vec<GaussianComponent>, grid: &Grid) -> ScalarField {
        ScalarField::sample_grid(grid, |p| mixture.iter().map(|c| c.density(&p)).sum())
    }
}

/// Expected target count: the sum of component weights.
pub fn expected_targets(mixture: &[GaussianComponent]) -> f64 {
    mixture.iter().map(|c| c.weight).sum()
}
