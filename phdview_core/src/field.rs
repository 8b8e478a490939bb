//! Dense scalar field snapshots aligned to a [`Grid`](crate::grid::Grid).

use crate::error::{PhdViewError, Result};
use crate::grid::{checked_len, Grid};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A PHD intensity snapshot: one `f64` per grid sample, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScalarField")]
pub struct ScalarField {
    shape: [usize; 3],
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawScalarField {
    shape: [usize; 3],
    values: Vec<f64>,
}

impl TryFrom<RawScalarField> for ScalarField {
    type Error = PhdViewError;

    fn try_from(raw: RawScalarField) -> Result<Self> {
        Self::new(raw.shape, raw.values)
    }
}

impl ScalarField {
    /// # Errors
    /// `Configuration` if `values.len()` is not `nx * ny * nz`.
    pub fn new(shape: [usize; 3], values: Vec<f64>) -> Result<Self> {
        let expected = checked_len(shape)?;
        if values.len() != expected {
            return Err(PhdViewError::config(format!(
                "field has {} values, shape {:?} needs {}",
                values.len(),
                shape,
                expected
            )));
        }
        Ok(Self { shape, values })
    }

    /// Field of `value` everywhere.
    pub fn filled(shape: [usize; 3], value: f64) -> Result<Self> {
        let len = checked_len(shape)?;
        Ok(Self {
            shape,
            values: vec![value; len],
        })
    }

    /// Evaluates `f` at every grid sample; the result has the grid's shape.
    pub fn sample_grid<F>(grid: &Grid, f: F) -> Self
    where
        F: Fn(Vector3<f64>) -> f64,
    {
        Self {
            shape: grid.shape(),
            values: grid.points().map(f).collect(),
        }
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `(ix, iy, iz)`, or `None` outside the shape.
    pub fn get(&self, ix: usize, iy: usize, iz: usize) -> Option<f64> {
        let [nx, ny, nz] = self.shape;
        if ix >= nx || iy >= ny || iz >= nz {
            return None;
        }
        self.values.get((ix * ny + iy) * nz + iz).copied()
    }

    /// Smallest and largest value, NaNs ignored.
    pub fn min_max(&self) -> (f64, f64) {
        self.values
            .iter()
            .filter(|v| !v.is_nan())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Same shape, new values.
    pub(crate) fn with_values(&self, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), self.values.len());
        Self {
            shape: self.shape,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_row_major() {
        let field = ScalarField::new([2, 2, 2], (0..8).map(f64::from).collect()).unwrap();
        assert_eq!(field.get(0, 0, 1), Some(1.0));
        assert_eq!(field.get(0, 1, 0), Some(2.0));
        assert_eq!(field.get(1, 0, 0), Some(4.0));
        assert_eq!(field.get(2, 0, 0), None);
    }

    #[test]
    fn test_sample_grid_follows_grid_order() {
        let grid = Grid::mgrid([0.0; 3], [1.0; 3], [2, 2, 2]).unwrap();
        let field = ScalarField::sample_grid(&grid, |p| p.x * 4.0 + p.y * 2.0 + p.z);
        assert_eq!(field.shape(), [2, 2, 2]);
        assert_eq!(field.values(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(ScalarField::new([2, 2, 2], vec![0.0; 7]).is_err());
    }

    #[test]
    fn test_min_max_skips_nan() {
        let field = ScalarField::new([1, 1, 3], vec![2.0, f64::NAN, -1.0]).unwrap();
        assert_eq!(field.min_max(), (-1.0, 2.0));
    }

    #[test]
    fn test_deserialize_checks_value_count() {
        let bad = r#"{"shape":[2,2,2],"values":[1.0]}"#;
        assert!(serde_json::from_str::<ScalarField>(bad).is_err());

        let good = r#"{"shape":[1,1,2],"values":[1.0,2.0]}"#;
        let field: ScalarField = serde_json::from_str(good).unwrap();
        assert_eq!(field.get(0, 0, 1), Some(2.0));
    }
}
