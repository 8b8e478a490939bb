//! The sampling grid shared by every frame.
//!
//! Three coordinate meshes of identical shape `(nx, ny, nz)`, stored flat in
//! row-major order: element `(ix, iy, iz)` lives at `(ix * ny + iy) * nz + iz`.

use crate::error::{PhdViewError, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Immutable 3D coordinate mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    shape: [usize; 3],
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

#[derive(Deserialize)]
struct RawGrid {
    shape: [usize; 3],
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = PhdViewError;

    fn try_from(raw: RawGrid) -> Result<Self> {
        Self::new(raw.x, raw.y, raw.z, raw.shape)
    }
}

impl Grid {
    /// Wraps three flat coordinate meshes.
    ///
    /// # Errors
    /// `Configuration` if any dimension is zero or a mesh length differs from
    /// `nx * ny * nz`.
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>, shape: [usize; 3]) -> Result<Self> {
        let expected = checked_len(shape)?;
        for (axis, mesh) in [("x", &x), ("y", &y), ("z", &z)] {
            if mesh.len() != expected {
                return Err(PhdViewError::config(format!(
                    "{} mesh has {} samples, shape {:?} needs {}",
                    axis,
                    mesh.len(),
                    shape,
                    expected
                )));
            }
        }
        Ok(Self { shape, x, y, z })
    }

    /// Dense mesh with `shape[k]` inclusive, evenly spaced samples on
    /// `[min[k], max[k]]` along each axis (a single sample sits at `min[k]`).
    pub fn mgrid(min: [f64; 3], max: [f64; 3], shape: [usize; 3]) -> Result<Self> {
        let total = checked_len(shape)?;
        let axes: Vec<Vec<f64>> = (0..3)
            .map(|k| linspace(min[k], max[k], shape[k]))
            .collect();

        let mut x = Vec::with_capacity(total);
        let mut y = Vec::with_capacity(total);
        let mut z = Vec::with_capacity(total);
        for &xv in &axes[0] {
            for &yv in &axes[1] {
                for &zv in &axes[2] {
                    x.push(xv);
                    y.push(yv);
                    z.push(zv);
                }
            }
        }

        Ok(Self { shape, x, y, z })
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Total number of grid samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Coordinate of the sample at `flat_index`.
    ///
    /// # Panics
    /// If `flat_index >= self.len()`.
    #[inline]
    pub fn point(&self, flat_index: usize) -> Vector3<f64> {
        Vector3::new(self.x[flat_index], self.y[flat_index], self.z[flat_index])
    }

    /// Iterates over every sample coordinate in storage order.
    pub fn points(&self) -> impl Iterator<Item = Vector3<f64>> + '_ {
        (0..self.len()).map(move |i| self.point(i))
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn z(&self) -> &[f64] {
        &self.z
    }

    /// Bounding box `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    pub fn extent(&self) -> [f64; 6] {
        let (x0, x1) = min_max(&self.x);
        let (y0, y1) = min_max(&self.y);
        let (z0, z1) = min_max(&self.z);
        [x0, x1, y0, y1, z0, z1]
    }
}

pub(crate) fn checked_len(shape: [usize; 3]) -> Result<usize> {
    if shape.contains(&0) {
        return Err(PhdViewError::config(format!(
            "grid shape {:?} has an empty axis",
            shape
        )));
    }
    shape
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| PhdViewError::config(format!("grid shape {:?} overflows", shape)))
}

fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }
    let step = (stop - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
