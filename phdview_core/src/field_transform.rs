//! Field Transform - raw PHD snapshot to display-ready field
//!
//! Intensities span many orders of magnitude, so the display usually shows
//! `ln(field + epsilon)`. The floor keeps zero-density cells finite.

use crate::error::{PhdViewError, Result};
use crate::field::ScalarField;

/// Default log floor: the smallest positive normal `f64`.
pub const DEFAULT_EPSILON: f64 = f64::MIN_POSITIVE;

/// Produces the display field for `field`.
///
/// With `log_mode` off the result is an owned copy of the input, so edits to
/// the display field never reach stored frames. With `log_mode` on every
/// element becomes `ln(value + epsilon)`.
///
/// # Errors
/// `Domain` for the first element where `value + epsilon` is not strictly
/// positive (NaN included).
pub fn transform(field: &ScalarField, log_mode: bool, epsilon: f64) -> Result<ScalarField> {
    if !log_mode {
        return Ok(field.clone());
    }

    let values = field
        .values()
        .iter()
        .enumerate()
        .map(|(index, &v)| {
            let shifted = v + epsilon;
            if shifted.is_nan() || shifted <= 0.0 {
                return Err(PhdViewError::Domain { index, value: shifted });
            }
            Ok(shifted.ln())
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(field.with_values(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line(values: Vec<f64>) -> ScalarField {
        let n = values.len();
        ScalarField::new([1, 1, n], values).unwrap()
    }

    #[test]
    fn test_linear_mode_copies() {
        let field = line(vec![0.0, 0.5, 2.0]);
        let out = transform(&field, false, DEFAULT_EPSILON).unwrap();
        assert_eq!(out, field);
    }

    #[test]
    fn test_log_mode_with_floor() {
        let field = line(vec![0.0, 1.0]);
        let out = transform(&field, true, 1e-300).unwrap();

        assert_relative_eq!(out.values()[0], (1e-300f64).ln());
        assert_relative_eq!(out.values()[1], (1.0 + 1e-300f64).ln());
        assert!(out.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_default_epsilon_keeps_zero_finite() {
        let field = line(vec![0.0]);
        let out = transform(&field, true, DEFAULT_EPSILON).unwrap();
        assert!(out.values()[0].is_finite());
        assert!(out.values()[0] < -700.0);
    }

    #[test]
    fn test_negative_value_is_domain_error() {
        let field = line(vec![1.0, -0.5, 2.0]);
        let err = transform(&field, true, 1e-12).unwrap_err();
        assert!(matches!(err, PhdViewError::Domain { index: 1, .. }));
    }

    #[test]
    fn test_nan_is_domain_error() {
        let field = line(vec![f64::NAN]);
        assert!(transform(&field, true, DEFAULT_EPSILON).is_err());
    }

    #[test]
    fn test_linear_mode_passes_negative_values() {
        let field = line(vec![-3.0]);
        assert_eq!(transform(&field, false, DEFAULT_EPSILON).unwrap().values(), &[-3.0]);
    }
}
