//! Playback configuration.

use crate::error::{PhdViewError, Result};
use crate::field_transform::DEFAULT_EPSILON;
use serde::{Deserialize, Serialize};

/// Configuration for the [`PlaybackController`](crate::playback::PlaybackController)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Display `ln(field + epsilon)` instead of the raw field (default: true)
    pub log_mode: bool,

    /// Log floor (default: smallest positive normal f64)
    pub epsilon: f64,

    /// Match observations to the nearest sensor within this Euclidean radius
    /// instead of by exact equality (default: None = exact). Keep it below
    /// half the sensor spacing or an observation can reach a neighbour.
    pub match_tolerance: Option<f64>,

    /// Title appended to the dataset name in the scene title (default: "PHD")
    pub title: String,

    /// Number of contour surfaces a renderer should draw (default: 4)
    pub contours: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            log_mode: true,
            epsilon: DEFAULT_EPSILON,
            match_tolerance: None,
            title: "PHD".to_string(),
            contours: 4,
        }
    }
}

impl PlaybackConfig {
    /// Parses a JSON document; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PhdViewError::config(format!("invalid playback config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_log_mode(mut self, log_mode: bool) -> Self {
        self.log_mode = log_mode;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_match_tolerance(mut self, tolerance: f64) -> Self {
        self.match_tolerance = Some(tolerance);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_contours(mut self, contours: usize) -> Self {
        self.contours = contours;
        self
    }

    /// # Errors
    /// `Configuration` for a non-positive or non-finite epsilon, a negative or
    /// non-finite tolerance, or zero contours.
    pub fn validate(&self) -> Result<()> {
        validate_epsilon(self.epsilon)?;
        if let Some(tol) = self.match_tolerance {
            if !tol.is_finite() || tol < 0.0 {
                return Err(PhdViewError::config(format!(
                    "match tolerance must be finite and non-negative, got {}",
                    tol
                )));
            }
        }
        if self.contours == 0 {
            return Err(PhdViewError::config("contour count must be at least 1"));
        }
        Ok(())
    }
}

pub(crate) fn validate_epsilon(epsilon: f64) -> Result<()> {
    if !epsilon.is_finite() || epsilon <= 0.0 {
        return Err(PhdViewError::config(format!(
            "epsilon must be finite and positive, got {}",
            epsilon
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlaybackConfig::default();
        assert!(config.log_mode);
        assert_eq!(config.epsilon, f64::MIN_POSITIVE);
        assert_eq!(config.match_tolerance, None);
        assert_eq!(config.title, "PHD");
        assert_eq!(config.contours, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = PlaybackConfig::from_json(r#"{ "log_mode": false, "epsilon": 1e-12 }"#).unwrap();
        assert!(!config.log_mode);
        assert_eq!(config.epsilon, 1e-12);
        assert_eq!(config.contours, 4);
    }

    #[test]
    fn test_rejects_bad_epsilon() {
        assert!(PlaybackConfig::default().with_epsilon(0.0).validate().is_err());
        assert!(PlaybackConfig::default().with_epsilon(-1.0).validate().is_err());
        assert!(PlaybackConfig::default().with_epsilon(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_rejects_negative_tolerance() {
        let config = PlaybackConfig::default().with_match_tolerance(-0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(PlaybackConfig::from_json("not json").is_err());
    }
}
