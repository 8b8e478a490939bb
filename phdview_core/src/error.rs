//! Error types for PHD playback.

use thiserror::Error;

/// Errors surfaced by registry construction, frame storage and playback.
///
/// None of these are transient: a failed call leaves every piece of state
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhdViewError {
    /// Malformed construction input (empty sequences, length/shape mismatch)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Explicit frame jump outside `[0, len - 1]`
    #[error("Frame {index} out of range (sequence has {len} frames)")]
    OutOfRange { index: usize, len: usize },

    /// Observation coordinate matches no registered sensor
    #[error("No sensor registered at ({}, {}, {})", position[0], position[1], position[2])]
    NotFound { position: [f64; 3] },

    /// Non-positive value reached the log transform
    #[error("Log transform domain error at element {index}: {value} is not positive")]
    Domain { index: usize, value: f64 },
}

impl PhdViewError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a not-found error for a 3D position.
    pub fn not_found(position: &nalgebra::Vector3<f64>) -> Self {
        Self::NotFound {
            position: [position.x, position.y, position.z],
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, PhdViewError>;

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_not_found_message_names_position() {
        let err = PhdViewError::not_found(&Vector3::new(1.0, 2.0, 3.5));
        assert_eq!(err.to_string(), "No sensor registered at (1, 2, 3.5)");
    }

    #[test]
    fn test_out_of_range_message() {
        let err = PhdViewError::OutOfRange { index: 7, len: 3 };
        assert!(err.to_string().contains("Frame 7"));
    }
}
