//! Sensor Registry - fixed 3D sensor embeddings with reverse lookup
//!
//! Every registered sensor gets a dense 0-based index in registration order.
//! Observations arriving with a frame carry only a coordinate, so the
//! registry answers "which sensor sits exactly here?".

use crate::error::{PhdViewError, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single registered sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorPoint {
    /// Dense 0-based registration index
    pub index: usize,

    /// Sensor identifier from the dataset (e.g. "M012")
    pub name: String,

    /// Embedding coordinate
    pub position: Vector3<f64>,
}

/// Immutable, ordered set of sensors.
///
/// Deserialization goes through [`from_pairs`](SensorRegistry::from_pairs),
/// so a stored registry must be non-empty, uniquely named and densely indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSensorRegistry")]
pub struct SensorRegistry {
    sensors: Vec<SensorPoint>,
}

#[derive(Deserialize)]
struct RawSensorRegistry {
    sensors: Vec<SensorPoint>,
}

impl TryFrom<RawSensorRegistry> for SensorRegistry {
    type Error = PhdViewError;

    fn try_from(raw: RawSensorRegistry) -> Result<Self> {
        if let Some((i, s)) = raw.sensors.iter().enumerate().find(|(i, s)| s.index != *i) {
            return Err(PhdViewError::config(format!(
                "sensor '{}' stored at position {} with index {}",
                s.name, i, s.index
            )));
        }
        Self::from_pairs(raw.sensors.into_iter().map(|s| (s.name, s.position)))
    }
}

impl SensorRegistry {
    /// Builds a registry from parallel position and name sequences.
    ///
    /// Row `i` of `positions` is the embedding of sensor `names[i]`.
    ///
    /// # Errors
    /// `Configuration` if either sequence is empty, the lengths differ, or a
    /// name is registered twice.
    pub fn register<S: Into<String>>(
        positions: Vec<Vector3<f64>>,
        names: Vec<S>,
    ) -> Result<Self> {
        if positions.is_empty() || names.is_empty() {
            return Err(PhdViewError::config("sensor registry needs at least one sensor"));
        }
        if positions.len() != names.len() {
            return Err(PhdViewError::config(format!(
                "{} sensor positions but {} sensor names",
                positions.len(),
                names.len()
            )));
        }

        Self::from_pairs(names.into_iter().zip(positions))
    }

    /// Builds a registry from `(name, position)` pairs as a dataset provides them.
    pub fn from_pairs<S, I>(pairs: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Vector3<f64>)>,
    {
        let mut seen = HashSet::new();
        let mut sensors = Vec::new();

        for (index, (name, position)) in pairs.into_iter().enumerate() {
            let name = name.into();
            if !seen.insert(name.clone()) {
                return Err(PhdViewError::config(format!(
                    "sensor name '{}' registered twice",
                    name
                )));
            }
            sensors.push(SensorPoint {
                index,
                name,
                position,
            });
        }

        if sensors.is_empty() {
            return Err(PhdViewError::config("sensor registry needs at least one sensor"));
        }

        Ok(Self { sensors })
    }

    /// Index of the first sensor whose position equals `position` exactly.
    ///
    /// Comparison is IEEE equality per component: no rounding tolerance is
    /// applied, so `0.1 + 0.2` will not find a sensor at `0.3`. Signed zeros
    /// compare equal (a query at `-0.0` finds a sensor at `0.0`) and a NaN
    /// component never matches.
    ///
    /// # Errors
    /// `NotFound` if no registered position matches.
    pub fn lookup_exact(&self, position: &Vector3<f64>) -> Result<usize> {
        self.sensors
            .iter()
            .position(|s| s.position == *position)
            .ok_or_else(|| PhdViewError::not_found(position))
    }

    /// Index of the sensor nearest to `position` among those within
    /// `tolerance` (Euclidean). Ties go to the earlier registration.
    ///
    /// Opt-in alternative to [`lookup_exact`](Self::lookup_exact) for
    /// observation streams that round their coordinates.
    ///
    /// # Errors
    /// `NotFound` if no sensor lies within `tolerance`.
    pub fn lookup_within(&self, position: &Vector3<f64>, tolerance: f64) -> Result<usize> {
        self.sensors
            .iter()
            .enumerate()
            .map(|(i, s)| (i, (s.position - position).norm()))
            .filter(|&(_, d)| d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(i, _)| i)
            .ok_or_else(|| PhdViewError::not_found(position))
    }

    /// Number of registered sensors (always at least one).
    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    /// Always false; a registry cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SensorPoint> {
        self.sensors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorPoint> {
        self.sensors.iter()
    }

    /// Sensor names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sensors.iter().map(|s| s.name.as_str())
    }
}
