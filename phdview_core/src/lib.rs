//! PHDView Core - Playback logic for time-evolving PHD intensity fields
//!
//! Drives a renderer through a precomputed sequence of multi-target
//! Probability Hypothesis Density snapshots sampled on a fixed 3D grid:
//! 1. **Sensor Registry**: fixed sensor embeddings with exact reverse lookup
//! 2. **Field Transform**: log compression with a floor for display
//! 3. **Frame Store**: immutable, shape-checked timeline of snapshots
//! 4. **Playback Controller**: step/jump cursor emitting display updates
//!
//! Rendering stays behind the [`DisplaySink`] trait; a Rerun sink is
//! available with the `visualization` feature.

pub mod config;
pub mod error;
pub mod field;
pub mod field_transform;
pub mod frame_store;
pub mod grid;
pub mod playback;
pub mod render;
pub mod sensor_registry;

#[cfg(feature = "visualization")]
pub mod visualization;

// Re-export key types for convenience
pub use config::PlaybackConfig;
pub use error::{PhdViewError, Result};
pub use field::ScalarField;
pub use field_transform::{transform, DEFAULT_EPSILON};
pub use frame_store::{Frame, FrameSequence, MixtureSampler};
pub use grid::Grid;
pub use playback::{DisplayUpdate, PlaybackController, PlaybackState};
pub use render::{DisplaySink, NullSink, Scene};
pub use sensor_registry::{SensorPoint, SensorRegistry};

#[cfg(feature = "visualization")]
pub use visualization::RerunSink;
