//! PHDView Simulation Harness
//!
//! Deterministic stand-ins for everything the playback core treats as an
//! external collaborator:
//! - **Dataset provider**: a seeded synthetic home with a sensor lattice
//! - **Mixture evaluator**: Gaussian-mixture PHD sampling on the grid
//! - **User input**: scripted next/previous/goto commands
//!
//! # Usage
//!
//! ```ignore
//! use phdview_sim::{build_session, parse_script, run_script, PlaybackReport, ScenarioId, SyntheticDataset};
//!
//! let dataset = SyntheticDataset::generate(ScenarioId::Drift, 42, 10, 12)?;
//! let mut controller = build_session(&dataset, Default::default())?;
//! let mut report = PlaybackReport::new(&dataset.name, ScenarioId::Drift, 42);
//! run_script(&mut controller, &dataset, &parse_script("n,n,p")?, &mut report);
//! ```

pub mod command;
pub mod dataset;
pub mod error;
pub mod exporter;
pub mod mixture;
pub mod runner;
pub mod scenarios;

pub use command::{parse_script, play_through, NavCommand};
pub use dataset::SyntheticDataset;
pub use error::SimError;
pub use exporter::{PlaybackReport, StepRecord};
pub use mixture::{GaussianComponent, GaussianMixtureSampler};
pub use runner::{apply, build_session, load_config_file, run_script};
pub use scenarios::ScenarioId;
