//! JSON export of a playback run.

use crate::scenarios::ScenarioId;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// What the display showed after one scripted command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// Position in the script (0 = initial frame, before any command)
    pub step: usize,

    /// Command as typed, "start" for the initial frame
    pub command: String,

    /// Frame on display after the command
    pub frame_index: usize,

    /// Names of highlighted sensors
    pub highlighted: Vec<String>,

    /// Sensors nearest the true target positions
    pub truth: Vec<String>,

    /// Sum of mixture weights for the frame
    pub expected_targets: f64,

    /// Display field range (null in JSON when not finite)
    pub value_min: f64,
    pub value_max: f64,

    /// Error surfaced by the command, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Complete playback export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackReport {
    /// Dataset name
    pub dataset: String,

    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// True number of moving targets
    pub target_count: usize,

    pub frame_count: usize,
    pub sensor_count: usize,
    pub log_mode: bool,

    /// All steps, initial frame first
    pub steps: Vec<StepRecord>,
}

impl PlaybackReport {
    /// Creates a new export container.
    pub fn new(dataset: &str, scenario: ScenarioId, seed: u64) -> Self {
        Self {
            dataset: dataset.to_string(),
            scenario: scenario.name().to_string(),
            seed,
            target_count: scenario.target_count(),
            frame_count: 0,
            sensor_count: 0,
            log_mode: true,
            steps: Vec::new(),
        }
    }

    /// Adds a step.
    pub fn add_step(&mut self, step: StepRecord) {
        self.steps.push(step);
    }

    /// Number of steps that surfaced an error.
    pub fn error_count(&self) -> usize {
        self.steps.iter().filter(|s| s.error.is_some()).count()
    }

    /// Frame indices in step order.
    pub fn frame_path(&self) -> Vec<usize> {
        self.steps.iter().map(|s| s.frame_index).collect()
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
