//! Playback runner: builds a session from a dataset and drives it with a
//! navigation script, recording what the display showed after every step.

use crate::command::NavCommand;
use crate::dataset::SyntheticDataset;
use crate::error::SimError;
use crate::exporter::{PlaybackReport, StepRecord};
use crate::mixture::GaussianMixtureSampler;
use phdview_core::{
    DisplaySink, FrameSequence, PhdViewError, PlaybackConfig, PlaybackController,
};
use tracing::{info, warn};

/// Reads a JSON playback config, or returns the defaults when `path` is `None`.
pub fn load_config_file(path: Option<&str>) -> Result<PlaybackConfig, SimError> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            info!("Loaded playback config from {}", path);
            Ok(PlaybackConfig::from_json(&text)?)
        }
        None => Ok(PlaybackConfig::default()),
    }
}

/// Samples every mixture of `dataset` and opens a controller on frame 0.
pub fn build_session(
    dataset: &SyntheticDataset,
    config: PlaybackConfig,
) -> Result<PlaybackController, SimError> {
    info!("Sampling PHD in 3D space ({} steps)", dataset.frame_count());
    let frames = FrameSequence::build_from_mixtures(
        &dataset.mixtures,
        &dataset.grid,
        &GaussianMixtureSampler,
        Some(dataset.observations.clone()),
    )?;

    let controller = PlaybackController::new(dataset.sensors.clone(), frames, config)?
        .with_grid(dataset.grid.clone())?
        .with_dataset(dataset.name.clone());

    Ok(controller)
}

/// Applies one command to the controller.
pub fn apply<S: DisplaySink>(
    controller: &mut PlaybackController<S>,
    command: NavCommand,
) -> Result<(), PhdViewError> {
    match command {
        NavCommand::Next => controller.step_forward().map(|_| ()),
        NavCommand::Prev => controller.step_backward().map(|_| ()),
        NavCommand::Goto(i) => controller.set_frame(i).map(|_| ()),
        NavCommand::Log => controller.set_log_mode(true).map(|_| ()),
        NavCommand::Linear => controller.set_log_mode(false).map(|_| ()),
        NavCommand::Epsilon(e) => controller.set_epsilon(e).map(|_| ()),
    }
}

/// Runs `script` and records the initial frame plus one step per command.
///
/// `dataset` must be the one the controller was built from; it supplies the
/// ground truth shown next to each highlighted frame. Errors are recorded
/// and playback continues from the last valid frame, the same way a viewer
/// keeps showing the last good frame.
pub fn run_script<S: DisplaySink>(
    controller: &mut PlaybackController<S>,
    dataset: &SyntheticDataset,
    script: &[NavCommand],
    report: &mut PlaybackReport,
) {
    report.frame_count = controller.len();
    report.sensor_count = controller.registry().len();
    report.log_mode = controller.state().log_mode;
    report.add_step(snapshot(controller, dataset, 0, "start".to_string(), None));

    for (i, &command) in script.iter().enumerate() {
        let error = match apply(controller, command) {
            Ok(()) => None,
            Err(e) => {
                warn!("step {} ({}) failed: {}", i + 1, command, e);
                Some(e.to_string())
            }
        };

        let record = snapshot(controller, dataset, i + 1, command.to_string(), error);
        info!(
            "step {:>3} {:<10} frame {:>3} | E[N] {:.2} | range [{:.2}, {:.2}] | sensors: {} | truth: {}",
            record.step,
            record.command,
            record.frame_index,
            record.expected_targets,
            record.value_min,
            record.value_max,
            list_or_dash(&record.highlighted),
            list_or_dash(&record.truth),
        );
        report.add_step(record);
    }
}

fn list_or_dash(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(",")
    }
}

fn snapshot<S: DisplaySink>(
    controller: &PlaybackController<S>,
    dataset: &SyntheticDataset,
    step: usize,
    command: String,
    error: Option<String>,
) -> StepRecord {
    let update = controller.current_update();
    let (value_min, value_max) = update.value_range();

    StepRecord {
        step,
        command,
        frame_index: update.frame_index,
        highlighted: controller
            .highlighted_sensors()
            .map(|s| s.name.clone())
            .collect(),
        truth: dataset.truth_sensors(update.frame_index),
        expected_targets: dataset.expected_targets(update.frame_index).unwrap_or(0.0),
        value_min,
        value_max,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse_script;
    use crate::scenarios::ScenarioId;

    #[test]
    fn test_run_script_records_every_step() {
        let dataset = SyntheticDataset::generate(ScenarioId::Drift, 3, 4, 5).unwrap();
        let mut controller = build_session(&dataset, PlaybackConfig::default()).unwrap();
        let script = parse_script("n,n,n,n,p,g0,g9").unwrap();

        let mut report = PlaybackReport::new(&dataset.name, ScenarioId::Drift, 3);
        run_script(&mut controller, &dataset, &script, &mut report);

        assert_eq!(report.frame_count, 4);
        assert_eq!(report.sensor_count, 27);
        assert_eq!(report.frame_path(), vec![0, 1, 2, 3, 3, 2, 0, 0]);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.steps[0].highlighted, vec!["M001".to_string()]);
        assert_eq!(report.steps[0].truth, vec!["M001".to_string()]);
        assert_eq!(report.target_count, 1);
        assert!(report.steps.iter().all(|s| s.expected_targets == 1.0));
    }

    #[test]
    fn test_mode_commands_keep_frame() {
        let dataset = SyntheticDataset::generate(ScenarioId::Crossing, 3, 3, 4).unwrap();
        let mut controller = build_session(&dataset, PlaybackConfig::default()).unwrap();

        apply(&mut controller, NavCommand::Next).unwrap();
        apply(&mut controller, NavCommand::Linear).unwrap();
        assert_eq!(controller.current_index(), 1);
        assert!(!controller.state().log_mode);
        assert!(apply(&mut controller, NavCommand::Epsilon(0.0)).is_err());
    }

    #[test]
    fn test_load_config_file() {
        let path = std::env::temp_dir().join(format!("phdview-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "log_mode": false, "title": "Replay" }"#).unwrap();

        let config = load_config_file(path.to_str()).unwrap();
        assert!(!config.log_mode);
        assert_eq!(config.title, "Replay");
        assert_eq!(config.contours, 4);

        std::fs::write(&path, r#"{ "epsilon": -1.0 }"#).unwrap();
        assert!(matches!(load_config_file(path.to_str()), Err(SimError::Core(_))));

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(load_config_file(path.to_str()), Err(SimError::Io(_))));
        assert_eq!(load_config_file(None).unwrap(), PlaybackConfig::default());
    }
}
