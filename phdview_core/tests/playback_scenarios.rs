//! End-to-end playback scenarios: registry + frame store + controller.

use nalgebra::Vector3;
use phdview_core::{
    DisplayUpdate, FrameSequence, Grid, PhdViewError, PlaybackConfig, PlaybackController,
    ScalarField, SensorRegistry,
};

fn sensors_a_b() -> SensorRegistry {
    SensorRegistry::register(
        vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0)],
        vec!["A", "B"],
    )
    .unwrap()
}

fn three_frames(frame1_obs: Vec<Vector3<f64>>) -> FrameSequence {
    let fields = vec![
        ScalarField::filled([2, 2, 2], 0.0).unwrap(),
        ScalarField::filled([2, 2, 2], 0.5).unwrap(),
        ScalarField::filled([2, 2, 2], 1.0).unwrap(),
    ];
    FrameSequence::build_from_scalars(fields, Some(vec![vec![], frame1_obs, vec![]])).unwrap()
}

#[test]
fn test_highlight_follows_observations() {
    let mut ctrl = PlaybackController::new(
        sensors_a_b(),
        three_frames(vec![Vector3::new(0.0, 0.0, 0.0)]),
        PlaybackConfig::default(),
    )
    .unwrap();

    assert_eq!(ctrl.current_index(), 0);
    assert_eq!(ctrl.step_forward().unwrap().highlight_mask, vec![true, false]);
    assert_eq!(ctrl.step_forward().unwrap().highlight_mask, vec![false, false]);
}

#[test]
fn test_unregistered_observation_leaves_cursor() {
    let mut ctrl = PlaybackController::new(
        sensors_a_b(),
        three_frames(vec![Vector3::new(2.0, 2.0, 2.0)]),
        PlaybackConfig::default(),
    )
    .unwrap();

    let result = ctrl.step_forward();
    assert!(matches!(result, Err(PhdViewError::NotFound { .. })));
    assert_eq!(ctrl.current_index(), 0);

    // Jumping past the bad frame still works
    assert_eq!(ctrl.set_frame(2).unwrap().frame_index, 2);
    assert!(ctrl.step_backward().is_err());
    assert_eq!(ctrl.current_index(), 2);
}

#[test]
fn test_recorded_updates_match_navigation() {
    let mut ctrl = PlaybackController::new(
        sensors_a_b(),
        three_frames(vec![Vector3::new(1.0, 1.0, 1.0)]),
        PlaybackConfig::default().with_log_mode(false),
    )
    .unwrap()
    .with_sink(Vec::<DisplayUpdate>::new());

    ctrl.step_backward().unwrap(); // no-op
    ctrl.step_forward().unwrap();
    ctrl.step_forward().unwrap();
    ctrl.step_forward().unwrap(); // no-op
    ctrl.step_backward().unwrap();

    let frames: Vec<usize> = ctrl.sink().iter().map(|u| u.frame_index).collect();
    assert_eq!(frames, vec![0, 1, 2, 1]);
    assert_eq!(ctrl.sink()[1].display_field.values()[0], 0.5);
}

#[test]
fn test_display_field_does_not_alias_frames() {
    let mut ctrl = PlaybackController::new(
        sensors_a_b(),
        three_frames(vec![]),
        PlaybackConfig::default().with_log_mode(false),
    )
    .unwrap()
    .with_sink(Vec::<DisplayUpdate>::new());

    let presented = ctrl.sink_mut().pop().unwrap();
    let stored = &ctrl.frames().get(0).unwrap().scalar_field;
    assert_eq!(&presented.display_field, stored);
    assert_ne!(presented.display_field.values().as_ptr(), stored.values().as_ptr());
    assert_eq!(ctrl.set_frame(0).unwrap().display_field.values()[0], 0.0);
}

#[test]
fn test_mixture_built_frames_play_on_grid() {
    let grid = Grid::mgrid([0.0; 3], [1.0; 3], [3, 3, 3]).unwrap();
    // Mixture stand-in: a single bump center; density falls off with distance
    let centers = [Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0)];
    let sampler = |center: &Vector3<f64>, g: &Grid| {
        let values = g.points().map(|p| (-(p - center).norm_squared()).exp()).collect();
        ScalarField::new(g.shape(), values).unwrap()
    };

    let frames = FrameSequence::build_from_mixtures(
        &centers,
        &grid,
        &sampler,
        Some(vec![vec![centers[0]], vec![centers[1]]]),
    )
    .unwrap();

    let mut ctrl = PlaybackController::new(sensors_a_b(), frames, PlaybackConfig::default())
        .unwrap()
        .with_grid(grid)
        .unwrap();

    assert_eq!(ctrl.current_update().highlight_mask, vec![true, false]);
    let update = ctrl.step_forward().unwrap();
    assert_eq!(update.highlight_mask, vec![false, true]);

    // Peak sits at the last grid corner in log space too
    let (_, hi) = update.value_range();
    assert_eq!(update.display_field.values()[26], hi);
}

#[test]
fn test_loaded_registry_drives_highlights() {
    let json = serde_json::to_string(&sensors_a_b()).unwrap();
    let registry: SensorRegistry = serde_json::from_str(&json).unwrap();

    let mut ctrl = PlaybackController::new(
        registry,
        three_frames(vec![Vector3::new(1.0, 1.0, 1.0)]),
        PlaybackConfig::default(),
    )
    .unwrap();
    assert_eq!(ctrl.step_forward().unwrap().highlight_mask, vec![false, true]);

    let tampered = json.replace("\"index\":1", "\"index\":5");
    assert!(serde_json::from_str::<SensorRegistry>(&tampered).is_err());
}
