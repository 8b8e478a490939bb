//! Renderer seam.
//!
//! The core never draws. It hands a [`Scene`] to a [`DisplaySink`] once when
//! the sink is attached, then one [`DisplayUpdate`] per successful frame
//! transition. Windowing, contour extraction and input capture belong to the
//! sink's side of the seam.

use crate::grid::Grid;
use crate::playback::DisplayUpdate;
use crate::sensor_registry::SensorRegistry;

/// Static layout drawn once before the first update.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// Window / recording title, e.g. "kyoto PHD"
    pub title: &'a str,
    pub sensors: &'a SensorRegistry,
    /// Sampling grid, when the frames were built against a known grid
    pub grid: Option<&'a Grid>,
    /// Requested number of contour surfaces
    pub contours: usize,
}

/// Consumer of display updates.
pub trait DisplaySink {
    /// Called once when the sink is attached to a controller.
    fn prepare(&mut self, _scene: &Scene<'_>) {}

    /// Called after every successful recomputation, never on no-ops or errors.
    fn present(&mut self, update: &DisplayUpdate);
}

/// Sink that drops everything; used when playback runs headless.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn present(&mut self, _update: &DisplayUpdate) {}
}

/// Recording sink: keeps every presented update in order.
impl DisplaySink for Vec<DisplayUpdate> {
    fn present(&mut self, update: &DisplayUpdate) {
        self.push(update.clone());
    }
}

impl<T: DisplaySink + ?Sized> DisplaySink for &mut T {
    fn prepare(&mut self, scene: &Scene<'_>) {
        (**self).prepare(scene);
    }

    fn present(&mut self, update: &DisplayUpdate) {
        (**self).present(update);
    }
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn prepare(&mut self, scene: &Scene<'_>) {
        (**self).prepare(scene);
    }

    fn present(&mut self, update: &DisplayUpdate) {
        (**self).present(update);
    }
}

/// `count` evenly spaced iso-levels strictly inside `[lo, hi]`.
///
/// Empty when the range is degenerate or not finite.
pub fn contour_levels(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if !lo.is_finite() || !hi.is_finite() || hi <= lo {
        return Vec::new();
    }
    let step = (hi - lo) / (count + 1) as f64;
    (1..=count).map(|k| lo + step * k as f64).collect()
}

/// Samples at or above the lowest of the ascending `levels`, each paired
/// with how many levels it reaches (`1..=levels.len()`). NaN samples are
/// never selected.
pub fn contour_samples<'a>(
    values: &'a [f64],
    levels: &'a [f64],
) -> impl Iterator<Item = (usize, usize)> + 'a {
    values.iter().enumerate().filter_map(move |(i, &value)| {
        let reached = levels.iter().filter(|&&level| value >= level).count();
        (reached > 0).then_some((i, reached))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaybackConfig;
    use crate::field::ScalarField;
    use crate::frame_store::FrameSequence;
    use crate::playback::PlaybackController;
    use nalgebra::Vector3;

    #[derive(Default)]
    struct SceneRecorder {
        title: String,
        sensors: usize,
        contours: usize,
        presented: Vec<usize>,
    }

    impl DisplaySink for SceneRecorder {
        fn prepare(&mut self, scene: &Scene<'_>) {
            self.title = scene.title.to_string();
            self.sensors = scene.sensors.len();
            self.contours = scene.contours;
        }

        fn present(&mut self, update: &DisplayUpdate) {
            self.presented.push(update.frame_index);
        }
    }

    #[test]
    fn test_contour_levels_interior() {
        assert_eq!(contour_levels(0.0, 5.0, 4), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(contour_levels(1.0, 1.0, 4).is_empty());
        assert!(contour_levels(f64::NEG_INFINITY, 1.0, 4).is_empty());
    }

    #[test]
    fn test_contour_samples_threshold_and_level() {
        let levels = contour_levels(0.0, 4.0, 3);
        let values = [0.5, 1.0, 2.5, f64::NAN, 4.0];
        let selected: Vec<_> = contour_samples(&values, &levels).collect();
        assert_eq!(selected, vec![(1, 1), (2, 2), (4, 3)]);
    }

    #[test]
    fn test_contour_samples_without_levels() {
        assert_eq!(contour_samples(&[1.0, 2.0], &[]).count(), 0);
    }

    #[test]
    fn test_attach_prepares_scene_and_presents_current_frame() {
        let registry = SensorRegistry::register(vec![Vector3::zeros()], vec!["M001"]).unwrap();
        let field = ScalarField::filled([1, 1, 1], 1.0).unwrap();
        let frames = FrameSequence::build_from_scalars(vec![field.clone(), field], None).unwrap();
        let config = PlaybackConfig::default().with_contours(6);

        let mut ctrl = PlaybackController::new(registry, frames, config)
            .unwrap()
            .with_dataset("aruba")
            .with_sink(SceneRecorder::default());
        ctrl.step_forward().unwrap();
        ctrl.step_forward().unwrap();

        let recorder = ctrl.into_sink();
        assert_eq!(recorder.title, "aruba PHD");
        assert_eq!(recorder.sensors, 1);
        assert_eq!(recorder.contours, 6);
        assert_eq!(recorder.presented, vec![0, 1]);
    }

    #[test]
    fn test_borrowed_sink() {
        let registry = SensorRegistry::register(vec![Vector3::zeros()], vec!["M001"]).unwrap();
        let field = ScalarField::filled([1, 1, 1], 1.0).unwrap();
        let frames = FrameSequence::build_from_scalars(vec![field], None).unwrap();

        let mut recorded: Vec<DisplayUpdate> = Vec::new();
        {
            let mut ctrl = PlaybackController::new(registry, frames, PlaybackConfig::default())
                .unwrap()
                .with_sink(&mut recorded);
            ctrl.redraw();
        }
        assert_eq!(recorded.len(), 2);
    }
}
