//! Playback Controller - cursor over the frame timeline
//!
//! The controller owns the sensor registry, the frames and a
//! [`PlaybackState`]. Every successful transition recomputes a
//! [`DisplayUpdate`] for the new frame and hands it to the attached
//! [`DisplaySink`]:
//!
//! 1. Transform the frame's field (linear or log with floor)
//! 2. Start an all-false highlight mask, one entry per sensor
//! 3. Resolve each active observation to a sensor index and light it
//! 4. Commit the index and present the update
//!
//! The new update is fully computed before anything is committed, so a
//! failure at step 1 or 3 leaves the index and the last update untouched.

use crate::config::{validate_epsilon, PlaybackConfig};
use crate::error::{PhdViewError, Result};
use crate::field::ScalarField;
use crate::field_transform::transform;
use crate::frame_store::FrameSequence;
use crate::grid::Grid;
use crate::render::{DisplaySink, NullSink, Scene};
use crate::sensor_registry::{SensorPoint, SensorRegistry};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Mutable playback cursor and display mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Always in `[0, len - 1]`
    pub current_index: usize,
    pub log_mode: bool,
    pub epsilon: f64,
}

/// Everything a renderer needs to show one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayUpdate {
    /// Frame this update was computed for
    pub frame_index: usize,

    /// Transformed field, owned (never aliases the stored frame)
    pub display_field: ScalarField,

    /// One entry per registered sensor, true if it observed in this frame
    pub highlight_mask: Vec<bool>,
}

impl DisplayUpdate {
    /// Min/max of the display field, for a colorbar.
    pub fn value_range(&self) -> (f64, f64) {
        self.display_field.min_max()
    }

    /// Indices of lit sensors, ascending.
    pub fn highlighted(&self) -> impl Iterator<Item = usize> + '_ {
        self.highlight_mask
            .iter()
            .enumerate()
            .filter_map(|(i, &lit)| lit.then_some(i))
    }
}

/// Time-indexed playback over a [`FrameSequence`].
pub struct PlaybackController<S = NullSink> {
    registry: SensorRegistry,
    frames: FrameSequence,
    grid: Option<Grid>,
    config: PlaybackConfig,
    dataset: Option<String>,
    state: PlaybackState,
    current: DisplayUpdate,
    sink: S,
}

impl PlaybackController<NullSink> {
    /// Creates a controller positioned at frame 0.
    ///
    /// # Errors
    /// `Configuration` for an invalid config; `NotFound` or `Domain` if frame
    /// 0 itself cannot be displayed.
    pub fn new(
        registry: SensorRegistry,
        frames: FrameSequence,
        config: PlaybackConfig,
    ) -> Result<Self> {
        config.validate()?;

        let state = PlaybackState {
            current_index: 0,
            log_mode: config.log_mode,
            epsilon: config.epsilon,
        };
        let current = compute_update(&registry, &frames, &state, config.match_tolerance)?;

        Ok(Self {
            registry,
            frames,
            grid: None,
            config,
            dataset: None,
            state,
            current,
            sink: NullSink,
        })
    }
}

impl<S: DisplaySink> PlaybackController<S> {
    /// Attaches the sampling grid so renderers can place the field.
    ///
    /// # Errors
    /// `Configuration` if the frame shape is not the grid shape.
    pub fn with_grid(mut self, grid: Grid) -> Result<Self> {
        self.frames.check_grid(&grid)?;
        self.grid = Some(grid);
        Ok(self)
    }

    /// Sets the dataset name prefixed to the scene title.
    pub fn with_dataset(mut self, name: impl Into<String>) -> Self {
        self.dataset = Some(name.into());
        self
    }

    /// Swaps in a new sink, hands it the scene and the current frame.
    pub fn with_sink<T: DisplaySink>(self, mut sink: T) -> PlaybackController<T> {
        let title = self.title();
        sink.prepare(&Scene {
            title: &title,
            sensors: &self.registry,
            grid: self.grid.as_ref(),
            contours: self.config.contours,
        });
        sink.present(&self.current);

        PlaybackController {
            registry: self.registry,
            frames: self.frames,
            grid: self.grid,
            config: self.config,
            dataset: self.dataset,
            state: self.state,
            current: self.current,
            sink,
        }
    }

    /// Advances one frame; a no-op on the last frame.
    pub fn step_forward(&mut self) -> Result<&DisplayUpdate> {
        let next = self.state.current_index + 1;
        if next >= self.frames.len() {
            debug!("already at last frame {}", self.state.current_index);
            return Ok(&self.current);
        }
        self.go_to(next)
    }

    /// Moves back one frame; a no-op on frame 0.
    pub fn step_backward(&mut self) -> Result<&DisplayUpdate> {
        match self.state.current_index.checked_sub(1) {
            Some(prev) => self.go_to(prev),
            None => {
                debug!("already at first frame");
                Ok(&self.current)
            }
        }
    }

    /// Jumps to frame `index`.
    ///
    /// # Errors
    /// `OutOfRange` if `index >= len()`, plus whatever recomputing the frame
    /// raises. State is unchanged on error.
    pub fn set_frame(&mut self, index: usize) -> Result<&DisplayUpdate> {
        if index >= self.frames.len() {
            let err = PhdViewError::OutOfRange {
                index,
                len: self.frames.len(),
            };
            warn!("{}", err);
            return Err(err);
        }
        self.go_to(index)
    }

    /// Switches between log and linear display and redraws the current frame.
    pub fn set_log_mode(&mut self, log_mode: bool) -> Result<&DisplayUpdate> {
        let candidate = PlaybackState {
            log_mode,
            ..self.state
        };
        self.commit(candidate)
    }

    /// Changes the log floor and redraws the current frame.
    ///
    /// # Errors
    /// `Configuration` for a non-positive or non-finite epsilon.
    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<&DisplayUpdate> {
        validate_epsilon(epsilon)?;
        let candidate = PlaybackState {
            epsilon,
            ..self.state
        };
        self.commit(candidate)
    }

    /// Presents the current update to the sink again.
    pub fn redraw(&mut self) {
        self.sink.present(&self.current);
    }

    fn go_to(&mut self, index: usize) -> Result<&DisplayUpdate> {
        let candidate = PlaybackState {
            current_index: index,
            ..self.state
        };
        self.commit(candidate)
    }

    fn commit(&mut self, candidate: PlaybackState) -> Result<&DisplayUpdate> {
        let update = compute_update(
            &self.registry,
            &self.frames,
            &candidate,
            self.config.match_tolerance,
        )
        .map_err(|e| {
            warn!("frame {} not shown: {}", candidate.current_index, e);
            e
        })?;

        debug!("frame {}", candidate.current_index);
        self.state = candidate;
        self.sink.present(&update);
        self.current = update;
        Ok(&self.current)
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// The update most recently computed (and presented).
    pub fn current_update(&self) -> &DisplayUpdate {
        &self.current
    }

    /// Sensors lit in the current frame.
    pub fn highlighted_sensors(&self) -> impl Iterator<Item = &SensorPoint> {
        self.current
            .highlighted()
            .filter_map(move |i| self.registry.get(i))
    }

    pub fn registry(&self) -> &SensorRegistry {
        &self.registry
    }

    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// "{dataset} {title}", or just the title when no dataset name is set.
    pub fn title(&self) -> String {
        match &self.dataset {
            Some(name) => format!("{} {}", name, self.config.title),
            None => self.config.title.clone(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Computes the display update for `state.current_index` without touching
/// any controller state.
pub fn compute_update(
    registry: &SensorRegistry,
    frames: &FrameSequence,
    state: &PlaybackState,
    match_tolerance: Option<f64>,
) -> Result<DisplayUpdate> {
    let frame = frames.get(state.current_index).ok_or(PhdViewError::OutOfRange {
        index: state.current_index,
        len: frames.len(),
    })?;

    let display_field = transform(&frame.scalar_field, state.log_mode, state.epsilon)?;
    let mut highlight_mask = vec![false; registry.len()];

    if let Some(observations) = &frame.active_observations {
        for position in observations {
            let index = match match_tolerance {
                Some(tol) => registry.lookup_within(position, tol)?,
                None => registry.lookup_exact(position)?,
            };
            highlight_mask[index] = true;
        }
    }

    Ok(DisplayUpdate {
        frame_index: state.current_index,
        display_field,
        highlight_mask,
    })
}
