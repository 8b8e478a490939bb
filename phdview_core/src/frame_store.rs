//! Frame Store - the precomputed, immutable playback timeline
//!
//! Every frame is resolved to a dense scalar field before playback starts.
//! Two constructors exist: one takes fields that were sampled elsewhere, the
//! other samples a per-step mixture through an external evaluator.

use crate::error::{PhdViewError, Result};
use crate::field::ScalarField;
use crate::grid::Grid;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Evaluates a mixture representation on a grid.
///
/// The frame store treats implementations as opaque pure functions and only
/// checks the shape of what they return. Closures `Fn(&M, &Grid) -> ScalarField`
/// implement this trait.
pub trait MixtureSampler<M> {
    fn sample(&self, mixture: &M, grid: &Grid) -> ScalarField;
}

impl<M, F> MixtureSampler<M> for F
where
    F: Fn(&M, &Grid) -> ScalarField,
{
    fn sample(&self, mixture: &M, grid: &Grid) -> ScalarField {
        self(mixture, grid)
    }
}

/// One time step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// PHD intensity sampled on the shared grid
    pub scalar_field: ScalarField,

    /// Coordinates of the sensors that fired during this step, if known
    pub active_observations: Option<Vec<Vector3<f64>>>,
}

/// Non-empty, shape-consistent sequence of frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrameSequence")]
pub struct FrameSequence {
    shape: [usize; 3],
    frames: Vec<Frame>,
}

#[derive(Deserialize)]
struct RawFrameSequence {
    shape: [usize; 3],
    frames: Vec<Frame>,
}

impl TryFrom<RawFrameSequence> for FrameSequence {
    type Error = PhdViewError;

    fn try_from(raw: RawFrameSequence) -> Result<Self> {
        if raw.frames.is_empty() {
            return Err(PhdViewError::config("frame sequence needs at least one frame"));
        }
        if let Some((i, frame)) = raw
            .frames
            .iter()
            .enumerate()
            .find(|(_, f)| f.scalar_field.shape() != raw.shape)
        {
            return Err(PhdViewError::config(format!(
                "frame {} has shape {:?}, sequence is {:?}",
                i,
                frame.scalar_field.shape(),
                raw.shape
            )));
        }
        Ok(Self {
            shape: raw.shape,
            frames: raw.frames,
        })
    }
}

impl FrameSequence {
    /// Builds a sequence from precomputed fields.
    ///
    /// When `observations` is given, entry `i` becomes the active observation
    /// list of frame `i`.
    ///
    /// # Errors
    /// `Configuration` if `fields` is empty, field shapes disagree, or
    /// `observations` has a different length than `fields`.
    pub fn build_from_scalars(
        fields: Vec<ScalarField>,
        observations: Option<Vec<Vec<Vector3<f64>>>>,
    ) -> Result<Self> {
        let shape = match fields.first() {
            Some(first) => first.shape(),
            None => return Err(PhdViewError::config("frame sequence needs at least one frame")),
        };

        if let Some((i, field)) = fields.iter().enumerate().find(|(_, f)| f.shape() != shape) {
            return Err(PhdViewError::config(format!(
                "frame {} has shape {:?}, frame 0 has {:?}",
                i,
                field.shape(),
                shape
            )));
        }

        let observations: Vec<Option<Vec<Vector3<f64>>>> = match observations {
            Some(obs) if obs.len() != fields.len() => {
                return Err(PhdViewError::config(format!(
                    "{} observation lists for {} frames",
                    obs.len(),
                    fields.len()
                )));
            }
            Some(obs) => obs.into_iter().map(Some).collect(),
            None => vec![None; fields.len()],
        };

        let frames = fields
            .into_iter()
            .zip(observations)
            .map(|(scalar_field, active_observations)| Frame {
                scalar_field,
                active_observations,
            })
            .collect();

        Ok(Self { shape, frames })
    }

    /// Samples every mixture on `grid`, in order, then builds the sequence as
    /// [`build_from_scalars`](Self::build_from_scalars) does.
    ///
    /// # Errors
    /// Everything `build_from_scalars` rejects, plus `Configuration` if the
    /// sampler returns a field whose shape is not the grid's.
    pub fn build_from_mixtures<M, S>(
        mixtures: &[M],
        grid: &Grid,
        sampler: &S,
        observations: Option<Vec<Vec<Vector3<f64>>>>,
    ) -> Result<Self>
    where
        S: MixtureSampler<M> + ?Sized,
    {
        let mut fields = Vec::with_capacity(mixtures.len());
        for (step, mixture) in mixtures.iter().enumerate() {
            debug!("sampling PHD for step {}", step);
            let field = sampler.sample(mixture, grid);
            if field.shape() != grid.shape() {
                return Err(PhdViewError::config(format!(
                    "sampler returned shape {:?} for step {}, grid is {:?}",
                    field.shape(),
                    step,
                    grid.shape()
                )));
            }
            fields.push(field);
        }

        Self::build_from_scalars(fields, observations)
    }

    /// Number of frames (at least one).
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Shape shared by every frame's field.
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// # Errors
    /// `Configuration` if the frames were not sampled on a grid of this shape.
    pub fn check_grid(&self, grid: &Grid) -> Result<()> {
        if grid.shape() != self.shape {
            return Err(PhdViewError::config(format!(
                "frames have shape {:?}, grid is {:?}",
                self.shape,
                grid.shape()
            )));
        }
        Ok(())
    }
}
