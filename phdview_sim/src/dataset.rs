//! Synthetic smart-home dataset for demo playback.
//!
//! Plays the role of the dataset provider: a fixed lattice of sensor
//! embeddings, a sampling grid, and per-step target mixtures with the
//! sensors that fired. Everything is derived from one seed.

use crate::error::SimError;
use crate::mixture::{expected_targets, GaussianComponent};
use crate::scenarios::ScenarioId;
use nalgebra::Vector3;
use phdview_core::{Grid, SensorRegistry};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

/// Sensors per lattice axis
const LATTICE: usize = 3;

/// Spread of a tracked target's component (unit-cube units)
const TARGET_SIGMA: f64 = 0.08;

/// Per-axis jitter applied to target positions
const JITTER_STD: f64 = 0.02;

const SPARSE_DETECTION_PROB: f64 = 0.4;
const SPARSE_CLUTTER_PROB: f64 = 0.2;

/// Everything a playback session needs, generated deterministically.
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    /// Dataset name, used as the scene title prefix
    pub name: String,
    pub sensors: SensorRegistry,
    pub grid: Grid,
    /// One mixture per frame
    pub mixtures: Vec<Vec<GaussianComponent>>,
    /// Sensor coordinates that fired, one list per frame
    pub observations: Vec<Vec<Vector3<f64>>>,
    /// Noise-free target positions, one list per frame
    pub ground_truth: Vec<Vec<Vector3<f64>>>,
}

impl SyntheticDataset {
    /// Generates `frames` steps of `scenario` on a `resolution`^3 grid.
    ///
    /// # Errors
    /// `Scenario` if `frames == 0` or `resolution < 2`.
    pub fn generate(
        scenario: ScenarioId,
        seed: u64,
        frames: usize,
        resolution: usize,
    ) -> Result<Self, SimError> {
        if frames == 0 {
            return Err(SimError::scenario("need at least one frame"));
        }
        if resolution < 2 {
            return Err(SimError::scenario(format!(
                "grid resolution {} too coarse, need at least 2",
                resolution
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let jitter = Normal::new(0.0, JITTER_STD)
            .map_err(|e| SimError::scenario(format!("bad jitter distribution: {}", e)))?;

        let sensors = sensor_lattice()?;
        let grid = Grid::mgrid([0.0; 3], [1.0; 3], [resolution; 3])?;
        let paths = trajectories(scenario);

        let mut mixtures = Vec::with_capacity(frames);
        let mut observations = Vec::with_capacity(frames);
        let mut ground_truth = Vec::with_capacity(frames);

        for step in 0..frames {
            let t = if frames > 1 {
                step as f64 / (frames - 1) as f64
            } else {
                0.0
            };

            let truth: Vec<Vector3<f64>> = paths
                .iter()
                .map(|(start, end)| start + (end - start) * t)
                .collect();

            let mut mixture = Vec::with_capacity(truth.len() + 1);
            for position in &truth {
                let noisy = position
                    + Vector3::new(
                        jitter.sample(&mut rng),
                        jitter.sample(&mut rng),
                        jitter.sample(&mut rng),
                    );
                mixture.push(GaussianComponent::isotropic(1.0, noisy, TARGET_SIGMA)?);
            }

            let mut fired: Vec<Vector3<f64>> = Vec::new();
            let mut fire = |position: Vector3<f64>| {
                if !fired.contains(&position) {
                    fired.push(position);
                }
            };

            match scenario {
                ScenarioId::Drift | ScenarioId::Crossing => {
                    for position in &truth {
                        fire(nearest_sensor(&sensors, position));
                    }
                }
                ScenarioId::Sparse => {
                    // Birth intensity: a weak, wide prior over the whole home
                    mixture.push(GaussianComponent::isotropic(
                        0.1,
                        Vector3::new(0.5, 0.5, 0.5),
                        0.25,
                    )?);
                    if rng.gen_bool(SPARSE_DETECTION_PROB) {
                        fire(nearest_sensor(&sensors, &truth[0]));
                    }
                    if rng.gen_bool(SPARSE_CLUTTER_PROB) {
                        let index = rng.gen_range(0..sensors.len());
                        if let Some(sensor) = sensors.get(index) {
                            fire(sensor.position);
                        }
                    }
                }
            }

            debug!("step {}: {} components, {} firings", step, mixture.len(), fired.len());
            mixtures.push(mixture);
            observations.push(fired);
            ground_truth.push(truth);
        }

        Ok(Self {
            name: format!("synthetic-{}", scenario),
            sensors,
            grid,
            mixtures,
            observations,
            ground_truth,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.mixtures.len()
    }

    /// Sum of mixture weights at `frame`, the PHD's expected target count.
    pub fn expected_targets(&self, frame: usize) -> Option<f64> {
        self.mixtures.get(frame).map(|m| expected_targets(m))
    }

    /// Names of the sensors closest to the true target positions at `frame`.
    pub fn truth_sensors(&self, frame: usize) -> Vec<String> {
        let Some(truth) = self.ground_truth.get(frame) else {
            return Vec::new();
        };
        truth
            .iter()
            .filter_map(|p| {
                let nearest = nearest_sensor(&self.sensors, p);
                self.sensors
                    .lookup_exact(&nearest)
                    .ok()
                    .and_then(|i| self.sensors.get(i))
                    .map(|s| s.name.clone())
            })
            .collect()
    }
}

/// `LATTICE`^3 sensors evenly spread over `[0.1, 0.9]^3`, named M001, M002, ...
fn sensor_lattice() -> Result<SensorRegistry, SimError> {
    let coord = |i: usize| 0.1 + 0.8 * i as f64 / (LATTICE - 1) as f64;

    let mut pairs = Vec::with_capacity(LATTICE.pow(3));
    for ix in 0..LATTICE {
        for iy in 0..LATTICE {
            for iz in 0..LATTICE {
                let name = format!("M{:03}", pairs.len() + 1);
                pairs.push((name, Vector3::new(coord(ix), coord(iy), coord(iz))));
            }
        }
    }

    SensorRegistry::from_pairs(pairs).map_err(SimError::from)
}

/// Start/end points of each target's straight-line path.
fn trajectories(scenario: ScenarioId) -> Vec<(Vector3<f64>, Vector3<f64>)> {
    match scenario {
        ScenarioId::Drift => vec![(Vector3::new(0.1, 0.1, 0.1), Vector3::new(0.9, 0.9, 0.5))],
        ScenarioId::Crossing => vec![
            (Vector3::new(0.1, 0.5, 0.5), Vector3::new(0.9, 0.5, 0.5)),
            (Vector3::new(0.9, 0.1, 0.3), Vector3::new(0.1, 0.9, 0.3)),
        ],
        ScenarioId::Sparse => vec![(Vector3::new(0.1, 0.9, 0.5), Vector3::new(0.9, 0.1, 0.5))],
    }
}

/// Registered position of the sensor closest to `position`.
fn nearest_sensor(sensors: &SensorRegistry, position: &Vector3<f64>) -> Vector3<f64> {
    sensors
        .iter()
        .min_by(|a, b| {
            let da = (a.position - position).norm_squared();
            let db = (b.position - position).norm_squared();
            da.total_cmp(&db)
        })
        .map(|s| s.position)
        .unwrap_or(*position)
}
