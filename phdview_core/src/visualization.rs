//! Visualization sink for PHD playback using Rerun.io
//!
//! Logs, per presented frame:
//! - Sensor embeddings as labelled points, observed sensors in blue
//! - The display field as a point cloud of grid samples above the lowest
//!   contour level, colored by level
//! - Field min/max as scalar time series
//!
//! Enable with the `visualization` feature flag.

use crate::playback::DisplayUpdate;
use crate::render::{contour_levels, contour_samples, DisplaySink, Scene};
use rerun::{RecordingStream, RecordingStreamBuilder};
use tracing::warn;

const IDLE_SENSOR: [u8; 4] = [180, 180, 180, 255];
const OBSERVED_SENSOR: [u8; 4] = [0, 0, 255, 255];

/// Blue for the lowest level through red for the highest.
fn level_color(reached: usize, levels: usize) -> [u8; 4] {
    let heat = (255 * reached.min(levels) / levels.max(1)) as u8;
    [heat, 64, 255 - heat, 128]
}

/// Rerun-backed [`DisplaySink`].
pub struct RerunSink {
    rec: RecordingStream,
    sensor_positions: Vec<[f32; 3]>,
    grid_points: Vec<[f32; 3]>,
    contours: usize,
}

impl RerunSink {
    /// Create a sink that spawns the Rerun viewer
    pub fn spawn(app_id: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let rec = RecordingStreamBuilder::new(app_id).spawn()?;
        Ok(Self::from_stream(rec))
    }

    /// Create a sink that saves to an .rrd file
    pub fn to_file(app_id: &str, path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let rec = RecordingStreamBuilder::new(app_id).save(path)?;
        Ok(Self::from_stream(rec))
    }

    fn from_stream(rec: RecordingStream) -> Self {
        Self {
            rec,
            sensor_positions: Vec::new(),
            grid_points: Vec::new(),
            contours: 1,
        }
    }

    fn log_scene(&self, scene: &Scene<'_>) -> Result<(), Box<dyn std::error::Error>> {
        self.rec.log_static("world", &rerun::ViewCoordinates::RIGHT_HAND_Z_UP())?;

        self.rec.log_static(
            "logs/title",
            &rerun::TextLog::new(scene.title.to_string()),
        )?;

        self.rec.log_static(
            "world/sensors/labels",
            &rerun::Points3D::new(self.sensor_positions.iter().copied())
                .with_colors([IDLE_SENSOR])
                .with_radii([0.015])
                .with_labels(scene.sensors.names().map(str::to_string)),
        )?;

        if let Some(grid) = scene.grid {
            let [x0, x1, y0, y1, z0, z1] = grid.extent();
            self.rec.log_static(
                "world/outline",
                &rerun::Boxes3D::from_centers_and_sizes(
                    [[
                        ((x0 + x1) / 2.0) as f32,
                        ((y0 + y1) / 2.0) as f32,
                        ((z0 + z1) / 2.0) as f32,
                    ]],
                    [[(x1 - x0) as f32, (y1 - y0) as f32, (z1 - z0) as f32]],
                )
                .with_colors([[178, 178, 178, 255]]),
            )?;
        }

        Ok(())
    }

    fn log_update(&self, update: &DisplayUpdate) -> Result<(), Box<dyn std::error::Error>> {
        self.rec.set_time_sequence("frame", update.frame_index as i64);

        let colors: Vec<[u8; 4]> = update
            .highlight_mask
            .iter()
            .map(|&lit| if lit { OBSERVED_SENSOR } else { IDLE_SENSOR })
            .collect();
        self.rec.log(
            "world/sensors",
            &rerun::Points3D::new(self.sensor_positions.iter().copied())
                .with_colors(colors)
                .with_radii([0.015]),
        )?;

        let (lo, hi) = update.value_range();
        let levels = contour_levels(lo, hi, self.contours);
        if !levels.is_empty() {
            let mut points = Vec::new();
            let mut colors = Vec::new();
            for (i, reached) in contour_samples(update.display_field.values(), &levels) {
                if let Some(point) = self.grid_points.get(i) {
                    points.push(*point);
                    colors.push(level_color(reached, levels.len()));
                }
            }
            self.rec.log(
                "world/phd",
                &rerun::Points3D::new(points)
                    .with_colors(colors)
                    .with_radii([0.01]),
            )?;
        }

        self.rec.log("stats/phd_min", &rerun::Scalars::new([lo]))?;
        self.rec.log("stats/phd_max", &rerun::Scalars::new([hi]))?;

        Ok(())
    }
}

impl DisplaySink for RerunSink {
    fn prepare(&mut self, scene: &Scene<'_>) {
        self.contours = scene.contours;
        self.sensor_positions = scene
            .sensors
            .iter()
            .map(|s| [s.position.x as f32, s.position.y as f32, s.position.z as f32])
            .collect();
        self.grid_points = scene
            .grid
            .map(|g| {
                g.points()
                    .map(|p| [p.x as f32, p.y as f32, p.z as f32])
                    .collect()
            })
            .unwrap_or_default();

        if let Err(e) = self.log_scene(scene) {
            warn!("Failed to log scene to Rerun: {:?}", e);
        }
    }

    fn present(&mut self, update: &DisplayUpdate) {
        if let Err(e) = self.log_update(update) {
            warn!("Failed to log frame {} to Rerun: {:?}", update.frame_index, e);
        }
    }
}
