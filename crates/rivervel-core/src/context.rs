use std::path::PathBuf;

use crate::calibration::{CalibrationModel, MetricExtent};
use crate::error::Result;
use crate::point::Point2;

/// State shared between the steps of a session: the chosen video, the saved
/// still frame, the calibration and where optical flow output lives.
///
/// The calibration is only reachable mutably through [`calibrate`](Self::calibrate);
/// every other consumer reads it via [`calibration`](Self::calibration).
#[derive(Clone, Debug, Default)]
pub struct SharedContext {
    pub video_path: Option<PathBuf>,
    pub saved_frame_path: Option<PathBuf>,
    /// Velocity field produced by the last optical flow run.
    pub optical_flow_csv: Option<PathBuf>,
    pub optical_flow_output_dir: Option<PathBuf>,
    pub save_dir: Option<PathBuf>,
    calibration: CalibrationModel,
}

impl SharedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calibration(calibration: CalibrationModel) -> Self {
        Self {
            calibration,
            ..Self::default()
        }
    }

    pub fn calibration(&self) -> &CalibrationModel {
        &self.calibration
    }

    /// Recalibrate. Returns the new meters-per-pixel factor.
    pub fn calibrate(&mut self, a: Point2, b: Point2, real_distance: f64) -> Result<f64> {
        self.calibration.set(a, b, real_distance)
    }

    /// Metric extent of the saved frame, if one is set.
    pub fn frame_extent(&self) -> Result<Option<MetricExtent>> {
        self.saved_frame_path
            .as_deref()
            .map(|frame| self.calibration.image_extent(frame))
            .transpose()
    }

    /// Directory analysis artifacts are written to, defaulting to the current
    /// directory.
    pub fn analysis_dir(&self) -> PathBuf {
        self.save_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
