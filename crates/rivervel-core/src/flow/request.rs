use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FRAMES_PER_SECOND, DEFAULT_START_FRAME, DEFAULT_VELOCITY_LIMIT};
use crate::context::SharedContext;
use crate::error::{Result, VelocityError};

/// User-tunable optical flow parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowParams {
    /// First video frame of the analysis window.
    pub start_frame: usize,
    /// Upper bound of the velocity display range, in m/s.
    pub velocity_limit: f64,
    pub frames_per_second: f64,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            start_frame: DEFAULT_START_FRAME,
            velocity_limit: DEFAULT_VELOCITY_LIMIT,
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
        }
    }
}

impl FlowParams {
    pub fn validate(&self) -> Result<()> {
        if !self.velocity_limit.is_finite() || self.velocity_limit <= 0.0 {
            return Err(VelocityError::Flow(format!(
                "invalid velocity limit {}",
                self.velocity_limit
            )));
        }
        if !self.frames_per_second.is_finite() || self.frames_per_second <= 0.0 {
            return Err(VelocityError::Flow(format!(
                "invalid frame rate {}",
                self.frames_per_second
            )));
        }
        Ok(())
    }
}

/// One optical flow invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowRequest {
    pub video: PathBuf,
    pub meters_per_pixel: f64,
    pub params: FlowParams,
    /// Where the resulting table is moved; the working directory if unset.
    pub output_dir: Option<PathBuf>,
}

impl FlowRequest {
    /// Build a request from the session: needs a video and a calibration.
    pub fn from_context(ctx: &SharedContext, params: FlowParams) -> Result<Self> {
        let video = ctx.video_path.clone().ok_or(VelocityError::MissingVideo)?;
        let meters_per_pixel = ctx.calibration().scale_factor()?;
        params.validate()?;
        Ok(Self {
            video,
            meters_per_pixel,
            params,
            output_dir: ctx.optical_flow_output_dir.clone(),
        })
    }
}
