use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, VelocityError};

use super::request::{FlowParams, FlowRequest};

/// Produces a velocity field table from a video.
///
/// Implementations leave their output as `velocity_field.csv` in
/// `working_dir`; relocating it is the caller's job.
pub trait FlowExtractor: Send + Sync {
    fn name(&self) -> &str;

    fn extract(&self, request: &FlowRequest, working_dir: &Path) -> Result<()>;
}

/// Settings for running an external optical flow program.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    pub program: String,
    /// Arguments; `{video}`, `{scale}`, `{start}`, `{vlim}`, `{fps}` and
    /// `{workdir}` are substituted per request.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub params: FlowParams,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            program: "opyf-extract".into(),
            args: [
                "{video}",
                "--meters-per-px",
                "{scale}",
                "--start-frame",
                "{start}",
                "--vlim",
                "{vlim}",
                "--fps",
                "{fps}",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            params: FlowParams::default(),
        }
    }
}

/// Runs an external program as the flow extractor.
#[derive(Clone, Debug)]
pub struct CommandExtractor {
    program: String,
    args: Vec<String>,
}

impl CommandExtractor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &FlowConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    /// Arguments with the request's values substituted.
    pub fn render_args(&self, request: &FlowRequest, working_dir: &Path) -> Vec<String> {
        let video = request.video.display().to_string();
        let workdir = working_dir.display().to_string();
        let scale = request.meters_per_pixel.to_string();
        let start = request.params.start_frame.to_string();
        let vlim = request.params.velocity_limit.to_string();
        let fps = request.params.frames_per_second.to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{video}", &video)
                    .replace("{workdir}", &workdir)
                    .replace("{scale}", &scale)
                    .replace("{start}", &start)
                    .replace("{vlim}", &vlim)
                    .replace("{fps}", &fps)
            })
            .collect()
    }
}

impl FlowExtractor for CommandExtractor {
    fn name(&self) -> &str {
        &self.program
    }

    fn extract(&self, request: &FlowRequest, working_dir: &Path) -> Result<()> {
        let args = self.render_args(request, working_dir);
        info!(program = %self.program, ?args, "Starting optical flow extraction");

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(working_dir)
            .output()
            .map_err(|e| VelocityError::Flow(format!("failed to start {}: {e}", self.program)))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!(target: "rivervel::flow", "{line}");
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.lines().last().unwrap_or("").trim();
            return Err(VelocityError::Flow(format!(
                "{} exited with {}: {detail}",
                self.program, output.status
            )));
        }
        Ok(())
    }
}
