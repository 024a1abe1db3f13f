use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::context::SharedContext;
use crate::error::{Result, VelocityError};
use crate::point::Point2;
use crate::section::SamplerConfig;

fn default_sections() -> usize {
    1
}

/// Everything needed to run one cross-section analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Velocity field table.
    pub field: PathBuf,
    /// Existing directory the three result tables are written to.
    pub output_dir: PathBuf,
    /// Number of sections the profile is averaged over.
    #[serde(default = "default_sections")]
    pub sections: usize,
    pub endpoints: EndpointSource,
    #[serde(default)]
    pub sampling: SamplerConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            field: PathBuf::from("velocity_field.csv"),
            output_dir: PathBuf::from("."),
            sections: default_sections(),
            endpoints: EndpointSource::Points {
                from: Point2::new(0.0, 0.0),
                to: Point2::new(10.0, 0.0),
            },
            sampling: SamplerConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Analyze the velocity field of the session's last optical flow run,
    /// writing into its analysis directory.
    pub fn from_context(ctx: &SharedContext, endpoints: EndpointSource) -> Result<Self> {
        let field = ctx
            .optical_flow_csv
            .clone()
            .ok_or(VelocityError::MissingVelocityField)?;
        Ok(Self {
            field,
            output_dir: ctx.analysis_dir(),
            endpoints,
            ..Self::default()
        })
    }
}

/// Where the two cross-section endpoints come from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointSource {
    Points { from: Point2, to: Point2 },
    /// A table previously written as `selected_points.csv`.
    File(PathBuf),
}

impl std::fmt::Display for EndpointSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Points { from, to } => write!(f, "{from} -> {to}"),
            Self::File(path) => write!(f, "from {}", path.display()),
        }
    }
}
